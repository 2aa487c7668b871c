//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use eardis_core::error::CoreError;
use eardis_core::identity::Identity;

use crate::auth::cookie::read_token_cookie;
use crate::auth::jwt::{raw_subject, validate_token};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated caller, extracted from the access token.
///
/// The token is read from the `Authorization: Bearer <token>` header, or from
/// the `token` cookie when no header is sent. Handlers take this as a
/// parameter and pass the contained [`Identity`] down to the services.
///
/// ```ignore
/// async fn my_handler(auth: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %auth.identity, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub identity: Identity,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = match parts.headers.get(AUTHORIZATION) {
            Some(value) => value
                .to_str()
                .ok()
                .and_then(|v| v.strip_prefix("Bearer "))
                .ok_or_else(|| {
                    AppError::Core(CoreError::Unauthorized(
                        "Invalid Authorization format. Expected: Bearer <token>".into(),
                    ))
                })?,
            None => read_token_cookie(&parts.headers).ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?,
        };

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        let identity = Identity::from_claims(&claims).map_err(|e| {
            tracing::warn!(subject = ?raw_subject(&claims), error = %e, "Rejected token claims");
            AppError::Core(e)
        })?;

        Ok(AuthUser { identity })
    }
}
