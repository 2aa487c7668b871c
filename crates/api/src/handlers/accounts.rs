//! Handlers for the public account endpoints (`/login`, `/accounts`).
//!
//! Both answer with the token in the JSON body and as an http-only cookie.

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::auth::cookie::token_cookie;
use crate::error::{AppError, AppJson, AppResult};
use crate::response::DataResponse;
use crate::services::accounts::{self, AuthResponse, LoginRequest, RegisterRequest};
use crate::state::AppState;

/// POST /api/v1/login
///
/// Authenticate with email or username plus password.
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let session = accounts::login(&state, input).await?;
    with_token_cookie(&state, StatusCode::OK, session)
}

/// POST /api/v1/accounts
///
/// Register a new account. Returns 201 with the first token.
pub async fn register(
    State(state): State<AppState>,
    AppJson(input): AppJson<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    let session = accounts::create_account(&state, input).await?;
    with_token_cookie(&state, StatusCode::CREATED, session)
}

fn with_token_cookie(
    state: &AppState,
    status: StatusCode,
    session: AuthResponse,
) -> AppResult<impl IntoResponse> {
    let cookie = token_cookie(
        &session.token,
        state.config.jwt.access_token_ttl_secs(),
        state.config.cookie_secure,
    )
    .map_err(|e| AppError::InternalError(format!("Invalid cookie value: {e}")))?;

    Ok((
        status,
        [(SET_COOKIE, cookie)],
        Json(DataResponse { data: session }),
    ))
}
