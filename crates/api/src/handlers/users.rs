//! Handlers for `/users` and `/friends`. All require authentication.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use eardis_db::models::user::UserResponse;

use crate::error::{AppJson, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::accounts::{self, SearchUserRequest};
use crate::state::AppState;

/// GET /api/v1/users/me
pub async fn get_me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = accounts::get_account(&state, auth.identity).await?;
    Ok(Json(DataResponse { data: user }))
}

/// DELETE /api/v1/users/me
///
/// Deletes the caller's account together with their events, notifications
/// and friendships.
pub async fn delete_me(auth: AuthUser, State(state): State<AppState>) -> AppResult<StatusCode> {
    accounts::delete_account(&state, auth.identity).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/users/search
///
/// Exact email lookup of another user's public profile.
pub async fn search(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<SearchUserRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = accounts::search_account(&state, auth.identity, input).await?;
    Ok(Json(DataResponse { data: user }))
}

/// GET /api/v1/friends
pub async fn list_friends(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let friends = accounts::list_friends(&state, auth.identity).await?;
    Ok(Json(DataResponse { data: friends }))
}
