//! Handlers for the `/events` resource.
//!
//! All endpoints require authentication and only ever see the caller's events.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use eardis_core::types::DbId;
use eardis_db::models::event::Event;

use crate::error::{AppJson, AppPath, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::events::{self, CreateEventRequest, UpdateEventRequest};
use crate::state::AppState;

/// GET /api/v1/events
pub async fn list_events(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Event>>>> {
    let events = events::list_events(&state, auth.identity).await?;
    Ok(Json(DataResponse { data: events }))
}

/// POST /api/v1/events
///
/// The creation result is not echoed back.
pub async fn create_event(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateEventRequest>,
) -> AppResult<StatusCode> {
    events::create_event(&state, auth.identity, input).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/events/{id}
pub async fn patch_event(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(event_id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateEventRequest>,
) -> AppResult<StatusCode> {
    events::patch_event(&state, auth.identity, event_id, input).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/events/{id}
pub async fn delete_event(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(event_id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    events::delete_event(&state, auth.identity, event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
