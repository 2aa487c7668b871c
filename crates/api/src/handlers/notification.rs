//! Handlers for the `/notifications` resource.
//!
//! All endpoints require authentication via [`AuthUser`].

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use eardis_core::types::DbId;
use eardis_db::models::notification::Notification;

use crate::error::{AppJson, AppPath, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::notifications::{self, NotificationReply, SendNotificationRequest};
use crate::state::AppState;

/// GET /api/v1/notifications
///
/// Everything addressed to the caller, newest first. An empty inbox is `[]`.
pub async fn list_notifications(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Notification>>>> {
    let notifications = notifications::list_notifications(&state, auth.identity).await?;
    Ok(Json(DataResponse {
        data: notifications,
    }))
}

/// POST /api/v1/notifications
///
/// Send a typed notification from the caller.
pub async fn send_notification(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(envelope): AppJson<SendNotificationRequest>,
) -> AppResult<StatusCode> {
    notifications::send_notification(&state, auth.identity, envelope).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/notifications/{id}
///
/// Accept (`response: true`) or decline a notification addressed to the caller.
pub async fn reply_to_notification(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(notification_id): AppPath<DbId>,
    AppJson(reply): AppJson<NotificationReply>,
) -> AppResult<StatusCode> {
    notifications::reply_to_notification(&state, auth.identity, notification_id, reply).await?;
    Ok(StatusCode::NO_CONTENT)
}
