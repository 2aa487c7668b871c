//! Route definitions for the `/notifications` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::notification;
use crate::state::AppState;

/// Routes mounted at `/notifications`.
///
/// ```text
/// GET  /      -> list_notifications
/// POST /      -> send_notification
/// POST /{id}  -> reply_to_notification
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(notification::list_notifications).post(notification::send_notification),
        )
        .route("/{id}", post(notification::reply_to_notification))
}
