//! Route definitions for the `/events` resource.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::events;
use crate::state::AppState;

/// Routes mounted at `/events`.
///
/// ```text
/// GET    /      -> list_events
/// POST   /      -> create_event
/// PATCH  /{id}  -> patch_event
/// DELETE /{id}  -> delete_event
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(events::list_events).post(events::create_event))
        .route(
            "/{id}",
            patch(events::patch_event).delete(events::delete_event),
        )
}
