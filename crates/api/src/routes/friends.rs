use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/friends`.
///
/// ```text
/// GET /  -> list_friends
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(users::list_friends))
}
