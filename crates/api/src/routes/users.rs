//! Route definitions for the `/users` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /me      -> get_me
/// DELETE /me      -> delete_me
/// POST   /search  -> search
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(users::get_me).delete(users::delete_me))
        .route("/search", post(users::search))
}
