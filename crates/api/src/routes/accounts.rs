//! Public account routes, mounted directly under `/api/v1`.

use axum::routing::post;
use axum::Router;

use crate::handlers::accounts;
use crate::state::AppState;

/// ```text
/// POST /login     -> login
/// POST /accounts  -> register
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(accounts::login))
        .route("/accounts", post(accounts::register))
}
