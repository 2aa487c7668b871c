pub mod accounts;
pub mod events;
pub mod friends;
pub mod health;
pub mod notifications;
pub mod users;

use axum::Router;

use crate::error::method_not_allowed;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /login                          login (public)
/// /accounts                       register (public)
///
/// /events                         list, create
/// /events/{id}                    patch, delete
///
/// /notifications                  list, send
/// /notifications/{id}             reply (accept / decline)
///
/// /users/me                       get, delete own account
/// /users/search                   lookup by email
///
/// /friends                        list friends
/// ```
///
/// A known path hit with an unsupported method answers with a JSON
/// `METHOD_NOT_ALLOWED` error.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(accounts::router())
        .nest("/events", events::router())
        .nest("/notifications", notifications::router())
        .nest("/users", users::router())
        .nest("/friends", friends::router())
        .method_not_allowed_fallback(method_not_allowed)
}
