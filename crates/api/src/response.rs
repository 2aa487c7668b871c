//! Shared response envelope types for API handlers.
//!
//! Payload-bearing responses use a `{ "data": ... }` envelope; operations
//! without a payload answer `204 No Content`.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: events }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
