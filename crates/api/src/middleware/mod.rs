//! Request extractors shared by the handlers.
//!
//! - [`auth::AuthUser`] -- resolves the caller's [`Identity`](eardis_core::identity::Identity)
//!   from the access token.

pub mod auth;
