//! Domain types and rules for the eardis backend.
//!
//! Everything in this crate is pure: no database, no HTTP. The API and
//! persistence crates build on these types.

pub mod error;
pub mod identity;
pub mod notification;
pub mod types;
pub mod validation;
