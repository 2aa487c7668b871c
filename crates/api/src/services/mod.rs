//! Identity-scoped operations behind the HTTP handlers.
//!
//! Every function takes the caller's [`Identity`](eardis_core::identity::Identity)
//! explicitly (where one is required) and returns a [`CoreError`] with a
//! caller-safe message. Raw [`StoreError`]s never leave this module; their
//! cause is logged here instead.

use std::future::Future;

use eardis_core::error::CoreError;
use eardis_db::StoreError;

use crate::state::AppState;

pub mod accounts;
pub mod events;
pub mod notifications;

/// Run a store call under the configured deadline.
pub(crate) async fn bounded<T, F>(state: &AppState, call: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    tokio::time::timeout(state.config.store_timeout(), call)
        .await
        .unwrap_or(Err(StoreError::Timeout))
}

/// Log a store failure no operation expects and hide it behind `Internal`.
pub(crate) fn unexpected(operation: &'static str, err: StoreError) -> CoreError {
    tracing::error!(operation, error = %err, "Store call failed");
    CoreError::Internal(format!("{operation}: {err}"))
}
