use std::sync::Arc;

use eardis_db::Store;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; nothing in here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    /// Persistence backend (PostgreSQL in production, in-memory in tests).
    pub store: Arc<dyn Store>,
    /// Server configuration (JWT settings, store deadline, cookie flags).
    pub config: Arc<ServerConfig>,
}
