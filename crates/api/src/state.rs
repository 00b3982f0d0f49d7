use std::sync::Arc;

use leaseflow_db::store::Storage;
use leaseflow_db::DbPool;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; all inner data is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Storage backend. Injected at startup so handlers never care whether
    /// they run against Postgres or the in-memory store.
    pub storage: Arc<dyn Storage>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Database pool, present only when running on the Postgres backend.
    /// Used by the health check.
    pub pool: Option<DbPool>,
}
