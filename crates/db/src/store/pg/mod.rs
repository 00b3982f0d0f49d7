//! Postgres storage implementation.
//!
//! One file per concern, matching the trait split in the parent module.
//! Workflow operations run inside a single transaction each.

mod applications;
mod cars;
mod companies;
mod documents;
mod messages;
mod notifications;
mod offers;
mod sessions;
mod users;
mod workflow;

use leaseflow_core::error::CoreError;

use crate::DbPool;

use super::StoreError;

/// Postgres-backed [`super::Storage`] implementation.
pub struct PgStorage {
    pool: DbPool,
}

impl PgStorage {
    pub fn new(pool: DbPool) -> Self {
        PgStorage { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Map a unique-constraint violation onto a domain conflict; everything
/// else stays a database error.
pub(crate) fn classify_unique_violation(err: sqlx::Error, conflict: &str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return CoreError::Conflict(conflict.to_string()).into();
        }
    }
    StoreError::Database(err)
}
