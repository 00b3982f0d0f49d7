//! Refresh-token session entity models and DTOs.

use leaseflow_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `sessions` table.
///
/// Only the SHA-256 hash of the refresh token is stored; the plaintext is
/// sent to the client once and never persisted.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Session {
    pub id: DbId,
    pub user_id: DbId,
    #[serde(skip_serializing)]
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// Input for creating a session on login or token rotation.
#[derive(Debug, Clone)]
pub struct CreateSession {
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
}
