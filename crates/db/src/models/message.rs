//! Application message-thread entity models and DTOs.

use leaseflow_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `application_messages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ApplicationMessage {
    pub id: DbId,
    pub application_id: DbId,
    pub sender_id: DbId,
    pub body: String,
    /// System messages record workflow events (approval, rejection).
    pub is_system: bool,
    pub created_at: Timestamp,
}

/// Input for posting a message on an application thread.
#[derive(Debug, Clone)]
pub struct CreateMessage {
    pub application_id: DbId,
    pub sender_id: DbId,
    pub body: String,
    pub is_system: bool,
}
