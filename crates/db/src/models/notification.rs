//! In-app notification entity models and DTOs.

use leaseflow_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub message: String,
    /// One of `info`, `success`, `warning`, `error`.
    pub kind: String,
    pub is_read: bool,
    pub created_at: Timestamp,
}

/// Input for creating a notification. Always starts unread.
#[derive(Debug, Clone)]
pub struct CreateNotification {
    pub user_id: DbId,
    pub title: String,
    pub message: String,
    pub kind: String,
}
