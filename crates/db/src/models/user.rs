//! User entity models and DTOs.

use leaseflow_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `users` table.
///
/// The password hash is deliberately excluded from serialization so user
/// records can be returned from handlers without leaking credentials.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: String,
    pub phone: Option<String>,
    pub tax_id: Option<String>,
    /// Leasing company the user works for. Only set for managers.
    pub company_id: Option<DbId>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for creating a user. The password arrives already hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub password_hash: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: String,
    pub phone: Option<String>,
    pub tax_id: Option<String>,
    pub company_id: Option<DbId>,
}

/// Partial update applied by admins or by profile edits.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub tax_id: Option<String>,
    pub company_id: Option<DbId>,
    pub is_active: Option<bool>,
}
