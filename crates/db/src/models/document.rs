//! Application document entity models and DTOs.

use leaseflow_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `documents` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Document {
    pub id: DbId,
    pub application_id: DbId,
    pub file_name: String,
    pub file_url: String,
    pub document_type: String,
    pub uploaded_by: DbId,
    pub created_at: Timestamp,
}

/// Input for attaching a document to an application.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDocument {
    pub application_id: DbId,
    pub file_name: String,
    pub file_url: String,
    pub document_type: String,
    #[serde(skip)]
    pub uploaded_by: DbId,
}
