//! Leasing application entity models and DTOs.

use leaseflow_core::error::{CoreError, CoreResult};
use leaseflow_core::status::ApplicationStatus;
use leaseflow_core::types::{DbId, Money, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `leasing_applications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LeasingApplication {
    pub id: DbId,
    pub client_id: DbId,
    pub agent_id: Option<DbId>,
    pub object_cost: Money,
    /// Down payment as a percentage of object cost.
    pub down_payment_percent: Money,
    pub term_months: i32,
    pub leasing_type: String,
    pub client_phone: String,
    pub client_tax_id: String,
    pub is_new_object: bool,
    pub is_for_rental: bool,
    pub comment: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl LeasingApplication {
    /// Parse the stored status column into the workflow enum.
    ///
    /// A malformed value means the row was written outside the application
    /// and is surfaced as an internal error.
    pub fn workflow_status(&self) -> CoreResult<ApplicationStatus> {
        ApplicationStatus::parse(&self.status).map_err(CoreError::Internal)
    }
}

/// Input for creating an application. Status always starts at `pending`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateApplication {
    pub client_id: DbId,
    pub agent_id: Option<DbId>,
    pub object_cost: Money,
    pub down_payment_percent: Money,
    pub term_months: i32,
    pub leasing_type: String,
    pub client_phone: String,
    pub client_tax_id: String,
    #[serde(default = "default_true")]
    pub is_new_object: bool,
    #[serde(default)]
    pub is_for_rental: bool,
    pub comment: Option<String>,
}

fn default_true() -> bool {
    true
}
