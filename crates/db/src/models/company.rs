//! Leasing company entity models and DTOs.

use leaseflow_core::matching::CompanyTerms;
use leaseflow_core::types::{DbId, Money, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `leasing_companies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LeasingCompany {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub min_amount: Option<Money>,
    pub max_amount: Option<Money>,
    pub min_term_months: Option<i32>,
    pub max_term_months: Option<i32>,
    pub interest_rate: Option<Money>,
    pub works_with_auto: bool,
    pub works_with_equipment: bool,
    pub works_with_real_estate: bool,
    pub works_with_used: bool,
    pub created_at: Timestamp,
}

impl LeasingCompany {
    /// The subset of fields the compatibility filter consumes.
    pub fn terms(&self) -> CompanyTerms {
        CompanyTerms {
            is_active: self.is_active,
            min_amount: self.min_amount,
            max_amount: self.max_amount,
            min_term_months: self.min_term_months,
            max_term_months: self.max_term_months,
            works_with_auto: self.works_with_auto,
            works_with_equipment: self.works_with_equipment,
            works_with_real_estate: self.works_with_real_estate,
            works_with_used: self.works_with_used,
        }
    }
}

/// Input for creating a company (admin only).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCompany {
    pub name: String,
    pub description: Option<String>,
    pub min_amount: Option<Money>,
    pub max_amount: Option<Money>,
    pub min_term_months: Option<i32>,
    pub max_term_months: Option<i32>,
    pub interest_rate: Option<Money>,
    #[serde(default = "default_true")]
    pub works_with_auto: bool,
    #[serde(default = "default_true")]
    pub works_with_equipment: bool,
    #[serde(default = "default_true")]
    pub works_with_real_estate: bool,
    #[serde(default = "default_true")]
    pub works_with_used: bool,
}

fn default_true() -> bool {
    true
}
