//! Leasing offer entity models and DTOs.

use leaseflow_core::types::{DbId, Money, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `leasing_offers` table.
///
/// At most one offer per application has `is_selected = true`; the storage
/// layer maintains the invariant on selection.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LeasingOffer {
    pub id: DbId,
    pub application_id: DbId,
    pub company_id: DbId,
    pub manager_id: Option<DbId>,
    pub monthly_payment: Money,
    pub first_payment: Money,
    pub buyout_payment: Money,
    pub total_cost: Money,
    pub interest_rate: Option<Money>,
    pub is_selected: bool,
    pub created_at: Timestamp,
}

/// Input for creating an offer. Offers are never created pre-selected.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOffer {
    pub application_id: DbId,
    pub company_id: DbId,
    pub manager_id: Option<DbId>,
    pub monthly_payment: Money,
    pub first_payment: Money,
    pub buyout_payment: Money,
    pub total_cost: Money,
    pub interest_rate: Option<Money>,
}
