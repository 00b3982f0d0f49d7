//! Car catalog entity models and DTOs.

use leaseflow_core::types::{DbId, Money, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Lifecycle states for a catalog car.
pub const CAR_AVAILABLE: &str = "available";
pub const CAR_RESERVED: &str = "reserved";
pub const CAR_SOLD: &str = "sold";

/// A row from the `cars` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Car {
    pub id: DbId,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub price: Money,
    pub engine: Option<String>,
    pub transmission: Option<String>,
    pub drive: Option<String>,
    pub status: String,
    pub is_new: bool,
    pub supplier_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for adding a car to the catalog (supplier only).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCar {
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub price: Money,
    pub engine: Option<String>,
    pub transmission: Option<String>,
    pub drive: Option<String>,
    #[serde(default = "default_true")]
    pub is_new: bool,
    #[serde(skip)]
    pub supplier_id: Option<DbId>,
}

fn default_true() -> bool {
    true
}

/// Catalog search filters; every field is optional and ANDed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CarFilter {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub min_price: Option<Money>,
    pub max_price: Option<Money>,
    pub is_new: Option<bool>,
}

impl CarFilter {
    /// Whether any filter is set (an empty filter lists the whole catalog).
    pub fn is_empty(&self) -> bool {
        self.brand.is_none()
            && self.model.is_none()
            && self.year.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.is_new.is_none()
    }
}
