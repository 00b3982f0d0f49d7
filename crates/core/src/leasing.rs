//! Leasing object categories and notification kind constants.

use serde::{Deserialize, Serialize};

/// The category of object a leasing application is for.
///
/// Serialized as the snake_case strings stored in the `leasing_type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeasingType {
    Auto,
    Equipment,
    RealEstate,
}

impl LeasingType {
    /// The canonical column value for this type.
    pub fn as_str(self) -> &'static str {
        match self {
            LeasingType::Auto => "auto",
            LeasingType::Equipment => "equipment",
            LeasingType::RealEstate => "real_estate",
        }
    }

    /// Parse a stored column value.
    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "auto" => Ok(LeasingType::Auto),
            "equipment" => Ok(LeasingType::Equipment),
            "real_estate" => Ok(LeasingType::RealEstate),
            other => Err(format!(
                "Invalid leasing type '{other}'. Must be one of: auto, equipment, real_estate"
            )),
        }
    }
}

impl std::fmt::Display for LeasingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notification kinds consumed by the client UI.
pub const NOTIFY_INFO: &str = "info";
pub const NOTIFY_SUCCESS: &str = "success";
pub const NOTIFY_WARNING: &str = "warning";
pub const NOTIFY_ERROR: &str = "error";
