//! Company compatibility filter.
//!
//! Decides which active leasing companies can serve a given application.
//! An unset bound means "no constraint on that side"; zero or negative
//! amounts are a form-validation concern and are not rejected here.

use crate::leasing::LeasingType;
use crate::types::Money;

/// The application fields the filter consumes.
#[derive(Debug, Clone, Copy)]
pub struct ApplicationTerms {
    pub object_cost: Money,
    pub term_months: i32,
    pub leasing_type: LeasingType,
    pub is_new_object: bool,
}

/// The company fields the filter consumes.
#[derive(Debug, Clone)]
pub struct CompanyTerms {
    pub is_active: bool,
    pub min_amount: Option<Money>,
    pub max_amount: Option<Money>,
    pub min_term_months: Option<i32>,
    pub max_term_months: Option<i32>,
    pub works_with_auto: bool,
    pub works_with_equipment: bool,
    pub works_with_real_estate: bool,
    pub works_with_used: bool,
}

/// Whether `company` can serve `app`: active, amount and term within the
/// company's bounds, the object-category flag set, and (for used objects)
/// the used-object flag set.
pub fn is_compatible(app: &ApplicationTerms, company: &CompanyTerms) -> bool {
    if !company.is_active {
        return false;
    }
    if let Some(min) = company.min_amount {
        if app.object_cost < min {
            return false;
        }
    }
    if let Some(max) = company.max_amount {
        if app.object_cost > max {
            return false;
        }
    }
    if let Some(min) = company.min_term_months {
        if app.term_months < min {
            return false;
        }
    }
    if let Some(max) = company.max_term_months {
        if app.term_months > max {
            return false;
        }
    }
    let type_ok = match app.leasing_type {
        LeasingType::Auto => company.works_with_auto,
        LeasingType::Equipment => company.works_with_equipment,
        LeasingType::RealEstate => company.works_with_real_estate,
    };
    if !type_ok {
        return false;
    }
    if !app.is_new_object && !company.works_with_used {
        return false;
    }
    true
}
