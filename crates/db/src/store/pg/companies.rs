//! `leasing_companies` table queries.

use async_trait::async_trait;
use leaseflow_core::types::DbId;

use crate::models::company::{CreateCompany, LeasingCompany};
use crate::store::{CompanyStore, StoreResult};

use super::{classify_unique_violation, PgStorage};

/// Column list for `leasing_companies` queries.
pub(super) const COLUMNS: &str =
    "id, name, description, is_active, min_amount, max_amount, min_term_months, \
     max_term_months, interest_rate, works_with_auto, works_with_equipment, \
     works_with_real_estate, works_with_used, created_at";

#[async_trait]
impl CompanyStore for PgStorage {
    async fn create_company(&self, input: CreateCompany) -> StoreResult<LeasingCompany> {
        let query = format!(
            "INSERT INTO leasing_companies \
             (name, description, min_amount, max_amount, min_term_months, max_term_months, \
              interest_rate, works_with_auto, works_with_equipment, works_with_real_estate, \
              works_with_used) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LeasingCompany>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.min_amount)
            .bind(input.max_amount)
            .bind(input.min_term_months)
            .bind(input.max_term_months)
            .bind(input.interest_rate)
            .bind(input.works_with_auto)
            .bind(input.works_with_equipment)
            .bind(input.works_with_real_estate)
            .bind(input.works_with_used)
            .fetch_one(self.pool())
            .await
            .map_err(|e| {
                classify_unique_violation(
                    e,
                    &format!("Company '{}' already exists", input.name),
                )
            })
    }

    async fn get_company(&self, id: DbId) -> StoreResult<Option<LeasingCompany>> {
        let query = format!("SELECT {COLUMNS} FROM leasing_companies WHERE id = $1");
        Ok(sqlx::query_as::<_, LeasingCompany>(&query)
            .bind(id)
            .fetch_optional(self.pool())
            .await?)
    }

    async fn list_active_companies(&self) -> StoreResult<Vec<LeasingCompany>> {
        let query = format!(
            "SELECT {COLUMNS} FROM leasing_companies \
             WHERE is_active = true \
             ORDER BY name"
        );
        Ok(sqlx::query_as::<_, LeasingCompany>(&query)
            .fetch_all(self.pool())
            .await?)
    }

    async fn list_all_companies(&self) -> StoreResult<Vec<LeasingCompany>> {
        let query = format!("SELECT {COLUMNS} FROM leasing_companies ORDER BY name");
        Ok(sqlx::query_as::<_, LeasingCompany>(&query)
            .fetch_all(self.pool())
            .await?)
    }
}
