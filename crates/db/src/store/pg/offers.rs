//! `leasing_offers` table queries.

use async_trait::async_trait;
use leaseflow_core::error::CoreError;
use leaseflow_core::types::DbId;

use crate::models::offer::{CreateOffer, LeasingOffer};
use crate::store::{OfferStore, StoreResult};

use super::PgStorage;

/// Column list for `leasing_offers` queries.
pub(super) const COLUMNS: &str =
    "id, application_id, company_id, manager_id, monthly_payment, first_payment, \
     buyout_payment, total_cost, interest_rate, is_selected, created_at";

#[async_trait]
impl OfferStore for PgStorage {
    async fn create_offer(&self, input: CreateOffer) -> StoreResult<LeasingOffer> {
        let query = format!(
            "INSERT INTO leasing_offers \
             (application_id, company_id, manager_id, monthly_payment, first_payment, \
              buyout_payment, total_cost, interest_rate) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LeasingOffer>(&query)
            .bind(input.application_id)
            .bind(input.company_id)
            .bind(input.manager_id)
            .bind(input.monthly_payment)
            .bind(input.first_payment)
            .bind(input.buyout_payment)
            .bind(input.total_cost)
            .bind(input.interest_rate)
            .fetch_one(self.pool())
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                    CoreError::NotFound {
                        entity: "LeasingApplication",
                        id: input.application_id,
                    }
                    .into()
                }
                _ => e.into(),
            })
    }

    async fn get_offer(&self, id: DbId) -> StoreResult<Option<LeasingOffer>> {
        let query = format!("SELECT {COLUMNS} FROM leasing_offers WHERE id = $1");
        Ok(sqlx::query_as::<_, LeasingOffer>(&query)
            .bind(id)
            .fetch_optional(self.pool())
            .await?)
    }

    async fn list_offers_by_application(
        &self,
        application_id: DbId,
    ) -> StoreResult<Vec<LeasingOffer>> {
        let query = format!(
            "SELECT {COLUMNS} FROM leasing_offers \
             WHERE application_id = $1 \
             ORDER BY created_at"
        );
        Ok(sqlx::query_as::<_, LeasingOffer>(&query)
            .bind(application_id)
            .fetch_all(self.pool())
            .await?)
    }
}
