//! `leasing_applications` table queries.

use async_trait::async_trait;
use leaseflow_core::error::CoreError;
use leaseflow_core::leasing::LeasingType;
use leaseflow_core::status::ApplicationStatus;
use leaseflow_core::types::DbId;

use crate::models::application::{CreateApplication, LeasingApplication};
use crate::store::{ApplicationStore, StoreResult};

use super::PgStorage;

/// Column list for `leasing_applications` queries.
pub(super) const COLUMNS: &str =
    "id, client_id, agent_id, object_cost, down_payment_percent, term_months, \
     leasing_type, client_phone, client_tax_id, is_new_object, is_for_rental, \
     comment, status, created_at, updated_at";

#[async_trait]
impl ApplicationStore for PgStorage {
    async fn create_application(
        &self,
        input: CreateApplication,
    ) -> StoreResult<LeasingApplication> {
        LeasingType::parse(&input.leasing_type).map_err(CoreError::Validation)?;
        let query = format!(
            "INSERT INTO leasing_applications \
             (client_id, agent_id, object_cost, down_payment_percent, term_months, \
              leasing_type, client_phone, client_tax_id, is_new_object, is_for_rental, \
              comment, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {COLUMNS}"
        );
        Ok(sqlx::query_as::<_, LeasingApplication>(&query)
            .bind(input.client_id)
            .bind(input.agent_id)
            .bind(input.object_cost)
            .bind(input.down_payment_percent)
            .bind(input.term_months)
            .bind(&input.leasing_type)
            .bind(&input.client_phone)
            .bind(&input.client_tax_id)
            .bind(input.is_new_object)
            .bind(input.is_for_rental)
            .bind(&input.comment)
            .bind(ApplicationStatus::Pending.as_str())
            .fetch_one(self.pool())
            .await?)
    }

    async fn get_application(&self, id: DbId) -> StoreResult<Option<LeasingApplication>> {
        let query = format!("SELECT {COLUMNS} FROM leasing_applications WHERE id = $1");
        Ok(sqlx::query_as::<_, LeasingApplication>(&query)
            .bind(id)
            .fetch_optional(self.pool())
            .await?)
    }

    async fn list_applications(&self) -> StoreResult<Vec<LeasingApplication>> {
        let query =
            format!("SELECT {COLUMNS} FROM leasing_applications ORDER BY created_at DESC");
        Ok(sqlx::query_as::<_, LeasingApplication>(&query)
            .fetch_all(self.pool())
            .await?)
    }

    async fn list_applications_by_client(
        &self,
        client_id: DbId,
    ) -> StoreResult<Vec<LeasingApplication>> {
        let query = format!(
            "SELECT {COLUMNS} FROM leasing_applications \
             WHERE client_id = $1 \
             ORDER BY created_at DESC"
        );
        Ok(sqlx::query_as::<_, LeasingApplication>(&query)
            .bind(client_id)
            .fetch_all(self.pool())
            .await?)
    }

    async fn list_applications_by_agent(
        &self,
        agent_id: DbId,
    ) -> StoreResult<Vec<LeasingApplication>> {
        let query = format!(
            "SELECT {COLUMNS} FROM leasing_applications \
             WHERE agent_id = $1 \
             ORDER BY created_at DESC"
        );
        Ok(sqlx::query_as::<_, LeasingApplication>(&query)
            .bind(agent_id)
            .fetch_all(self.pool())
            .await?)
    }

    async fn list_applications_by_status(
        &self,
        status: ApplicationStatus,
    ) -> StoreResult<Vec<LeasingApplication>> {
        let query = format!(
            "SELECT {COLUMNS} FROM leasing_applications \
             WHERE status = $1 \
             ORDER BY created_at DESC"
        );
        Ok(sqlx::query_as::<_, LeasingApplication>(&query)
            .bind(status.as_str())
            .fetch_all(self.pool())
            .await?)
    }
}
