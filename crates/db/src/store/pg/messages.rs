//! `application_messages` table queries.

use async_trait::async_trait;
use leaseflow_core::error::CoreError;
use leaseflow_core::types::DbId;

use crate::models::message::{ApplicationMessage, CreateMessage};
use crate::store::{MessageStore, StoreResult};

use super::PgStorage;

/// Column list for `application_messages` queries.
const COLUMNS: &str = "id, application_id, sender_id, body, is_system, created_at";

#[async_trait]
impl MessageStore for PgStorage {
    async fn create_message(&self, input: CreateMessage) -> StoreResult<ApplicationMessage> {
        let query = format!(
            "INSERT INTO application_messages (application_id, sender_id, body, is_system) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ApplicationMessage>(&query)
            .bind(input.application_id)
            .bind(input.sender_id)
            .bind(&input.body)
            .bind(input.is_system)
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

    async fn list_messages_for_application(
        &self,
        application_id: DbId,
    ) -> StoreResult<Vec<ApplicationMessage>> {
        let query = format!(
            "SELECT {COLUMNS} FROM application_messages \
             WHERE application_id = $1 \
             ORDER BY created_at, id"
        );
        Ok(sqlx::query_as::<_, ApplicationMessage>(&query)
            .bind(application_id)
            .fetch_all(self.pool())
            .await?)
    }
}
