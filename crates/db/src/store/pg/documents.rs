//! `documents` table queries.

use async_trait::async_trait;
use leaseflow_core::error::CoreError;
use leaseflow_core::types::DbId;

use crate::models::document::{CreateDocument, Document};
use crate::store::{DocumentStore, StoreResult};

use super::PgStorage;

/// Column list for `documents` queries.
const COLUMNS: &str =
    "id, application_id, file_name, file_url, document_type, uploaded_by, created_at";

#[async_trait]
impl DocumentStore for PgStorage {
    async fn create_document(&self, input: CreateDocument) -> StoreResult<Document> {
        let query = format!(
            "INSERT INTO documents \
             (application_id, file_name, file_url, document_type, uploaded_by) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(input.application_id)
            .bind(&input.file_name)
            .bind(&input.file_url)
            .bind(&input.document_type)
            .bind(input.uploaded_by)
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

    async fn list_documents_by_application(
        &self,
        application_id: DbId,
    ) -> StoreResult<Vec<Document>> {
        let query = format!(
            "SELECT {COLUMNS} FROM documents \
             WHERE application_id = $1 \
             ORDER BY created_at"
        );
        Ok(sqlx::query_as::<_, Document>(&query)
            .bind(application_id)
            .fetch_all(self.pool())
            .await?)
    }
}
