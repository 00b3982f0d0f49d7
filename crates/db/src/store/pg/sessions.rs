//! `sessions` table queries.

use async_trait::async_trait;
use leaseflow_core::types::DbId;

use crate::models::session::{CreateSession, Session};
use crate::store::{SessionStore, StoreResult};

use super::PgStorage;

/// Column list for `sessions` queries.
const COLUMNS: &str = "id, user_id, refresh_token_hash, expires_at, revoked_at, created_at";

#[async_trait]
impl SessionStore for PgStorage {
    async fn create_session(&self, input: CreateSession) -> StoreResult<Session> {
        let query = format!(
            "INSERT INTO sessions (user_id, refresh_token_hash, expires_at) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Session>(&query)
            .bind(input.user_id)
            .bind(&input.refresh_token_hash)
            .bind(input.expires_at)
            .fetch_one(self.pool())
            .await?)
    }

    async fn find_session_by_token_hash(&self, hash: &str) -> StoreResult<Option<Session>> {
        let query = format!(
            "SELECT {COLUMNS} FROM sessions \
             WHERE refresh_token_hash = $1 \
               AND revoked_at IS NULL \
               AND expires_at > NOW()"
        );
        Ok(sqlx::query_as::<_, Session>(&query)
            .bind(hash)
            .fetch_optional(self.pool())
            .await?)
    }

    async fn revoke_session(&self, id: DbId) -> StoreResult<()> {
        sqlx::query("UPDATE sessions SET revoked_at = NOW() WHERE id = $1 AND revoked_at IS NULL")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    async fn revoke_all_sessions_for_user(&self, user_id: DbId) -> StoreResult<()> {
        sqlx::query(
            "UPDATE sessions SET revoked_at = NOW() WHERE user_id = $1 AND revoked_at IS NULL",
        )
        .bind(user_id)
        .execute(self.pool())
        .await?;
        Ok(())
    }
}
