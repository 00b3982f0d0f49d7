//! `notifications` table queries.

use async_trait::async_trait;
use leaseflow_core::types::DbId;

use crate::models::notification::{CreateNotification, Notification};
use crate::store::{NotificationStore, StoreResult, NOTIFICATION_PAGE};

use super::PgStorage;

/// Column list for `notifications` queries.
const COLUMNS: &str = "id, user_id, title, message, kind, is_read, created_at";

#[async_trait]
impl NotificationStore for PgStorage {
    async fn create_notification(
        &self,
        input: CreateNotification,
    ) -> StoreResult<Notification> {
        let query = format!(
            "INSERT INTO notifications (user_id, title, message, kind) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Notification>(&query)
            .bind(input.user_id)
            .bind(&input.title)
            .bind(&input.message)
            .bind(&input.kind)
            .fetch_one(self.pool())
            .await?)
    }

    async fn list_notifications_for_user(
        &self,
        user_id: DbId,
    ) -> StoreResult<Vec<Notification>> {
        let query = format!(
            "SELECT {COLUMNS} FROM notifications \
             WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2"
        );
        Ok(sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(NOTIFICATION_PAGE)
            .fetch_all(self.pool())
            .await?)
    }

    async fn mark_notification_read(
        &self,
        notification_id: DbId,
        user_id: DbId,
    ) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE notifications \
             SET is_read = true \
             WHERE id = $1 AND user_id = $2",
        )
        .bind(notification_id)
        .bind(user_id)
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn unread_count(&self, user_id: DbId) -> StoreResult<i64> {
        Ok(sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .fetch_one(self.pool())
        .await?)
    }
}
