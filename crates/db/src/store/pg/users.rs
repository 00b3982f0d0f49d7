//! `users` table queries.

use async_trait::async_trait;
use leaseflow_core::types::DbId;

use crate::models::user::{CreateUser, UpdateUser, User};
use crate::store::{StoreResult, UserStore};

use super::{classify_unique_violation, PgStorage};

/// Column list for `users` queries.
const COLUMNS: &str = "id, username, password_hash, email, first_name, last_name, role, \
     phone, tax_id, company_id, is_active, created_at, updated_at";

#[async_trait]
impl UserStore for PgStorage {
    async fn create_user(&self, input: CreateUser) -> StoreResult<User> {
        let query = format!(
            "INSERT INTO users \
             (username, password_hash, email, first_name, last_name, role, phone, tax_id, company_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.password_hash)
            .bind(&input.email)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.role)
            .bind(&input.phone)
            .bind(&input.tax_id)
            .bind(input.company_id)
            .fetch_one(self.pool())
            .await
            .map_err(|e| {
                classify_unique_violation(
                    e,
                    &format!("Username '{}' is already taken", input.username),
                )
            })
    }

    async fn get_user(&self, id: DbId) -> StoreResult<Option<User>> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        Ok(sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(self.pool())
            .await?)
    }

    async fn get_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        Ok(sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(self.pool())
            .await?)
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY id");
        Ok(sqlx::query_as::<_, User>(&query)
            .fetch_all(self.pool())
            .await?)
    }

    async fn update_user(&self, id: DbId, input: UpdateUser) -> StoreResult<Option<User>> {
        let query = format!(
            "UPDATE users SET \
             email = COALESCE($2, email), \
             first_name = COALESCE($3, first_name), \
             last_name = COALESCE($4, last_name), \
             phone = COALESCE($5, phone), \
             tax_id = COALESCE($6, tax_id), \
             company_id = COALESCE($7, company_id), \
             is_active = COALESCE($8, is_active), \
             updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        Ok(sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.email)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.phone)
            .bind(&input.tax_id)
            .bind(input.company_id)
            .bind(input.is_active)
            .fetch_optional(self.pool())
            .await?)
    }

    async fn delete_user(&self, id: DbId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
