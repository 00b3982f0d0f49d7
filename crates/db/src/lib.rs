//! Persistence layer: entity models, the storage façade, and its two
//! implementations (Postgres via sqlx, and in-memory for development and
//! tests).

pub mod models;
pub mod store;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Connection pool type used across the workspace.
pub type DbPool = PgPool;

/// Default maximum number of pooled connections.
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Create a connection pool against the given `DATABASE_URL`.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(DEFAULT_MAX_CONNECTIONS)
        .connect(database_url)
        .await
}

/// Verify the database is reachable with a trivial round trip.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await?;
    Ok(())
}

/// Apply any pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
