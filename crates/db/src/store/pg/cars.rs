//! `cars` table queries.

use async_trait::async_trait;
use leaseflow_core::types::DbId;

use crate::models::car::{Car, CarFilter, CreateCar, CAR_AVAILABLE};
use crate::store::{CarStore, StoreResult};

use super::PgStorage;

/// Column list for `cars` queries.
const COLUMNS: &str = "id, brand, model, year, price, engine, transmission, drive, \
     status, is_new, supplier_id, created_at, updated_at";

#[async_trait]
impl CarStore for PgStorage {
    async fn create_car(&self, input: CreateCar) -> StoreResult<Car> {
        let query = format!(
            "INSERT INTO cars \
             (brand, model, year, price, engine, transmission, drive, status, is_new, supplier_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Car>(&query)
            .bind(&input.brand)
            .bind(&input.model)
            .bind(input.year)
            .bind(input.price)
            .bind(&input.engine)
            .bind(&input.transmission)
            .bind(&input.drive)
            .bind(CAR_AVAILABLE)
            .bind(input.is_new)
            .bind(input.supplier_id)
            .fetch_one(self.pool())
            .await?)
    }

    async fn list_cars(&self, filter: &CarFilter) -> StoreResult<Vec<Car>> {
        // Every filter field is optional; NULL binds disable their clause.
        let query = format!(
            "SELECT {COLUMNS} FROM cars \
             WHERE ($1::text IS NULL OR brand ILIKE $1) \
               AND ($2::text IS NULL OR model ILIKE $2) \
               AND ($3::int IS NULL OR year = $3) \
               AND ($4::numeric IS NULL OR price >= $4) \
               AND ($5::numeric IS NULL OR price <= $5) \
               AND ($6::boolean IS NULL OR is_new = $6) \
             ORDER BY created_at DESC"
        );
        Ok(sqlx::query_as::<_, Car>(&query)
            .bind(&filter.brand)
            .bind(&filter.model)
            .bind(filter.year)
            .bind(filter.min_price)
            .bind(filter.max_price)
            .bind(filter.is_new)
            .fetch_all(self.pool())
            .await?)
    }

    async fn list_cars_by_supplier(&self, supplier_id: DbId) -> StoreResult<Vec<Car>> {
        let query = format!(
            "SELECT {COLUMNS} FROM cars \
             WHERE supplier_id = $1 \
             ORDER BY created_at DESC"
        );
        Ok(sqlx::query_as::<_, Car>(&query)
            .bind(supplier_id)
            .fetch_all(self.pool())
            .await?)
    }
}
