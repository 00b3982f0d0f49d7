//! Handlers for the `/cars` catalog resource.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use leaseflow_core::error::CoreError;
use leaseflow_core::types::Money;
use leaseflow_db::models::car::{Car, CarFilter, CreateCar};
use leaseflow_db::store::CarStore;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireSupplier;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /cars`.
#[derive(Debug, Deserialize)]
pub struct CreateCarRequest {
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub price: Money,
    pub engine: Option<String>,
    pub transmission: Option<String>,
    pub drive: Option<String>,
    #[serde(default = "default_true")]
    pub is_new: bool,
}

fn default_true() -> bool {
    true
}

/// GET /api/v1/cars
///
/// Search the catalog; all query parameters are optional and ANDed.
pub async fn list_cars(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(filter): Query<CarFilter>,
) -> AppResult<Json<DataResponse<Vec<Car>>>> {
    let cars = state.storage.list_cars(&filter).await?;
    Ok(Json(DataResponse { data: cars }))
}

/// POST /api/v1/cars
///
/// Add a car to the catalog. Suppliers only; the car is attributed to the
/// supplier.
pub async fn create_car(
    State(state): State<AppState>,
    RequireSupplier(supplier): RequireSupplier,
    Json(input): Json<CreateCarRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Car>>)> {
    if input.brand.trim().is_empty() || input.model.trim().is_empty() {
        return Err(CoreError::Validation("Brand and model are required".into()).into());
    }
    if input.price <= Money::ZERO {
        return Err(CoreError::Validation("Price must be positive".into()).into());
    }

    let car = state
        .storage
        .create_car(CreateCar {
            brand: input.brand,
            model: input.model,
            year: input.year,
            price: input.price,
            engine: input.engine,
            transmission: input.transmission,
            drive: input.drive,
            is_new: input.is_new,
            supplier_id: Some(supplier.user_id),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: car })))
}

/// GET /api/v1/cars/mine
///
/// The authenticated supplier's own listings.
pub async fn my_cars(
    State(state): State<AppState>,
    RequireSupplier(supplier): RequireSupplier,
) -> AppResult<Json<DataResponse<Vec<Car>>>> {
    let cars = state.storage.list_cars_by_supplier(supplier.user_id).await?;
    Ok(Json(DataResponse { data: cars }))
}
