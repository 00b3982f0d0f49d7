//! Handlers for the public `/companies` resource.

use axum::extract::{Path, State};
use axum::Json;
use leaseflow_core::error::CoreError;
use leaseflow_core::types::DbId;
use leaseflow_db::models::company::LeasingCompany;
use leaseflow_db::store::CompanyStore;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/companies
///
/// Active leasing companies, the listing shown to clients.
pub async fn list_companies(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<LeasingCompany>>>> {
    let companies = state.storage.list_active_companies().await?;
    Ok(Json(DataResponse { data: companies }))
}

/// GET /api/v1/companies/{id}
pub async fn get_company(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<LeasingCompany>>> {
    let company = state
        .storage
        .get_company(id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "LeasingCompany",
            id,
        })?;
    Ok(Json(DataResponse { data: company }))
}
