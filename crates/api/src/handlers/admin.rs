//! Handlers for the `/admin` resource: user and company management.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use leaseflow_core::error::CoreError;
use leaseflow_core::roles::validate_role;
use leaseflow_core::types::DbId;
use leaseflow_db::models::company::{CreateCompany, LeasingCompany};
use leaseflow_db::models::user::{CreateUser, UpdateUser, User};
use leaseflow_db::store::{CompanyStore, UserStore};
use serde::Deserialize;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /admin/users`.
///
/// Unlike self-registration this can create any role, including managers
/// attached to a leasing company.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: String,
    pub phone: Option<String>,
    pub tax_id: Option<String>,
    pub company_id: Option<DbId>,
}

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<User>>>> {
    let users = state.storage.list_users().await?;
    Ok(Json(DataResponse { data: users }))
}

/// POST /api/v1/admin/users
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<User>>)> {
    validate_role(&input.role).map_err(CoreError::Validation)?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(CoreError::Validation)?;

    if input.company_id.is_some() && input.role != leaseflow_core::roles::ROLE_MANAGER {
        return Err(CoreError::Validation(
            "Only managers can be attached to a leasing company".into(),
        )
        .into());
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = state
        .storage
        .create_user(CreateUser {
            username: input.username,
            password_hash,
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            role: input.role,
            phone: input.phone,
            tax_id: input.tax_id,
            company_id: input.company_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: user })))
}

/// GET /api/v1/admin/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<User>>> {
    let user = state
        .storage
        .get_user(id)
        .await?
        .ok_or(CoreError::NotFound { entity: "User", id })?;
    Ok(Json(DataResponse { data: user }))
}

/// PUT /api/v1/admin/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<Json<DataResponse<User>>> {
    let user = state
        .storage
        .update_user(id, input)
        .await?
        .ok_or(CoreError::NotFound { entity: "User", id })?;
    Ok(Json(DataResponse { data: user }))
}

/// DELETE /api/v1/admin/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if id == admin.user_id {
        return Err(CoreError::Conflict("Cannot delete your own account".into()).into());
    }
    let deleted = state.storage.delete_user(id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/admin/companies
///
/// Every company, active or not.
pub async fn list_companies(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<LeasingCompany>>>> {
    let companies = state.storage.list_all_companies().await?;
    Ok(Json(DataResponse { data: companies }))
}

/// POST /api/v1/admin/companies
pub async fn create_company(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreateCompany>,
) -> AppResult<(StatusCode, Json<DataResponse<LeasingCompany>>)> {
    if input.name.trim().is_empty() {
        return Err(CoreError::Validation("Company name must not be empty".into()).into());
    }
    let company = state.storage.create_company(input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: company })))
}
