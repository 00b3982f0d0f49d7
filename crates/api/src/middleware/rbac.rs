//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does
//! not meet the requirement. Use these in route handlers to enforce
//! authorization at the type level.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use leaseflow_core::error::CoreError;
use leaseflow_core::roles::{ROLE_ADMIN, ROLE_MANAGER, ROLE_SUPPLIER};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     // user is guaranteed to be an admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

/// Requires `manager` or `admin` role. Rejects with 403 Forbidden otherwise.
pub struct RequireManager(pub AuthUser);

impl FromRequestParts<AppState> for RequireManager {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN && user.role != ROLE_MANAGER {
            return Err(AppError::Core(CoreError::Forbidden(
                "Manager or Admin role required".into(),
            )));
        }
        Ok(RequireManager(user))
    }
}

/// Requires `supplier` or `admin` role. Rejects with 403 Forbidden otherwise.
pub struct RequireSupplier(pub AuthUser);

impl FromRequestParts<AppState> for RequireSupplier {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN && user.role != ROLE_SUPPLIER {
            return Err(AppError::Core(CoreError::Forbidden(
                "Supplier or Admin role required".into(),
            )));
        }
        Ok(RequireSupplier(user))
    }
}

/// Requires any authenticated user (any valid role).
///
/// Functionally equivalent to [`AuthUser`] but named explicitly for use in
/// route definitions where the intent "this route requires authentication"
/// should be self-documenting.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(RequireAuth(user))
    }
}
