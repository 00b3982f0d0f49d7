//! Handlers for the `/auth` resource (register, login, refresh, logout, me).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use leaseflow_core::error::CoreError;
use leaseflow_core::roles::{validate_role, ROLE_ADMIN, ROLE_CLIENT, ROLE_MANAGER};
use leaseflow_core::types::DbId;
use leaseflow_db::models::session::CreateSession;
use leaseflow_db::models::user::{CreateUser, User};
use leaseflow_db::store::{SessionStore, UserStore};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Defaults to `client` when omitted. Admin accounts cannot be
    /// self-registered.
    pub role: Option<String>,
    pub phone: Option<String>,
    pub tax_id: Option<String>,
    /// Leasing company the account belongs to. Manager accounts only.
    pub company_id: Option<DbId>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Successful authentication response returned by register, login, and
/// refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

/// Public user info embedded in [`AuthResponse`].
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub username: String,
    pub email: Option<String>,
    pub role: String,
    pub company_id: Option<DbId>,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        UserInfo {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            company_id: user.company_id,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create a new account and log it in. Returns 201 with access and refresh
/// tokens.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let username = input.username.trim();
    if username.is_empty() {
        return Err(CoreError::Validation("Username must not be empty".into()).into());
    }

    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(CoreError::Validation)?;

    let role = input.role.unwrap_or_else(|| ROLE_CLIENT.to_string());
    validate_role(&role).map_err(CoreError::Validation)?;
    if role == ROLE_ADMIN {
        return Err(CoreError::Forbidden("Admin accounts cannot be self-registered".into()).into());
    }
    if input.company_id.is_some() && role != ROLE_MANAGER {
        return Err(CoreError::Validation(
            "Only manager accounts belong to a leasing company".into(),
        )
        .into());
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = state
        .storage
        .create_user(CreateUser {
            username: username.to_string(),
            password_hash,
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            role,
            phone: input.phone,
            tax_id: input.tax_id,
            company_id: input.company_id,
        })
        .await?;

    tracing::info!(user_id = user.id, role = %user.role, "User registered");

    let response = create_auth_response(&state, &user).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/auth/login
///
/// Authenticate with username + password. Returns access and refresh tokens.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = state
        .storage
        .get_user_by_username(&input.username)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid username or password".into(),
            ))
        })?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid username or password".into(),
        )));
    }

    let response = create_auth_response(&state, &user).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for new access + refresh tokens. The old
/// session is revoked (token rotation).
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let token_hash = hash_refresh_token(&input.refresh_token);

    let session = state
        .storage
        .find_session_by_token_hash(&token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    state.storage.revoke_session(session.id).await?;

    let user = state
        .storage
        .get_user(session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let response = create_auth_response(&state, &user).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/logout
///
/// Revoke all sessions for the authenticated user. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, auth_user: AuthUser) -> AppResult<StatusCode> {
    state
        .storage
        .revoke_all_sessions_for_user(auth_user.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
///
/// Return the authenticated user's record.
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<User>>> {
    let user = state
        .storage
        .get_user(auth_user.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: auth_user.user_id,
        })?;
    Ok(Json(DataResponse { data: user }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate access + refresh tokens, persist a session row, and build the
/// response.
async fn create_auth_response(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let access_token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_plaintext, refresh_hash) = generate_refresh_token();

    let expires_at =
        Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);

    state
        .storage
        .create_session(CreateSession {
            user_id: user.id,
            refresh_token_hash: refresh_hash,
            expires_at,
        })
        .await?;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user: UserInfo::from(user),
    })
}
