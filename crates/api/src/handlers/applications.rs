//! Handlers for the `/applications` resource.
//!
//! Covers CRUD, the admin approve/reject decisions, status transitions,
//! compatible-company listing, and the per-application document and message
//! sub-resources.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use leaseflow_core::error::CoreError;
use leaseflow_core::roles::{ROLE_ADMIN, ROLE_AGENT, ROLE_CLIENT, ROLE_MANAGER};
use leaseflow_core::status::ApplicationStatus;
use leaseflow_core::types::{DbId, Money};
use leaseflow_db::models::application::{CreateApplication, LeasingApplication};
use leaseflow_db::models::company::LeasingCompany;
use leaseflow_db::models::document::{CreateDocument, Document};
use leaseflow_db::models::message::{ApplicationMessage, CreateMessage};
use leaseflow_db::store::{ApplicationStore, DocumentStore, MessageStore, WorkflowStore};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireManager};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /applications`.
///
/// The client id always comes from the access token; agents submitting on
/// behalf of a client name that client explicitly.
#[derive(Debug, Deserialize)]
pub struct CreateApplicationRequest {
    /// Required when an agent submits on behalf of a client.
    pub client_id: Option<DbId>,
    pub object_cost: Money,
    pub down_payment_percent: Money,
    pub term_months: i32,
    pub leasing_type: String,
    pub client_phone: String,
    pub client_tax_id: String,
    #[serde(default = "default_true")]
    pub is_new_object: bool,
    #[serde(default)]
    pub is_for_rental: bool,
    pub comment: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Request body for `POST /applications/{id}/reject`.
#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    pub reason: String,
}

/// Request body for `PATCH /applications/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Request body for `POST /applications/{id}/documents`.
#[derive(Debug, Deserialize)]
pub struct UploadDocumentRequest {
    pub file_name: String,
    pub file_url: String,
    pub document_type: String,
}

/// Request body for `POST /applications/{id}/messages`.
#[derive(Debug, Deserialize)]
pub struct PostMessageRequest {
    pub body: String,
}

// ---------------------------------------------------------------------------
// CRUD handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/applications
///
/// Submit a new leasing application. Clients submit for themselves; agents
/// must name the client they act for. Returns 201.
pub async fn create_application(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<CreateApplicationRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<LeasingApplication>>)> {
    if input.object_cost <= Money::ZERO {
        return Err(CoreError::Validation("Object cost must be positive".into()).into());
    }
    if input.term_months <= 0 {
        return Err(CoreError::Validation("Term must be positive".into()).into());
    }

    let (client_id, agent_id) = match auth_user.role.as_str() {
        ROLE_CLIENT => (auth_user.user_id, None),
        ROLE_AGENT => {
            let client_id = input.client_id.ok_or_else(|| {
                CoreError::Validation("client_id is required for agent submissions".into())
            })?;
            (client_id, Some(auth_user.user_id))
        }
        _ => {
            return Err(AppError::Core(CoreError::Forbidden(
                "Only clients and agents can submit applications".into(),
            )))
        }
    };

    let application = state
        .storage
        .create_application(CreateApplication {
            client_id,
            agent_id,
            object_cost: input.object_cost,
            down_payment_percent: input.down_payment_percent,
            term_months: input.term_months,
            leasing_type: input.leasing_type,
            client_phone: input.client_phone,
            client_tax_id: input.client_tax_id,
            is_new_object: input.is_new_object,
            is_for_rental: input.is_for_rental,
            comment: input.comment,
        })
        .await?;

    tracing::info!(application_id = application.id, client_id, "Application submitted");

    Ok((StatusCode::CREATED, Json(DataResponse { data: application })))
}

/// GET /api/v1/applications
///
/// Role-scoped listing: admins see everything, clients their own, agents the
/// ones they submitted, managers everything from offer collection onward.
pub async fn list_applications(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<LeasingApplication>>>> {
    let applications = match auth_user.role.as_str() {
        ROLE_ADMIN => state.storage.list_applications().await?,
        ROLE_CLIENT => {
            state
                .storage
                .list_applications_by_client(auth_user.user_id)
                .await?
        }
        ROLE_AGENT => {
            state
                .storage
                .list_applications_by_agent(auth_user.user_id)
                .await?
        }
        ROLE_MANAGER => {
            // Managers follow applications from offer collection onward, so
            // selected offers stay visible as the deal progresses.
            let mut applications = Vec::new();
            for status in [
                ApplicationStatus::CollectingOffers,
                ApplicationStatus::ReviewingOffers,
                ApplicationStatus::CollectingDocuments,
                ApplicationStatus::Approved,
                ApplicationStatus::Issued,
            ] {
                applications.extend(
                    state.storage.list_applications_by_status(status).await?,
                );
            }
            applications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            applications
        }
        _ => Vec::new(),
    };
    Ok(Json(DataResponse { data: applications }))
}

/// GET /api/v1/applications/{id}
pub async fn get_application(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<LeasingApplication>>> {
    let application = load_application(&state, id).await?;
    ensure_can_view(&auth_user, &application)?;
    Ok(Json(DataResponse { data: application }))
}

// ---------------------------------------------------------------------------
// Workflow handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/applications/{id}/approve
///
/// Admin approval. Notifies the client and managers of compatible companies,
/// and moves the application to offer collection. Rejects with 409 when the
/// application is not pending.
pub async fn approve_application(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<LeasingApplication>>> {
    let application = state
        .storage
        .approve_application(id, admin.user_id)
        .await?;
    tracing::info!(application_id = id, admin_id = admin.user_id, "Application approved");
    Ok(Json(DataResponse { data: application }))
}

/// POST /api/v1/applications/{id}/reject
///
/// Admin rejection with a reason. Rejects with 409 when the application is
/// not pending.
pub async fn reject_application(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<RejectRequest>,
) -> AppResult<Json<DataResponse<LeasingApplication>>> {
    let reason = input.reason.trim();
    if reason.is_empty() {
        return Err(CoreError::Validation("A rejection reason is required".into()).into());
    }

    let application = state
        .storage
        .reject_application(id, admin.user_id, reason)
        .await?;
    tracing::info!(application_id = id, admin_id = admin.user_id, "Application rejected");
    Ok(Json(DataResponse { data: application }))
}

/// PATCH /api/v1/applications/{id}/status
///
/// Move the application along the workflow. Restricted to admins and
/// managers; the transition itself is validated centrally and disallowed
/// edges come back as 409.
pub async fn update_status(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStatusRequest>,
) -> AppResult<Json<DataResponse<LeasingApplication>>> {
    let status = ApplicationStatus::parse(&input.status).map_err(CoreError::Validation)?;

    let application = state.storage.update_application_status(id, status).await?;
    tracing::info!(
        application_id = id,
        user_id = user.user_id,
        status = %status,
        "Application status updated"
    );
    Ok(Json(DataResponse { data: application }))
}

/// GET /api/v1/applications/{id}/companies
///
/// Active leasing companies whose terms can serve this application.
pub async fn compatible_companies(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<LeasingCompany>>>> {
    let application = load_application(&state, id).await?;
    ensure_can_view(&auth_user, &application)?;

    let companies = state.storage.compatible_companies(id).await?;
    Ok(Json(DataResponse { data: companies }))
}

// ---------------------------------------------------------------------------
// Document sub-resource
// ---------------------------------------------------------------------------

/// POST /api/v1/applications/{id}/documents
///
/// Attach a document to the application. Only participants may upload.
pub async fn upload_document(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UploadDocumentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Document>>)> {
    let application = load_application(&state, id).await?;
    ensure_can_view(&auth_user, &application)?;

    if input.file_name.trim().is_empty() || input.file_url.trim().is_empty() {
        return Err(CoreError::Validation("File name and URL are required".into()).into());
    }

    let document = state
        .storage
        .create_document(CreateDocument {
            application_id: id,
            file_name: input.file_name,
            file_url: input.file_url,
            document_type: input.document_type,
            uploaded_by: auth_user.user_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: document })))
}

/// GET /api/v1/applications/{id}/documents
pub async fn list_documents(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Document>>>> {
    let application = load_application(&state, id).await?;
    ensure_can_view(&auth_user, &application)?;

    let documents = state.storage.list_documents_by_application(id).await?;
    Ok(Json(DataResponse { data: documents }))
}

// ---------------------------------------------------------------------------
// Message sub-resource
// ---------------------------------------------------------------------------

/// POST /api/v1/applications/{id}/messages
pub async fn post_message(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<PostMessageRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ApplicationMessage>>)> {
    let application = load_application(&state, id).await?;
    ensure_can_view(&auth_user, &application)?;

    let body = input.body.trim();
    if body.is_empty() {
        return Err(CoreError::Validation("Message body must not be empty".into()).into());
    }

    let message = state
        .storage
        .create_message(CreateMessage {
            application_id: id,
            sender_id: auth_user.user_id,
            body: body.to_string(),
            is_system: false,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: message })))
}

/// GET /api/v1/applications/{id}/messages
pub async fn list_messages(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ApplicationMessage>>>> {
    let application = load_application(&state, id).await?;
    ensure_can_view(&auth_user, &application)?;

    let messages = state.storage.list_messages_for_application(id).await?;
    Ok(Json(DataResponse { data: messages }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) async fn load_application(
    state: &AppState,
    id: DbId,
) -> AppResult<LeasingApplication> {
    Ok(state
        .storage
        .get_application(id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "LeasingApplication",
            id,
        })?)
}

/// Visibility rule shared by the read endpoints: admins and managers see
/// every application; clients and agents only their own.
pub(crate) fn ensure_can_view(
    user: &AuthUser,
    application: &LeasingApplication,
) -> Result<(), AppError> {
    let allowed = match user.role.as_str() {
        ROLE_ADMIN | ROLE_MANAGER => true,
        ROLE_CLIENT => application.client_id == user.user_id,
        ROLE_AGENT => application.agent_id == Some(user.user_id),
        _ => false,
    };
    if allowed {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "No access to this application".into(),
        )))
    }
}
