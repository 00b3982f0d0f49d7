//! Handlers for leasing offers.
//!
//! Managers submit offers against applications that are collecting them;
//! clients list the offers on their application and select one, which
//! advances the workflow to document collection.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use leaseflow_core::error::CoreError;
use leaseflow_core::leasing::NOTIFY_SUCCESS;
use leaseflow_core::roles::ROLE_CLIENT;
use leaseflow_core::status::ApplicationStatus;
use leaseflow_core::types::{DbId, Money};
use leaseflow_db::models::notification::CreateNotification;
use leaseflow_db::models::offer::{CreateOffer, LeasingOffer};
use leaseflow_db::store::{NotificationStore, OfferStore, UserStore, WorkflowStore};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::applications::{ensure_can_view, load_application};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /applications/{id}/offers`.
#[derive(Debug, Deserialize)]
pub struct CreateOfferRequest {
    pub monthly_payment: Money,
    pub first_payment: Money,
    pub buyout_payment: Money,
    pub total_cost: Money,
    pub interest_rate: Option<Money>,
}

/// POST /api/v1/applications/{id}/offers
///
/// Submit an offer as a manager. The offer is attributed to the manager's
/// company; the application must currently be collecting or reviewing
/// offers. The client is notified of the new offer.
pub async fn create_offer(
    State(state): State<AppState>,
    RequireManager(manager): RequireManager,
    Path(application_id): Path<DbId>,
    Json(input): Json<CreateOfferRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<LeasingOffer>>)> {
    let application = load_application(&state, application_id).await?;
    let status = application.workflow_status()?;
    if status != ApplicationStatus::CollectingOffers
        && status != ApplicationStatus::ReviewingOffers
    {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Application is not accepting offers in status '{status}'"
        ))));
    }

    let manager_record = state
        .storage
        .get_user(manager.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: manager.user_id,
        })?;
    let company_id = manager_record.company_id.ok_or_else(|| {
        CoreError::Forbidden("Manager is not attached to a leasing company".into())
    })?;

    if input.monthly_payment <= Money::ZERO || input.total_cost <= Money::ZERO {
        return Err(CoreError::Validation("Offer amounts must be positive".into()).into());
    }

    let offer = state
        .storage
        .create_offer(CreateOffer {
            application_id,
            company_id,
            manager_id: Some(manager.user_id),
            monthly_payment: input.monthly_payment,
            first_payment: input.first_payment,
            buyout_payment: input.buyout_payment,
            total_cost: input.total_cost,
            interest_rate: input.interest_rate,
        })
        .await?;

    // The client hears about every incoming offer.
    state
        .storage
        .create_notification(CreateNotification {
            user_id: application.client_id,
            title: "New offer".to_string(),
            message: format!(
                "A new offer was submitted for your application #{application_id}"
            ),
            kind: NOTIFY_SUCCESS.to_string(),
        })
        .await?;

    tracing::info!(
        offer_id = offer.id,
        application_id,
        company_id,
        "Offer submitted"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: offer })))
}

/// GET /api/v1/applications/{id}/offers
pub async fn list_offers(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(application_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<LeasingOffer>>>> {
    let application = load_application(&state, application_id).await?;
    ensure_can_view(&auth_user, &application)?;

    let offers = state
        .storage
        .list_offers_by_application(application_id)
        .await?;
    Ok(Json(DataResponse { data: offers }))
}

/// POST /api/v1/offers/{id}/select
///
/// Select an offer as the application's client. Unselects siblings and
/// advances the application to document collection.
pub async fn select_offer(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(offer_id): Path<DbId>,
) -> AppResult<Json<DataResponse<LeasingOffer>>> {
    let offer = state
        .storage
        .get_offer(offer_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "LeasingOffer",
            id: offer_id,
        })?;

    let application = load_application(&state, offer.application_id).await?;
    if auth_user.role != ROLE_CLIENT || application.client_id != auth_user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the application's client can select an offer".into(),
        )));
    }

    let selected = state.storage.select_offer(offer_id).await?;
    tracing::info!(
        offer_id,
        application_id = offer.application_id,
        "Offer selected"
    );
    Ok(Json(DataResponse { data: selected }))
}
