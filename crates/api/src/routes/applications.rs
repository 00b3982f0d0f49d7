//! Route definitions for the `/applications` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::{applications, offers};
use crate::state::AppState;

/// Routes mounted at `/applications`.
///
/// ```text
/// GET    /                 -> list_applications (role-scoped)
/// POST   /                 -> create_application
/// GET    /{id}             -> get_application
/// POST   /{id}/approve     -> approve_application (admin)
/// POST   /{id}/reject      -> reject_application (admin)
/// PATCH  /{id}/status      -> update_status (admin/manager)
/// GET    /{id}/companies   -> compatible_companies
/// GET    /{id}/offers      -> list_offers
/// POST   /{id}/offers      -> create_offer (manager)
/// GET    /{id}/documents   -> list_documents
/// POST   /{id}/documents   -> upload_document
/// GET    /{id}/messages    -> list_messages
/// POST   /{id}/messages    -> post_message
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(applications::list_applications).post(applications::create_application),
        )
        .route("/{id}", get(applications::get_application))
        .route("/{id}/approve", post(applications::approve_application))
        .route("/{id}/reject", post(applications::reject_application))
        .route("/{id}/status", patch(applications::update_status))
        .route("/{id}/companies", get(applications::compatible_companies))
        .route(
            "/{id}/offers",
            get(offers::list_offers).post(offers::create_offer),
        )
        .route(
            "/{id}/documents",
            get(applications::list_documents).post(applications::upload_document),
        )
        .route(
            "/{id}/messages",
            get(applications::list_messages).post(applications::post_message),
        )
}
