//! Route definitions for the public `/companies` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::companies;
use crate::state::AppState;

/// Routes mounted at `/companies`.
///
/// ```text
/// GET /      -> list_companies (active only)
/// GET /{id}  -> get_company
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(companies::list_companies))
        .route("/{id}", get(companies::get_company))
}
