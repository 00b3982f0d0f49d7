//! Route definitions for the `/offers` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::offers;
use crate::state::AppState;

/// Routes mounted at `/offers`.
///
/// ```text
/// POST /{id}/select -> select_offer (client)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/select", post(offers::select_offer))
}
