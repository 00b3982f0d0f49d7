//! Route definitions for the `/cars` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::cars;
use crate::state::AppState;

/// Routes mounted at `/cars`.
///
/// ```text
/// GET  /      -> list_cars (filterable)
/// POST /      -> create_car (supplier)
/// GET  /mine  -> my_cars (supplier)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cars::list_cars).post(cars::create_car))
        .route("/mine", get(cars::my_cars))
}
