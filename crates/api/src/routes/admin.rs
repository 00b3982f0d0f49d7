//! Route definitions for the `/admin` resource (admin only).

use axum::routing::get;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET    /users        -> list_users
/// POST   /users        -> create_user
/// GET    /users/{id}   -> get_user
/// PUT    /users/{id}   -> update_user
/// DELETE /users/{id}   -> delete_user
/// GET    /companies    -> list_companies (including inactive)
/// POST   /companies    -> create_company
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users).post(admin::create_user))
        .route(
            "/users/{id}",
            get(admin::get_user)
                .put(admin::update_user)
                .delete(admin::delete_user),
        )
        .route(
            "/companies",
            get(admin::list_companies).post(admin::create_company),
        )
}
