pub mod admin;
pub mod applications;
pub mod auth;
pub mod cars;
pub mod companies;
pub mod health;
pub mod notifications;
pub mod offers;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                         register (public)
/// /auth/login                            login (public)
/// /auth/refresh                          refresh (public)
/// /auth/logout                           logout (requires auth)
/// /auth/me                               current user (requires auth)
///
/// /applications                          list, create
/// /applications/{id}                     get
/// /applications/{id}/approve             admin approval (POST)
/// /applications/{id}/reject              admin rejection (POST)
/// /applications/{id}/status              workflow transition (PATCH)
/// /applications/{id}/companies           compatible companies (GET)
/// /applications/{id}/offers              list, create (managers)
/// /applications/{id}/documents           list, upload
/// /applications/{id}/messages            list, post
///
/// /offers/{id}/select                    select an offer (POST, client)
///
/// /cars                                  search, create (suppliers)
/// /cars/mine                             supplier's own listings
///
/// /companies                             active companies
/// /companies/{id}                        company detail
///
/// /notifications                         list (newest first)
/// /notifications/unread-count            unread counter
/// /notifications/{id}/read               mark read (POST)
///
/// /admin/users                           list, create (admin only)
/// /admin/users/{id}                      get, update, delete
/// /admin/companies                       list all, create (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/applications", applications::router())
        .nest("/offers", offers::router())
        .nest("/cars", cars::router())
        .nest("/companies", companies::router())
        .nest("/notifications", notifications::router())
        .nest("/admin", admin::router())
}
