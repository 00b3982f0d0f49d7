//! Handlers for the `/notifications` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use leaseflow_core::error::CoreError;
use leaseflow_core::types::DbId;
use leaseflow_db::models::notification::Notification;
use leaseflow_db::store::NotificationStore;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response payload for `GET /notifications/unread-count`.
#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub unread: i64,
}

/// GET /api/v1/notifications
///
/// The authenticated user's notifications, newest first.
pub async fn list_notifications(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Notification>>>> {
    let notifications = state
        .storage
        .list_notifications_for_user(auth_user.user_id)
        .await?;
    Ok(Json(DataResponse { data: notifications }))
}

/// GET /api/v1/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<UnreadCount>>> {
    let unread = state.storage.unread_count(auth_user.user_id).await?;
    Ok(Json(DataResponse {
        data: UnreadCount { unread },
    }))
}

/// POST /api/v1/notifications/{id}/read
///
/// Mark one of the user's notifications read. 404 when the notification
/// does not exist or belongs to someone else.
pub async fn mark_read(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let updated = state
        .storage
        .mark_notification_read(id, auth_user.user_id)
        .await?;
    if !updated {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}
