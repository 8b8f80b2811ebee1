//! Notification endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{error::AppResult, models::notification::Notification, AppState};

use super::AuthenticatedUser;

/// Get a user's notifications, newest first
#[utoipa::path(
    get,
    path = "/notifications/user/{user_id}",
    tag = "notifications",
    security(("bearer_auth" = [])),
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Notification list", body = Vec<Notification>),
        (status = 403, description = "Access denied")
    )
)]
pub async fn get_notifications(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(user_id): Path<i32>,
) -> AppResult<Json<Vec<Notification>>> {
    claims.require_self_or_admin(user_id)?;
    let notifications = state.services.notifications.list(user_id).await?;
    Ok(Json(notifications))
}

/// Mark one notification as read
#[utoipa::path(
    put,
    path = "/notifications/{id}/read",
    tag = "notifications",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Notification ID")
    ),
    responses(
        (status = 204, description = "Marked as read"),
        (status = 404, description = "Notification not found")
    )
)]
pub async fn mark_read(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(notification_id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_user()?;
    state
        .services
        .notifications
        .mark_read(claims.user_id, notification_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Mark all of a user's notifications as read
#[utoipa::path(
    put,
    path = "/notifications/user/{user_id}/read-all",
    tag = "notifications",
    security(("bearer_auth" = [])),
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "All marked as read"),
        (status = 403, description = "Access denied")
    )
)]
pub async fn mark_all_read(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(user_id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_self_or_admin(user_id)?;
    state.services.notifications.mark_all_read(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete one notification
#[utoipa::path(
    delete,
    path = "/notifications/{id}",
    tag = "notifications",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Notification ID")
    ),
    responses(
        (status = 204, description = "Notification deleted"),
        (status = 404, description = "Notification not found")
    )
)]
pub async fn delete_notification(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(notification_id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_user()?;
    state
        .services
        .notifications
        .delete(claims.user_id, notification_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete all of a user's notifications
#[utoipa::path(
    delete,
    path = "/notifications/user/{user_id}",
    tag = "notifications",
    security(("bearer_auth" = [])),
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "All notifications deleted"),
        (status = 403, description = "Access denied")
    )
)]
pub async fn delete_all_notifications(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(user_id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_self_or_admin(user_id)?;
    state.services.notifications.delete_all(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
