//! Admin statistics endpoint

use axum::{extract::State, Json};

use crate::{error::AppResult, services::stats::LibraryStats, AppState};

use super::AuthenticatedUser;

/// Library-wide counters for the admin dashboard
#[utoipa::path(
    get,
    path = "/admin/stats",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Library statistics", body = LibraryStats),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn get_stats(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<LibraryStats>> {
    claims.require_admin()?;
    let stats = state.services.stats.overview().await?;
    Ok(Json(stats))
}
