//! Book issue and return endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::loan::{IssueReceipt, LoanDetails, ReturnReceipt},
    AppState,
};

use super::AuthenticatedUser;

/// Issue request. The loan period falls back to the configured default.
#[derive(Deserialize, ToSchema)]
pub struct IssueBookRequest {
    pub book_id: i32,
    /// Loan period in days; must be positive when given
    pub due_days: Option<i64>,
}

/// Issue a book to the authenticated user
#[utoipa::path(
    post,
    path = "/issues",
    tag = "issues",
    security(("bearer_auth" = [])),
    request_body = IssueBookRequest,
    responses(
        (status = 201, description = "Book issued", body = IssueReceipt),
        (status = 400, description = "Invalid loan period"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "No copies available")
    )
)]
pub async fn issue_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<IssueBookRequest>,
) -> AppResult<(StatusCode, Json<IssueReceipt>)> {
    claims.require_user()?;

    let receipt = state
        .services
        .loans
        .issue_book(claims.user_id, request.book_id, request.due_days)
        .await?;

    Ok((StatusCode::CREATED, Json(receipt)))
}

/// Return an issued book and settle the fine
#[utoipa::path(
    put,
    path = "/issues/{id}/return",
    tag = "issues",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Issue ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = ReturnReceipt),
        (status = 404, description = "Issue not found or already returned")
    )
)]
pub async fn return_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(issue_id): Path<i32>,
) -> AppResult<Json<ReturnReceipt>> {
    claims.require_user()?;

    let receipt = state
        .services
        .loans
        .return_book(claims.user_id, issue_id)
        .await?;

    Ok(Json(receipt))
}

/// Get a user's loans, newest first
#[utoipa::path(
    get,
    path = "/issues/user/{user_id}",
    tag = "issues",
    security(("bearer_auth" = [])),
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Loan list", body = Vec<LoanDetails>),
        (status = 403, description = "Access denied"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_loans(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(user_id): Path<i32>,
) -> AppResult<Json<Vec<LoanDetails>>> {
    claims.require_self_or_admin(user_id)?;

    let loans = state.services.loans.get_user_loans(user_id).await?;
    Ok(Json(loans))
}
