//! Book feedback endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::feedback::{BookFeedback, CreateFeedback},
    AppState,
};

use super::AuthenticatedUser;

#[derive(Serialize, ToSchema)]
pub struct FeedbackCreated {
    pub feedback_id: i32,
}

/// Submit feedback for a book. One review per user per book.
#[utoipa::path(
    post,
    path = "/feedback",
    tag = "feedback",
    security(("bearer_auth" = [])),
    request_body = CreateFeedback,
    responses(
        (status = 201, description = "Feedback submitted", body = FeedbackCreated),
        (status = 400, description = "Invalid rating"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Already reviewed")
    )
)]
pub async fn submit_feedback(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateFeedback>,
) -> AppResult<(StatusCode, Json<FeedbackCreated>)> {
    claims.require_user()?;
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let feedback_id = state
        .services
        .feedback
        .submit(claims.user_id, &request)
        .await?;

    Ok((StatusCode::CREATED, Json(FeedbackCreated { feedback_id })))
}

/// All feedback for a book with aggregate rating
#[utoipa::path(
    get,
    path = "/feedback/book/{id}",
    tag = "feedback",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Feedback list", body = BookFeedback),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book_feedback(
    State(state): State<AppState>,
    Path(book_id): Path<i32>,
) -> AppResult<Json<BookFeedback>> {
    let feedback = state.services.feedback.for_book(book_id).await?;
    Ok(Json(feedback))
}
