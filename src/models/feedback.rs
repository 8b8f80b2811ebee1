//! Book feedback (rating/review) models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Feedback entry joined with the reviewer's name
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct FeedbackDetails {
    pub feedback_id: i32,
    pub user_id: i32,
    pub user_name: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Create feedback request. One feedback per user per book.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateFeedback {
    pub book_id: i32,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
    pub comment: Option<String>,
}

/// All feedback for a book, with aggregate rating
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookFeedback {
    pub feedbacks: Vec<FeedbackDetails>,
    pub average_rating: f64,
    pub total_reviews: i64,
}
