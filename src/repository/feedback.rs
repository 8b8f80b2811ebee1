//! Feedback repository for database operations

use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::feedback::{CreateFeedback, FeedbackDetails},
};

#[derive(Clone)]
pub struct FeedbackRepository {
    pool: Pool<Postgres>,
}

impl FeedbackRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Create feedback. A user can review a given book only once.
    pub async fn create(&self, user_id: i32, feedback: &CreateFeedback) -> AppResult<i32> {
        let already_reviewed: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM feedback WHERE user_id = $1 AND book_id = $2)",
        )
        .bind(user_id)
        .bind(feedback.book_id)
        .fetch_one(&self.pool)
        .await?;

        if already_reviewed {
            return Err(AppError::Conflict(
                "You have already reviewed this book".to_string(),
            ));
        }

        let feedback_id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO feedback (user_id, book_id, rating, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING feedback_id
            "#,
        )
        .bind(user_id)
        .bind(feedback.book_id)
        .bind(feedback.rating)
        .bind(&feedback.comment)
        .fetch_one(&self.pool)
        .await?;

        Ok(feedback_id)
    }

    /// Get all feedback for a book, newest first
    pub async fn get_for_book(&self, book_id: i32) -> AppResult<Vec<FeedbackDetails>> {
        let feedbacks = sqlx::query_as::<_, FeedbackDetails>(
            r#"
            SELECT f.feedback_id, f.user_id, u.name AS user_name,
                   f.rating, f.comment, f.created_at
            FROM feedback f
            JOIN users u ON f.user_id = u.user_id
            WHERE f.book_id = $1
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(feedbacks)
    }

    /// Average rating and review count for a book
    pub async fn rating_summary(&self, book_id: i32) -> AppResult<(f64, i64)> {
        let row = sqlx::query(
            "SELECT COALESCE(AVG(rating), 0)::float8 AS avg_rating, COUNT(*) AS total_reviews
             FROM feedback WHERE book_id = $1",
        )
        .bind(book_id)
        .fetch_one(&self.pool)
        .await?;

        Ok((row.get("avg_rating"), row.get("total_reviews")))
    }
}
