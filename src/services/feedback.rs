//! Book feedback service

use crate::{
    error::AppResult,
    models::feedback::{BookFeedback, CreateFeedback},
    repository::Repository,
};

#[derive(Clone)]
pub struct FeedbackService {
    repository: Repository,
}

impl FeedbackService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Submit feedback for a book. One review per user per book.
    pub async fn submit(&self, user_id: i32, feedback: &CreateFeedback) -> AppResult<i32> {
        // The book must exist and be active
        self.repository.books.get_by_id(feedback.book_id).await?;
        let feedback_id = self.repository.feedback.create(user_id, feedback).await?;
        tracing::info!(feedback_id, user_id, book_id = feedback.book_id, "feedback submitted");
        Ok(feedback_id)
    }

    /// All feedback for a book with its aggregate rating
    pub async fn for_book(&self, book_id: i32) -> AppResult<BookFeedback> {
        self.repository.books.get_by_id(book_id).await?;
        let feedbacks = self.repository.feedback.get_for_book(book_id).await?;
        let (average_rating, total_reviews) =
            self.repository.feedback.rating_summary(book_id).await?;

        Ok(BookFeedback {
            feedbacks,
            average_rating,
            total_reviews,
        })
    }
}
