//! Loans repository: the issue/return ledger.
//!
//! Availability is always derived as stock minus currently-issued loans.
//! The issue path locks the book row so the availability check and the
//! loan insert form one atomic unit; two requests racing for the last
//! copy cannot both succeed.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::loan::{Loan, LoanDetails},
};

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Issue a book: verify availability and insert the loan atomically.
    ///
    /// The book row is locked for the duration of the transaction, which
    /// serializes concurrent issue attempts per book. The transaction rolls
    /// back on any error, so a failed issue leaves no partial state.
    pub async fn issue(
        &self,
        user_id: i32,
        book_id: i32,
        issue_date: NaiveDate,
        due_date: NaiveDate,
    ) -> AppResult<i32> {
        let mut tx = self.pool.begin().await?;

        // Lock the book row; also rejects inactive/missing books
        let stock: i32 = sqlx::query_scalar(
            "SELECT stock FROM books WHERE book_id = $1 AND is_active FOR UPDATE",
        )
        .bind(book_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", book_id)))?;

        // Re-check availability under the lock
        let issued: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM loans WHERE book_id = $1 AND status = 'issued'",
        )
        .bind(book_id)
        .fetch_one(&mut *tx)
        .await?;

        if issued >= stock as i64 {
            return Err(AppError::Conflict(
                "No copies of this book are available".to_string(),
            ));
        }

        let issue_id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO loans (user_id, book_id, issue_date, due_date, status, fine)
            VALUES ($1, $2, $3, $4, 'issued', 0)
            RETURNING issue_id
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .bind(issue_date)
        .bind(due_date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(issue_id)
    }

    /// Find a loan that is still issued and belongs to the given user.
    ///
    /// Missing, already returned, and not-owned-by-caller all collapse into
    /// one not-found error so the existence of other users' loans does not
    /// leak.
    pub async fn get_issued(&self, issue_id: i32, user_id: i32) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>(
            r#"
            SELECT issue_id, user_id, book_id, issue_date, due_date, return_date, status, fine
            FROM loans
            WHERE issue_id = $1 AND user_id = $2 AND status = 'issued'
            "#,
        )
        .bind(issue_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Issue not found or already returned".to_string()))
    }

    /// Apply the terminal issued → returned transition.
    ///
    /// Guarded by `status = 'issued'` so a concurrent return that commits
    /// first makes this one affect zero rows; that is reported as the same
    /// not-found error and never double-charges.
    pub async fn mark_returned(
        &self,
        issue_id: i32,
        user_id: i32,
        return_date: NaiveDate,
        fine: Decimal,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE loans
            SET return_date = $1, status = 'returned', fine = $2
            WHERE issue_id = $3 AND user_id = $4 AND status = 'issued'
            "#,
        )
        .bind(return_date)
        .bind(fine)
        .bind(issue_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(
                "Issue not found or already returned".to_string(),
            ));
        }

        Ok(())
    }

    /// Get all loans for a user, newest first, with book title and authors
    pub async fn get_user_loans(&self, user_id: i32, today: NaiveDate) -> AppResult<Vec<LoanDetails>> {
        let loans = sqlx::query_as::<_, LoanDetails>(
            r#"
            SELECT l.issue_id, l.book_id, b.title,
                   (SELECT STRING_AGG(a.name, ', ' ORDER BY a.name)
                    FROM book_authors ba
                    JOIN authors a ON ba.author_id = a.author_id
                    WHERE ba.book_id = b.book_id) AS authors,
                   l.issue_date, l.due_date, l.return_date, l.status, l.fine,
                   (l.status = 'issued' AND l.due_date < $2) AS is_overdue
            FROM loans l
            JOIN books b ON l.book_id = b.book_id
            WHERE l.user_id = $1
            ORDER BY l.issue_date DESC, l.issue_id DESC
            "#,
        )
        .bind(user_id)
        .bind(today)
        .fetch_all(&self.pool)
        .await?;

        Ok(loans)
    }

    /// Derived availability for a book: stock − currently issued
    pub async fn available_copies(&self, book_id: i32) -> AppResult<i64> {
        let available: i64 = sqlx::query_scalar(
            r#"
            SELECT b.stock - (SELECT COUNT(*) FROM loans l
                              WHERE l.book_id = b.book_id AND l.status = 'issued')
            FROM books b
            WHERE b.book_id = $1
            "#,
        )
        .bind(book_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", book_id)))?;

        Ok(available)
    }

    /// Count of active loans for a user (used by user deletion checks)
    pub async fn count_active_for_user(&self, user_id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM loans WHERE user_id = $1 AND status = 'issued'",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Count of all loans referencing a user, returned ones included.
    /// Loan rows are the fine ledger and are never cascaded away.
    pub async fn count_for_user(&self, user_id: i32) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}
