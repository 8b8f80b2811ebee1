//! Library statistics for the admin dashboard

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::Row;
use utoipa::ToSchema;

use crate::{error::AppResult, repository::Repository};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LibraryStats {
    pub total_books: i64,
    pub total_users: i64,
    pub active_issues: i64,
    pub overdue_books: i64,
    pub total_fines_collected: Decimal,
}

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Aggregate counters across the whole library
    pub async fn overview(&self) -> AppResult<LibraryStats> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM books WHERE is_active) AS total_books,
                (SELECT COUNT(*) FROM users WHERE is_active) AS total_users,
                (SELECT COUNT(*) FROM loans WHERE status = 'issued') AS active_issues,
                (SELECT COUNT(*) FROM loans
                 WHERE status = 'issued' AND due_date < CURRENT_DATE) AS overdue_books,
                (SELECT COALESCE(SUM(fine), 0) FROM loans
                 WHERE status = 'returned') AS total_fines_collected
            "#,
        )
        .fetch_one(&self.repository.pool)
        .await?;

        Ok(LibraryStats {
            total_books: row.get("total_books"),
            total_users: row.get("total_users"),
            active_issues: row.get("active_issues"),
            overdue_books: row.get("overdue_books"),
            total_fines_collected: row.get("total_fines_collected"),
        })
    }
}
