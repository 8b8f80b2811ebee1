//! Loan lifecycle service: issue, return, and fine computation.
//!
//! Fines accrue only for whole elapsed days past the due date, evaluated at
//! return time. A loan returned on its due date carries no fine; no cap or
//! grace period is applied.

use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::{
    config::PolicyConfig,
    error::{AppError, AppResult},
    models::loan::{IssueReceipt, LoanDetails, ReturnReceipt},
    repository::Repository,
};

/// Whole days elapsed past the due date; never negative
pub fn days_overdue(due_date: NaiveDate, return_date: NaiveDate) -> i64 {
    (return_date - due_date).num_days().max(0)
}

/// Fine owed for the given number of overdue days
pub fn fine_for(days_overdue: i64, rate_per_day: Decimal) -> Decimal {
    Decimal::from(days_overdue) * rate_per_day
}

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    policy: PolicyConfig,
}

impl LoansService {
    pub fn new(repository: Repository, policy: PolicyConfig) -> Self {
        Self { repository, policy }
    }

    /// Issue a book to a user.
    ///
    /// The loan period defaults to the policy value when unspecified and
    /// must be positive. Availability is checked and the loan inserted as
    /// one atomic unit in the repository.
    pub async fn issue_book(
        &self,
        user_id: i32,
        book_id: i32,
        due_days: Option<i64>,
    ) -> AppResult<IssueReceipt> {
        let period = due_days.unwrap_or(self.policy.loan_period_days);
        if period <= 0 {
            return Err(AppError::Validation(
                "Loan period must be positive".to_string(),
            ));
        }

        let today = Utc::now().date_naive();
        let due_date = today + Duration::days(period);

        let issue_id = self
            .repository
            .loans
            .issue(user_id, book_id, today, due_date)
            .await?;

        tracing::info!(issue_id, user_id, book_id, %due_date, "book issued");

        Ok(IssueReceipt { issue_id, due_date })
    }

    /// Return an issued book and settle its fine.
    ///
    /// The loan must belong to the caller and still be issued; anything
    /// else surfaces as the same not-found error. The transition is
    /// terminal: a repeated return fails and never re-computes the fine.
    pub async fn return_book(&self, user_id: i32, issue_id: i32) -> AppResult<ReturnReceipt> {
        let loan = self.repository.loans.get_issued(issue_id, user_id).await?;

        let today = Utc::now().date_naive();
        let days = days_overdue(loan.due_date, today);
        let fine = fine_for(days, self.policy.fine_rate_per_day);

        self.repository
            .loans
            .mark_returned(issue_id, user_id, today, fine)
            .await?;

        tracing::info!(issue_id, user_id, days_overdue = days, %fine, "book returned");

        Ok(ReturnReceipt {
            fine,
            days_overdue: days,
        })
    }

    /// Get all loans for a user, newest first, with book details
    pub async fn get_user_loans(&self, user_id: i32) -> AppResult<Vec<LoanDetails>> {
        // Verify user exists
        self.repository.users.get_by_id(user_id).await?;
        self.repository
            .loans
            .get_user_loans(user_id, Utc::now().date_naive())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn no_overdue_on_or_before_due_date() {
        let due = date(2025, 6, 15);
        assert_eq!(days_overdue(due, date(2025, 6, 15)), 0);
        assert_eq!(days_overdue(due, date(2025, 6, 1)), 0);
    }

    #[test]
    fn one_calendar_day_late_accrues_one_day() {
        let due = date(2025, 6, 15);
        assert_eq!(days_overdue(due, date(2025, 6, 16)), 1);
    }

    #[test]
    fn overdue_counts_whole_days_across_months() {
        let due = date(2025, 1, 30);
        assert_eq!(days_overdue(due, date(2025, 2, 2)), 3);
    }

    #[test]
    fn fine_is_zero_without_overdue_days() {
        assert_eq!(fine_for(0, Decimal::ONE), Decimal::ZERO);
    }

    #[test]
    fn fine_scales_with_days_overdue() {
        let rate = Decimal::new(100, 2); // 1.00 per day
        assert_eq!(fine_for(3, rate), Decimal::new(300, 2));
        assert_eq!(fine_for(10, rate), Decimal::new(1000, 2));
    }

    #[test]
    fn fine_respects_fractional_rates() {
        let rate = Decimal::new(50, 2); // 0.50 per day
        assert_eq!(fine_for(3, rate), Decimal::new(150, 2));
    }

    #[test]
    fn fine_is_monotone_in_days_overdue() {
        let rate = Decimal::new(125, 2);
        let mut previous = Decimal::ZERO;
        for days in 0..30 {
            let fine = fine_for(days, rate);
            assert!(fine >= previous);
            previous = fine;
        }
    }
}
