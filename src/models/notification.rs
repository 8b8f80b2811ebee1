//! Notification models (due-date and fine reminders)

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Notification {
    pub notification_id: i32,
    pub message: String,
    pub send_date: DateTime<Utc>,
    pub fine: Option<Decimal>,
    pub due_date: Option<NaiveDate>,
    pub is_read: bool,
}
