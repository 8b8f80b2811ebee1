//! Notifications repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::notification::Notification,
};

#[derive(Clone)]
pub struct NotificationsRepository {
    pool: Pool<Postgres>,
}

impl NotificationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get notifications for a user, newest first
    pub async fn get_for_user(&self, user_id: i32) -> AppResult<Vec<Notification>> {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT notification_id, message, send_date, fine, due_date, is_read
            FROM notifications
            WHERE user_id = $1
            ORDER BY send_date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    /// Mark one notification as read; the ownership check keeps users from
    /// touching each other's notifications
    pub async fn mark_read(&self, notification_id: i32, user_id: i32) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE notification_id = $1 AND user_id = $2",
        )
        .bind(notification_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(
                "Notification not found or access denied".to_string(),
            ));
        }

        Ok(())
    }

    /// Mark all of a user's notifications as read
    pub async fn mark_all_read(&self, user_id: i32) -> AppResult<()> {
        sqlx::query("UPDATE notifications SET is_read = TRUE WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Delete one notification owned by the user
    pub async fn delete(&self, notification_id: i32, user_id: i32) -> AppResult<()> {
        let result = sqlx::query(
            "DELETE FROM notifications WHERE notification_id = $1 AND user_id = $2",
        )
        .bind(notification_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(
                "Notification not found or access denied".to_string(),
            ));
        }

        Ok(())
    }

    /// Delete all of a user's notifications
    pub async fn delete_all(&self, user_id: i32) -> AppResult<()> {
        sqlx::query("DELETE FROM notifications WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
