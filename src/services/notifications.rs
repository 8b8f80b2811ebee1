//! User notification service

use crate::{error::AppResult, models::notification::Notification, repository::Repository};

#[derive(Clone)]
pub struct NotificationsService {
    repository: Repository,
}

impl NotificationsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// A user's notifications, newest first
    pub async fn list(&self, user_id: i32) -> AppResult<Vec<Notification>> {
        self.repository.notifications.get_for_user(user_id).await
    }

    /// Mark one notification as read
    pub async fn mark_read(&self, user_id: i32, notification_id: i32) -> AppResult<()> {
        self.repository
            .notifications
            .mark_read(notification_id, user_id)
            .await
    }

    /// Mark every notification for the user as read
    pub async fn mark_all_read(&self, user_id: i32) -> AppResult<()> {
        self.repository.notifications.mark_all_read(user_id).await
    }

    /// Delete one notification
    pub async fn delete(&self, user_id: i32, notification_id: i32) -> AppResult<()> {
        self.repository
            .notifications
            .delete(notification_id, user_id)
            .await
    }

    /// Delete all of the user's notifications
    pub async fn delete_all(&self, user_id: i32) -> AppResult<()> {
        self.repository.notifications.delete_all(user_id).await
    }
}
