//! Business logic services

pub mod auth;
pub mod catalog;
pub mod feedback;
pub mod loans;
pub mod notifications;
pub mod stats;

use crate::{
    config::{AuthConfig, PolicyConfig},
    error::AppResult,
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub loans: loans::LoansService,
    pub feedback: feedback::FeedbackService,
    pub notifications: notifications::NotificationsService,
    pub stats: stats::StatsService,
    storage: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig, policy: PolicyConfig) -> Self {
        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config, policy.clone()),
            catalog: catalog::CatalogService::new(repository.clone()),
            loans: loans::LoansService::new(repository.clone(), policy),
            feedback: feedback::FeedbackService::new(repository.clone()),
            notifications: notifications::NotificationsService::new(repository.clone()),
            stats: stats::StatsService::new(repository.clone()),
            storage: repository,
        }
    }

    /// Verify the database answers; used by the readiness probe
    pub async fn storage_ready(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.storage.pool).await?;
        Ok(())
    }
}
