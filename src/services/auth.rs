//! Authentication and account management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;

use crate::{
    config::{AuthConfig, PolicyConfig},
    error::{AppError, AppResult},
    models::user::{
        Admin, Claims, CreateUser, RegisterAdmin, RegisterUser, Role, UpdateProfile, UpdateUser,
        User, UserOverview,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
    policy: PolicyConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig, policy: PolicyConfig) -> Self {
        Self {
            repository,
            config,
            policy,
        }
    }

    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify_password(&self, hash: &str, password: &str) -> bool {
        PasswordHash::new(hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    fn issue_token(&self, user_id: i32, email: &str, role: Role) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: email.to_string(),
            user_id,
            role,
            iat: now.timestamp(),
            exp: (now + chrono::Duration::hours(self.config.jwt_expiration_hours as i64))
                .timestamp(),
        };
        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Register a new user account and log them in
    pub async fn register_user(&self, request: &RegisterUser) -> AppResult<(String, User)> {
        if self.repository.users.email_exists(&request.email, None).await? {
            return Err(AppError::Conflict(
                "An account with this email already exists".to_string(),
            ));
        }

        let password_hash = self.hash_password(&request.password)?;
        let create = CreateUser {
            name: request.name.clone(),
            email: request.email.clone(),
            password: request.password.clone(),
            phone: request.phone.clone(),
            membership_type: None,
            is_active: None,
        };
        let user_id = self.repository.users.create(&create, &password_hash).await?;
        let user = self.repository.users.get_by_id(user_id).await?;

        tracing::info!(user_id, "user registered");

        let token = self.issue_token(user_id, &user.email, Role::User)?;
        Ok((token, user))
    }

    /// Authenticate a user by email and password.
    ///
    /// Invalid email, wrong password, and deactivated accounts all produce
    /// the same authentication error.
    pub async fn login_user(&self, email: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_email(email)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

        if !self.verify_password(&user.password, password) || !user.is_active {
            return Err(AppError::Authentication(
                "Invalid email or password".to_string(),
            ));
        }

        let token = self.issue_token(user.user_id, &user.email, Role::User)?;
        Ok((token, user))
    }

    /// Register an administrator. Gated by the shared registration key.
    pub async fn register_admin(&self, request: &RegisterAdmin) -> AppResult<(String, Admin)> {
        if request.admin_key != self.policy.admin_registration_key {
            return Err(AppError::Forbidden(
                "Invalid admin registration key".to_string(),
            ));
        }

        if self.repository.users.admin_email_exists(&request.email).await? {
            return Err(AppError::Conflict(
                "An admin with this email already exists".to_string(),
            ));
        }

        let password_hash = self.hash_password(&request.password)?;
        let admin_id = self
            .repository
            .users
            .create_admin(&request.name, &request.email, &password_hash)
            .await?;

        tracing::info!(admin_id, "admin registered");

        let token = self.issue_token(admin_id, &request.email, Role::Admin)?;
        let admin = Admin {
            admin_id,
            name: request.name.clone(),
            email: request.email.clone(),
            password: String::new(),
            created_at: Utc::now(),
        };
        Ok((token, admin))
    }

    /// Authenticate an administrator
    pub async fn login_admin(&self, email: &str, password: &str) -> AppResult<(String, Admin)> {
        let admin = self
            .repository
            .users
            .get_admin_by_email(email)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

        if !self.verify_password(&admin.password, password) {
            return Err(AppError::Authentication(
                "Invalid email or password".to_string(),
            ));
        }

        let token = self.issue_token(admin.admin_id, &admin.email, Role::Admin)?;
        Ok((token, admin))
    }

    /// Get a user's profile
    pub async fn get_profile(&self, user_id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(user_id).await
    }

    /// Update a user's own profile
    pub async fn update_profile(&self, user_id: i32, profile: &UpdateProfile) -> AppResult<User> {
        if let Some(ref email) = profile.email {
            if self.repository.users.email_exists(email, Some(user_id)).await? {
                return Err(AppError::Conflict(
                    "An account with this email already exists".to_string(),
                ));
            }
        }

        let password_hash = match profile.password.as_deref() {
            Some(password) => Some(self.hash_password(password)?),
            None => None,
        };

        self.repository
            .users
            .update_profile(user_id, profile, password_hash.as_deref())
            .await?;

        self.repository.users.get_by_id(user_id).await
    }

    /// List all users with loan counters (admin)
    pub async fn list_users(&self) -> AppResult<Vec<UserOverview>> {
        self.repository.users.list_with_loan_counts().await
    }

    /// Create a user directly (admin)
    pub async fn create_user(&self, user: &CreateUser) -> AppResult<User> {
        if self.repository.users.email_exists(&user.email, None).await? {
            return Err(AppError::Conflict(
                "An account with this email already exists".to_string(),
            ));
        }

        let password_hash = self.hash_password(&user.password)?;
        let user_id = self.repository.users.create(user, &password_hash).await?;
        self.repository.users.get_by_id(user_id).await
    }

    /// Update a user (admin)
    pub async fn update_user(&self, user_id: i32, user: &UpdateUser) -> AppResult<User> {
        if let Some(ref email) = user.email {
            if self.repository.users.email_exists(email, Some(user_id)).await? {
                return Err(AppError::Conflict(
                    "An account with this email already exists".to_string(),
                ));
            }
        }

        self.repository.users.update(user_id, user).await?;
        self.repository.users.get_by_id(user_id).await
    }

    /// Delete a user (admin). Refused while any loans reference the user:
    /// issued loans must be returned first, and returned loans are ledger
    /// history that deletion would orphan.
    pub async fn delete_user(&self, user_id: i32) -> AppResult<()> {
        self.repository.users.get_by_id(user_id).await?;

        let active = self.repository.loans.count_active_for_user(user_id).await?;
        if active > 0 {
            return Err(AppError::Conflict(format!(
                "User has {} book(s) still issued and cannot be deleted",
                active
            )));
        }

        let total = self.repository.loans.count_for_user(user_id).await?;
        if total > 0 {
            return Err(AppError::Conflict(format!(
                "User has {} loan record(s) and cannot be deleted",
                total
            )));
        }

        self.repository.users.delete(user_id).await?;
        tracing::info!(user_id, "user deleted");
        Ok(())
    }
}
