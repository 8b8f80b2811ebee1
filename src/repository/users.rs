//! Users and admins repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::user::{Admin, CreateUser, UpdateProfile, UpdateUser, User, UserOverview},
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE user_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    /// Get user by email
    pub async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Check if email already exists
    pub async fn email_exists(&self, email: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1) AND user_id != $2)",
            )
            .bind(email)
            .bind(id)
            .fetch_one(&self.pool)
            .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))")
                .bind(email)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }

    /// Create a new user; password must already be hashed
    pub async fn create(&self, user: &CreateUser, password_hash: &str) -> AppResult<i32> {
        let user_id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO users (name, email, password, phone, membership_type, is_active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING user_id
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(password_hash)
        .bind(&user.phone)
        .bind(user.membership_type.as_deref().unwrap_or("standard"))
        .bind(user.is_active.unwrap_or(true))
        .fetch_one(&self.pool)
        .await?;

        Ok(user_id)
    }

    /// Update a user (admin management)
    pub async fn update(&self, id: i32, user: &UpdateUser) -> AppResult<()> {
        let mut sets = Vec::new();
        let mut param_idx = 1;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, param_idx));
                    param_idx += 1;
                }
            };
        }

        add_field!(user.name, "name");
        add_field!(user.email, "email");
        add_field!(user.phone, "phone");
        add_field!(user.membership_type, "membership_type");
        add_field!(user.is_active, "is_active");

        if sets.is_empty() {
            return Err(AppError::Validation("No fields to update".to_string()));
        }

        let query = format!(
            "UPDATE users SET {} WHERE user_id = ${}",
            sets.join(", "),
            param_idx
        );

        let mut builder = sqlx::query(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(user.name);
        bind_field!(user.email);
        bind_field!(user.phone);
        bind_field!(user.membership_type);
        bind_field!(user.is_active);

        let result = builder.bind(id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User with id {} not found", id)));
        }

        Ok(())
    }

    /// Update a user's own profile; password, when present, is already hashed
    pub async fn update_profile(
        &self,
        id: i32,
        profile: &UpdateProfile,
        password_hash: Option<&str>,
    ) -> AppResult<()> {
        let mut sets = Vec::new();
        let mut param_idx = 1;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, param_idx));
                    param_idx += 1;
                }
            };
        }

        add_field!(profile.name, "name");
        add_field!(profile.email, "email");
        add_field!(profile.phone, "phone");

        if password_hash.is_some() {
            sets.push(format!("password = ${}", param_idx));
            param_idx += 1;
        }

        if sets.is_empty() {
            return Err(AppError::Validation("No fields to update".to_string()));
        }

        let query = format!(
            "UPDATE users SET {} WHERE user_id = ${}",
            sets.join(", "),
            param_idx
        );

        let mut builder = sqlx::query(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(profile.name);
        bind_field!(profile.email);
        bind_field!(profile.phone);

        if let Some(hash) = password_hash {
            builder = builder.bind(hash);
        }

        builder.bind(id).execute(&self.pool).await?;

        Ok(())
    }

    /// Delete a user
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User with id {} not found", id)));
        }

        Ok(())
    }

    /// List all users with per-user loan counters, newest first
    pub async fn list_with_loan_counts(&self) -> AppResult<Vec<UserOverview>> {
        let users = sqlx::query_as::<_, UserOverview>(
            r#"
            SELECT u.user_id, u.name, u.email, u.membership_type, u.is_active, u.created_at,
                   COUNT(l.issue_id) AS books_borrowed,
                   COUNT(*) FILTER (WHERE l.status = 'issued') AS current_loans,
                   COUNT(*) FILTER (WHERE l.status = 'issued' AND l.due_date < CURRENT_DATE) AS overdue_books
            FROM users u
            LEFT JOIN loans l ON u.user_id = l.user_id
            GROUP BY u.user_id
            ORDER BY u.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Get admin by email
    pub async fn get_admin_by_email(&self, email: &str) -> AppResult<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>(
            "SELECT * FROM admins WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(admin)
    }

    /// Check if an admin with this email already exists
    pub async fn admin_email_exists(&self, email: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM admins WHERE LOWER(email) = LOWER($1))",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Create a new admin; password must already be hashed
    pub async fn create_admin(&self, name: &str, email: &str, password_hash: &str) -> AppResult<i32> {
        let admin_id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO admins (name, email, password) VALUES ($1, $2, $3) RETURNING admin_id",
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(admin_id)
    }
}
