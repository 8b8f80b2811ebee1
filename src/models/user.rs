//! User and admin models, roles, and JWT claims

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::AppError;

/// Caller role resolved from a credential
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Guest,
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Guest => "guest",
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "guest" => Ok(Role::Guest),
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// Full user model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub user_id: i32,
    pub name: String,
    pub email: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: String,
    pub phone: Option<String>,
    pub membership_type: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Administrator account (separate table from regular users)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Admin {
    pub admin_id: i32,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// User row with aggregated loan counters, for the admin user list
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct UserOverview {
    pub user_id: i32,
    pub name: String,
    pub email: String,
    pub membership_type: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub books_borrowed: i64,
    pub current_loans: i64,
    pub overdue_books: i64,
}

/// Register request (self-service)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterUser {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: String,
    pub phone: Option<String>,
}

/// Admin registration request, gated by a shared key
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterAdmin {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub admin_key: String,
}

/// Login request (users and admins)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Create user request (admin management)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: String,
    pub phone: Option<String>,
    pub membership_type: Option<String>,
    pub is_active: Option<bool>,
}

/// Update user request (admin management)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub membership_type: Option<String>,
    pub is_active: Option<bool>,
}

/// Update own profile request (for authenticated users)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfile {
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: Option<String>,
}

/// JWT Claims for authenticated callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub user_id: i32,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Require an authenticated regular user (admins qualify too)
    pub fn require_user(&self) -> Result<(), AppError> {
        match self.role {
            Role::User | Role::Admin => Ok(()),
            Role::Guest => Err(AppError::Forbidden(
                "A user account is required".to_string(),
            )),
        }
    }

    /// Require admin privileges
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Administrator privileges required".to_string(),
            ))
        }
    }

    /// Require that the caller is the given user, or an admin
    pub fn require_self_or_admin(&self, user_id: i32) -> Result<(), AppError> {
        if self.is_admin() || (self.role == Role::User && self.user_id == user_id) {
            Ok(())
        } else {
            Err(AppError::Forbidden("Access denied".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: Role, user_id: i32) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            sub: "test@example.com".to_string(),
            user_id,
            role,
            iat: now,
            exp: now + 3600,
        }
    }

    #[test]
    fn token_round_trip_preserves_claims() {
        let original = claims(Role::User, 42);
        let token = original.create_token("secret").unwrap();
        let parsed = Claims::from_token(&token, "secret").unwrap();
        assert_eq!(parsed.user_id, 42);
        assert_eq!(parsed.role, Role::User);
    }

    #[test]
    fn token_rejects_wrong_secret() {
        let token = claims(Role::User, 1).create_token("secret").unwrap();
        assert!(Claims::from_token(&token, "other").is_err());
    }

    #[test]
    fn self_or_admin_check() {
        assert!(claims(Role::User, 7).require_self_or_admin(7).is_ok());
        assert!(claims(Role::User, 7).require_self_or_admin(8).is_err());
        assert!(claims(Role::Admin, 1).require_self_or_admin(8).is_ok());
        assert!(claims(Role::Guest, 7).require_self_or_admin(7).is_err());
    }

    #[test]
    fn admin_check_rejects_users() {
        assert!(claims(Role::Admin, 1).require_admin().is_ok());
        assert!(claims(Role::User, 1).require_admin().is_err());
        assert!(claims(Role::User, 1).require_user().is_ok());
    }
}
