//! Authentication endpoints for users and admins

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::user::{LoginRequest, RegisterAdmin, RegisterUser, Role},
    AppState,
};

/// Token response for successful registration or login
#[derive(Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Register a new user account
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterUser,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterUser>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (token, user) = state.services.auth.register_user(&request).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user_id: user.user_id,
            name: user.name,
            email: user.email,
            role: Role::User,
        }),
    ))
}

/// Log in as a user
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (token, user) = state
        .services
        .auth
        .login_user(&request.email, &request.password)
        .await?;

    Ok(Json(AuthResponse {
        token,
        user_id: user.user_id,
        name: user.name,
        email: user.email,
        role: Role::User,
    }))
}

/// Register an admin account. Requires the shared admin registration key.
#[utoipa::path(
    post,
    path = "/auth/admin/register",
    tag = "auth",
    request_body = RegisterAdmin,
    responses(
        (status = 201, description = "Admin account created", body = AuthResponse),
        (status = 403, description = "Invalid admin key"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register_admin(
    State(state): State<AppState>,
    Json(request): Json<RegisterAdmin>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (token, admin) = state.services.auth.register_admin(&request).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user_id: admin.admin_id,
            name: admin.name,
            email: admin.email,
            role: Role::Admin,
        }),
    ))
}

/// Log in as an admin
#[utoipa::path(
    post,
    path = "/auth/admin/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login_admin(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (token, admin) = state
        .services
        .auth
        .login_admin(&request.email, &request.password)
        .await?;

    Ok(Json(AuthResponse {
        token,
        user_id: admin.admin_id,
        name: admin.name,
        email: admin.email,
        role: Role::Admin,
    }))
}
