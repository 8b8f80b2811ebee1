//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, feedback, health, loans, notifications, stats, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Libris API",
        version = "0.3.0",
        description = "Library Management System REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::register_admin,
        auth::login_admin,
        // Books
        books::list_books,
        books::search_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Issues
        loans::issue_book,
        loans::return_book,
        loans::get_user_loans,
        // Users
        users::get_profile,
        users::update_profile,
        users::list_users,
        users::create_user,
        users::update_user,
        users::delete_user,
        // Feedback
        feedback::submit_feedback,
        feedback::get_book_feedback,
        // Notifications
        notifications::get_notifications,
        notifications::mark_read,
        notifications::mark_all_read,
        notifications::delete_notification,
        notifications::delete_all_notifications,
        // Stats
        stats::get_stats,
    ),
    components(
        schemas(
            // Auth
            auth::AuthResponse,
            crate::models::user::RegisterUser,
            crate::models::user::RegisterAdmin,
            crate::models::user::LoginRequest,
            crate::models::user::Role,
            // Books
            crate::models::book::Book,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            // Issues
            loans::IssueBookRequest,
            crate::models::loan::LoanStatus,
            crate::models::loan::LoanDetails,
            crate::models::loan::IssueReceipt,
            crate::models::loan::ReturnReceipt,
            // Users
            crate::models::user::User,
            crate::models::user::UserOverview,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            crate::models::user::UpdateProfile,
            // Feedback
            feedback::FeedbackCreated,
            crate::models::feedback::CreateFeedback,
            crate::models::feedback::FeedbackDetails,
            crate::models::feedback::BookFeedback,
            // Notifications
            crate::models::notification::Notification,
            // Stats
            crate::services::stats::LibraryStats,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "books", description = "Book catalog"),
        (name = "issues", description = "Book issue and return"),
        (name = "users", description = "Profile and user management"),
        (name = "feedback", description = "Book ratings and reviews"),
        (name = "notifications", description = "User notifications"),
        (name = "admin", description = "Admin management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
