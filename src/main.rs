//! Libris Server - Library Management System
//!
//! REST API server for book lending: catalog, accounts, issues and
//! returns with overdue fines, feedback, and notifications.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use libris_server::{api, config::AppConfig, repository::Repository, services::Services, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("libris_server={},tower_http=debug", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Libris Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository, config.auth.clone(), config.policy.clone());

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/register", post(api::auth::register))
        .route("/auth/login", post(api::auth::login))
        .route("/auth/admin/register", post(api::auth::register_admin))
        .route("/auth/admin/login", post(api::auth::login_admin))
        // Book catalog (public)
        .route("/books", get(api::books::list_books))
        .route("/books/search", get(api::books::search_books))
        .route("/books/:id", get(api::books::get_book))
        // Issues
        .route("/issues", post(api::loans::issue_book))
        .route("/issues/:id/return", put(api::loans::return_book))
        .route("/issues/user/:user_id", get(api::loans::get_user_loans))
        // Profile
        .route("/user/me", get(api::users::get_profile))
        .route("/user/me", put(api::users::update_profile))
        // Feedback
        .route("/feedback", post(api::feedback::submit_feedback))
        .route("/feedback/book/:id", get(api::feedback::get_book_feedback))
        // Notifications
        .route(
            "/notifications/user/:user_id",
            get(api::notifications::get_notifications),
        )
        .route(
            "/notifications/:id/read",
            put(api::notifications::mark_read),
        )
        .route(
            "/notifications/user/:user_id/read-all",
            put(api::notifications::mark_all_read),
        )
        .route(
            "/notifications/:id",
            delete(api::notifications::delete_notification),
        )
        .route(
            "/notifications/user/:user_id",
            delete(api::notifications::delete_all_notifications),
        )
        // Admin
        .route("/admin/books", post(api::books::create_book))
        .route("/admin/books/:id", put(api::books::update_book))
        .route("/admin/books/:id", delete(api::books::delete_book))
        .route("/admin/users", get(api::users::list_users))
        .route("/admin/users", post(api::users::create_user))
        .route("/admin/users/:id", put(api::users::update_user))
        .route("/admin/users/:id", delete(api::users::delete_user))
        .route("/admin/stats", get(api::stats::get_stats))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
