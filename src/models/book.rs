//! Book catalog models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Book with derived availability.
///
/// `available_copies` is always computed as stock minus currently-issued
/// loans; it is never read from a stored counter.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub book_id: i32,
    pub isbn: Option<String>,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub page_count: Option<i32>,
    pub publication_date: Option<NaiveDate>,
    pub price: Option<Decimal>,
    pub stock: i32,
    pub location: Option<String>,
    pub cover_image: Option<String>,
    pub is_featured: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    /// Comma-separated author names, aggregated in the query
    pub authors: Option<String>,
    /// stock − count(issued loans), computed per row
    pub available_copies: i64,
    pub is_available: bool,
}

/// Create book request (admin only).
/// Stock is the single source of truth; availability is derived from it.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    /// Comma-separated author names; missing authors are created
    pub authors: Option<String>,
    /// Category label; created on first use
    pub category: Option<String>,
    pub isbn: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: Option<i32>,
    pub location: Option<String>,
}

/// Update book request (admin only)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    pub title: Option<String>,
    pub isbn: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: Option<i32>,
    pub location: Option<String>,
    pub is_featured: Option<bool>,
    pub is_active: Option<bool>,
}

/// Search query parameters
#[derive(Debug, Deserialize, utoipa::IntoParams, ToSchema)]
pub struct BookSearchQuery {
    /// Matched against title and description
    pub q: String,
}
