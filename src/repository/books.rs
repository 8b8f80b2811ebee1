//! Books repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, CreateBook, UpdateBook},
};

// Shared projection: every book read derives availability from stock minus
// issued loans, never from a stored counter.
const BOOK_COLUMNS: &str = r#"
    b.book_id, b.isbn, b.title, b.subtitle, b.description, b.language,
    b.page_count, b.publication_date, b.price, b.stock, b.location,
    b.cover_image, b.is_featured, b.is_active, b.created_at,
    (SELECT STRING_AGG(a.name, ', ' ORDER BY a.name)
     FROM book_authors ba
     JOIN authors a ON ba.author_id = a.author_id
     WHERE ba.book_id = b.book_id) AS authors,
    b.stock - (SELECT COUNT(*) FROM loans l
               WHERE l.book_id = b.book_id AND l.status = 'issued') AS available_copies,
    (b.stock - (SELECT COUNT(*) FROM loans l
                WHERE l.book_id = b.book_id AND l.status = 'issued')) > 0 AS is_available
"#;

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get all active books with availability, ordered by title
    pub async fn list(&self) -> AppResult<Vec<Book>> {
        let query = format!(
            "SELECT {} FROM books b WHERE b.is_active ORDER BY b.title",
            BOOK_COLUMNS
        );
        let books = sqlx::query_as::<_, Book>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    /// Get an active book by ID
    pub async fn get_by_id(&self, book_id: i32) -> AppResult<Book> {
        let query = format!(
            "SELECT {} FROM books b WHERE b.book_id = $1 AND b.is_active",
            BOOK_COLUMNS
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(book_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", book_id)))
    }

    /// Search active books by title or description
    pub async fn search(&self, term: &str) -> AppResult<Vec<Book>> {
        let query = format!(
            r#"
            SELECT {} FROM books b
            WHERE b.is_active AND (b.title ILIKE $1 OR b.description ILIKE $1)
            ORDER BY b.title
            "#,
            BOOK_COLUMNS
        );
        let pattern = format!("%{}%", term);
        let books = sqlx::query_as::<_, Book>(&query)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    /// Create a new book with optional authors and category.
    /// Everything happens inside one transaction.
    pub async fn create(&self, book: &CreateBook) -> AppResult<i32> {
        let mut tx = self.pool.begin().await?;

        let book_id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO books (title, isbn, description, price, stock, location, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, TRUE)
            RETURNING book_id
            "#,
        )
        .bind(&book.title)
        .bind(&book.isbn)
        .bind(&book.description)
        .bind(&book.price)
        .bind(book.stock.unwrap_or(0))
        .bind(&book.location)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(ref authors) = book.authors {
            for name in authors.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                let author_id = sqlx::query_scalar::<_, i32>(
                    r#"
                    INSERT INTO authors (name) VALUES ($1)
                    ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
                    RETURNING author_id
                    "#,
                )
                .bind(name)
                .fetch_one(&mut *tx)
                .await?;

                sqlx::query(
                    "INSERT INTO book_authors (book_id, author_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
                )
                .bind(book_id)
                .bind(author_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        if let Some(ref category) = book.category {
            let category_id = sqlx::query_scalar::<_, i32>(
                r#"
                INSERT INTO categories (name) VALUES ($1)
                ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
                RETURNING category_id
                "#,
            )
            .bind(category)
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query(
                "INSERT INTO book_categories (book_id, category_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(book_id)
            .bind(category_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(book_id)
    }

    /// Update an existing book.
    ///
    /// Stock changes run under a row lock: lowering stock below the copies
    /// currently issued would drive derived availability negative, so such
    /// updates are refused.
    pub async fn update(&self, book_id: i32, book: &UpdateBook) -> AppResult<()> {
        // Build dynamic update query
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

        add_field!(book.title, "title");
        add_field!(book.isbn, "isbn");
        add_field!(book.description, "description");
        add_field!(book.price, "price");
        add_field!(book.stock, "stock");
        add_field!(book.location, "location");
        add_field!(book.is_featured, "is_featured");
        add_field!(book.is_active, "is_active");

        if sets.is_empty() {
            return Err(AppError::Validation("No fields to update".to_string()));
        }

        let query = format!(
            "UPDATE books SET {} WHERE book_id = ${}",
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

        bind_field!(book.title);
        bind_field!(book.isbn);
        bind_field!(book.description);
        bind_field!(book.price);
        bind_field!(book.stock);
        bind_field!(book.location);
        bind_field!(book.is_featured);
        bind_field!(book.is_active);

        let mut tx = self.pool.begin().await?;

        if let Some(new_stock) = book.stock {
            sqlx::query_scalar::<_, i32>("SELECT stock FROM books WHERE book_id = $1 FOR UPDATE")
                .bind(book_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!("Book with id {} not found", book_id))
                })?;

            let issued: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM loans WHERE book_id = $1 AND status = 'issued'",
            )
            .bind(book_id)
            .fetch_one(&mut *tx)
            .await?;

            if (new_stock as i64) < issued {
                return Err(AppError::Conflict(format!(
                    "Stock cannot be lowered below the {} copies currently issued",
                    issued
                )));
            }
        }

        let result = builder.bind(book_id).execute(&mut *tx).await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Book with id {} not found",
                book_id
            )));
        }

        tx.commit().await?;

        Ok(())
    }

    /// Delete a book
    pub async fn delete(&self, book_id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE book_id = $1")
            .bind(book_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Book with id {} not found",
                book_id
            )));
        }

        Ok(())
    }
}
