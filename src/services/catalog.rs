//! Book catalog service

use crate::{
    error::AppResult,
    models::book::{Book, CreateBook, UpdateBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List all active books with availability
    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    /// Get a single book by ID
    pub async fn get_book(&self, book_id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(book_id).await
    }

    /// Search books by title or description
    pub async fn search_books(&self, term: &str) -> AppResult<Vec<Book>> {
        self.repository.books.search(term).await
    }

    /// Add a book to the catalog (admin)
    pub async fn create_book(&self, book: &CreateBook) -> AppResult<Book> {
        let book_id = self.repository.books.create(book).await?;
        tracing::info!(book_id, title = %book.title, "book created");
        self.repository.books.get_by_id(book_id).await
    }

    /// Update a book (admin)
    pub async fn update_book(&self, book_id: i32, book: &UpdateBook) -> AppResult<Book> {
        self.repository.books.update(book_id, book).await?;
        self.repository.books.get_by_id(book_id).await
    }

    /// Remove a book from the catalog (admin)
    pub async fn delete_book(&self, book_id: i32) -> AppResult<()> {
        self.repository.books.delete(book_id).await?;
        tracing::info!(book_id, "book deleted");
        Ok(())
    }
}
