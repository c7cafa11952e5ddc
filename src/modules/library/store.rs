//! Data access for authors and books.
//!
//! `LibraryStore` is the capability the service is written against;
//! `PgLibraryStore` is the PostgreSQL implementation. Cancellation is
//! cooperative: dropping a request's future abandons the pending query.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use thiserror::Error;
use uuid::Uuid;

use super::models::{Author, Book};

const CREATE_AUTHOR_QUERY: &str = "INSERT INTO authors (id, name) VALUES ($1, $2)";
const CREATE_BOOK_QUERY: &str = "INSERT INTO books (id, title, author_id) VALUES ($1, $2, $3)";
const GET_BOOK_BY_ID_QUERY: &str = "SELECT id, title, author_id FROM books WHERE id = $1";
const GET_AUTHOR_BY_ID_QUERY: &str = "SELECT id, name FROM authors WHERE id = $1";
const GET_BOOKS_BY_AUTHOR_ID_QUERY: &str =
    "SELECT id, title, author_id FROM books WHERE author_id = $1";

/// Storage failure taxonomy.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Zero rows matched a point lookup.
    #[error("no rows in result set")]
    NotFound,

    /// A row came back with an unexpected shape.
    #[error("failed to decode row: {0}")]
    Decode(#[source] sqlx::Error),

    /// Connectivity or constraint failure from the driver, including
    /// foreign-key violations on book creation.
    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            error @ (sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnIndexOutOfBounds { .. }) => StoreError::Decode(error),
            error => StoreError::Database(error),
        }
    }
}

/// Persistence operations the service depends on.
#[async_trait]
pub trait LibraryStore: Send + Sync {
    async fn create_author(&self, author: &Author) -> Result<(), StoreError>;
    async fn create_book(&self, book: &Book) -> Result<(), StoreError>;

    /// Returns the book with an author stub (id only); retrieval does not
    /// join the authors table.
    async fn get_book_by_id(&self, book_id: Uuid) -> Result<Book, StoreError>;

    async fn get_author_by_id(&self, author_id: Uuid) -> Result<Author, StoreError>;

    /// Insertion-ordered books for the author; empty when none exist.
    async fn get_books_by_author_id(&self, author_id: Uuid) -> Result<Vec<Book>, StoreError>;
}

/// PostgreSQL-backed store over a shared connection pool.
pub struct PgLibraryStore {
    pool: PgPool,
}

impl PgLibraryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LibraryStore for PgLibraryStore {
    async fn create_author(&self, author: &Author) -> Result<(), StoreError> {
        sqlx::query(CREATE_AUTHOR_QUERY)
            .bind(author.id)
            .bind(&author.name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn create_book(&self, book: &Book) -> Result<(), StoreError> {
        sqlx::query(CREATE_BOOK_QUERY)
            .bind(book.id)
            .bind(&book.title)
            .bind(book.author.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get_book_by_id(&self, book_id: Uuid) -> Result<Book, StoreError> {
        let row = sqlx::query(GET_BOOK_BY_ID_QUERY)
            .bind(book_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;
        book_from_row(&row)
    }

    async fn get_author_by_id(&self, author_id: Uuid) -> Result<Author, StoreError> {
        let row = sqlx::query(GET_AUTHOR_BY_ID_QUERY)
            .bind(author_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;
        author_from_row(&row)
    }

    async fn get_books_by_author_id(&self, author_id: Uuid) -> Result<Vec<Book>, StoreError> {
        let rows = sqlx::query(GET_BOOKS_BY_AUTHOR_ID_QUERY)
            .bind(author_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(book_from_row).collect()
    }
}

fn book_from_row(row: &PgRow) -> Result<Book, StoreError> {
    let id: Uuid = row.try_get("id").map_err(StoreError::Decode)?;
    let title: String = row.try_get("title").map_err(StoreError::Decode)?;
    let author_id: Uuid = row.try_get("author_id").map_err(StoreError::Decode)?;
    Ok(Book {
        id,
        title,
        author: Author::stub(author_id),
    })
}

fn author_from_row(row: &PgRow) -> Result<Author, StoreError> {
    let id: Uuid = row.try_get("id").map_err(StoreError::Decode)?;
    let name: String = row.try_get("name").map_err(StoreError::Decode)?;
    Ok(Author { id, name })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        let error = StoreError::from(sqlx::Error::RowNotFound);
        assert!(matches!(error, StoreError::NotFound));
    }

    #[test]
    fn column_not_found_maps_to_decode() {
        let error = StoreError::from(sqlx::Error::ColumnNotFound("title".into()));
        assert!(matches!(error, StoreError::Decode(_)));
    }

    #[test]
    fn pool_failure_maps_to_database() {
        let error = StoreError::from(sqlx::Error::PoolClosed);
        assert!(matches!(error, StoreError::Database(_)));
    }
}
