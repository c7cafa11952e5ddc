//! Application service orchestrating entity construction, identifier
//! generation, and persistence.
//!
//! Every failure is logged exactly once here, with structured fields,
//! before it is returned wrapped to the handler. No retries: a store
//! failure is terminal for the request.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use super::models::{Author, Book, ValidationError};
use super::store::{LibraryStore, StoreError};

/// Capability for minting fresh entity identifiers, swappable for
/// deterministic testing.
pub trait IdGenerator: Send + Sync {
    fn new_id(&self) -> Uuid;
}

/// Production generator producing random v4 identifiers.
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn new_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Service failure, wrapping the underlying cause with a short prefix.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("failed to init author: {0}")]
    InvalidAuthor(#[source] ValidationError),
    #[error("failed to init book: {0}")]
    InvalidBook(#[source] ValidationError),
    #[error("failed to create author: {0}")]
    CreateAuthor(#[source] StoreError),
    #[error("failed to create book: {0}")]
    CreateBook(#[source] StoreError),
    #[error("failed to get book by id: {0}")]
    GetBook(#[source] StoreError),
    #[error("failed to get author by id: {0}")]
    GetAuthor(#[source] StoreError),
    #[error("failed to get books by author id: {0}")]
    GetAuthorsBooks(#[source] StoreError),
}

pub struct LibraryService {
    store: Arc<dyn LibraryStore>,
    ids: Arc<dyn IdGenerator>,
}

impl LibraryService {
    pub fn new(store: Arc<dyn LibraryStore>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { store, ids }
    }

    /// Persist a new author under a freshly generated id. An empty name
    /// fails before any store call.
    pub async fn create_author(&self, name: &str) -> Result<(), ServiceError> {
        let author = Author::new(name, self.ids.new_id()).map_err(|error| {
            tracing::error!(error = %error, "failed to init author");
            ServiceError::InvalidAuthor(error)
        })?;

        self.store.create_author(&author).await.map_err(|error| {
            tracing::error!(author_name = %name, error = %error, "failed to create author");
            ServiceError::CreateAuthor(error)
        })
    }

    /// Persist a new book under a freshly generated id, referencing the
    /// given author. An empty title fails before any store call.
    pub async fn create_book(&self, title: &str, author_id: Uuid) -> Result<(), ServiceError> {
        let book =
            Book::new(title, self.ids.new_id(), Author::stub(author_id)).map_err(|error| {
                tracing::error!(author_id = %author_id, error = %error, "failed to init book");
                ServiceError::InvalidBook(error)
            })?;

        self.store.create_book(&book).await.map_err(|error| {
            tracing::error!(
                author_id = %author_id,
                book_title = %title,
                error = %error,
                "failed to create book"
            );
            ServiceError::CreateBook(error)
        })
    }

    /// Fetch a book and replace its author stub with the full record.
    /// A failing book lookup short-circuits before the author lookup.
    pub async fn get_book(&self, book_id: Uuid) -> Result<Book, ServiceError> {
        let mut book = self.store.get_book_by_id(book_id).await.map_err(|error| {
            tracing::error!(book_id = %book_id, error = %error, "failed to get book");
            ServiceError::GetBook(error)
        })?;

        let author = self
            .store
            .get_author_by_id(book.author.id)
            .await
            .map_err(|error| {
                tracing::error!(book_id = %book_id, error = %error, "failed to get author");
                ServiceError::GetAuthor(error)
            })?;
        book.author = author;

        Ok(book)
    }

    /// Return the store's result unmodified; possibly empty, never
    /// enriched.
    pub async fn get_authors_books(&self, author_id: Uuid) -> Result<Vec<Book>, ServiceError> {
        self.store
            .get_books_by_author_id(author_id)
            .await
            .map_err(|error| {
                tracing::error!(
                    author_id = %author_id,
                    error = %error,
                    "failed to get books by author id"
                );
                ServiceError::GetAuthorsBooks(error)
            })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory fakes substituting the store and id capabilities.

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use uuid::Uuid;

    use crate::modules::library::models::{Author, Book};
    use crate::modules::library::store::{LibraryStore, StoreError};

    /// Always returns the same identifier.
    pub struct FixedIds(pub Uuid);

    impl super::IdGenerator for FixedIds {
        fn new_id(&self) -> Uuid {
            self.0
        }
    }

    /// Stores entities in insertion order; point lookups behave like the
    /// real store (`NotFound` on zero rows, author stubs on book reads).
    #[derive(Default)]
    pub struct InMemoryStore {
        pub authors: Mutex<Vec<Author>>,
        pub books: Mutex<Vec<Book>>,
        pub author_lookups: AtomicUsize,
    }

    #[async_trait]
    impl LibraryStore for InMemoryStore {
        async fn create_author(&self, author: &Author) -> Result<(), StoreError> {
            self.authors.lock().unwrap().push(author.clone());
            Ok(())
        }

        async fn create_book(&self, book: &Book) -> Result<(), StoreError> {
            self.books.lock().unwrap().push(book.clone());
            Ok(())
        }

        async fn get_book_by_id(&self, book_id: Uuid) -> Result<Book, StoreError> {
            self.books
                .lock()
                .unwrap()
                .iter()
                .find(|book| book.id == book_id)
                .map(|book| Book {
                    author: Author::stub(book.author.id),
                    ..book.clone()
                })
                .ok_or(StoreError::NotFound)
        }

        async fn get_author_by_id(&self, author_id: Uuid) -> Result<Author, StoreError> {
            self.author_lookups.fetch_add(1, Ordering::SeqCst);
            self.authors
                .lock()
                .unwrap()
                .iter()
                .find(|author| author.id == author_id)
                .cloned()
                .ok_or(StoreError::NotFound)
        }

        async fn get_books_by_author_id(&self, author_id: Uuid) -> Result<Vec<Book>, StoreError> {
            Ok(self
                .books
                .lock()
                .unwrap()
                .iter()
                .filter(|book| book.author.id == author_id)
                .map(|book| Book {
                    author: Author::stub(book.author.id),
                    ..book.clone()
                })
                .collect())
        }
    }

    /// Fails every operation with a connectivity-style error.
    pub struct FailingStore;

    fn closed() -> StoreError {
        StoreError::Database(sqlx::Error::PoolClosed)
    }

    #[async_trait]
    impl LibraryStore for FailingStore {
        async fn create_author(&self, _author: &Author) -> Result<(), StoreError> {
            Err(closed())
        }

        async fn create_book(&self, _book: &Book) -> Result<(), StoreError> {
            Err(closed())
        }

        async fn get_book_by_id(&self, _book_id: Uuid) -> Result<Book, StoreError> {
            Err(closed())
        }

        async fn get_author_by_id(&self, _author_id: Uuid) -> Result<Author, StoreError> {
            Err(closed())
        }

        async fn get_books_by_author_id(&self, _author_id: Uuid) -> Result<Vec<Book>, StoreError> {
            Err(closed())
        }
    }
}
