//! HTTP handlers and route table for the catalog.
//!
//! Bodies are decoded from raw bytes so that malformed JSON stays a
//! decode failure (500 with the endpoint's fixed message) while missing
//! fields default to empty strings and fail validation (422).

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use bookshelf_http::HttpError;

use super::models::Book;
use super::service::LibraryService;

const ERR_INVALID_INPUT_BODY: &str = "Invalid input body.";
const ERR_INVALID_PATH_VARIABLES: &str = "Invalid path variables.";

const ERR_CREATE_AUTHOR: &str = "We could not create new author. Please try again.";
const ERR_GET_AUTHORS_BOOKS: &str = "We could not get author's books. Please try again.";
const ERR_CREATE_BOOK: &str = "We could not create new book. Please try again.";
const ERR_GET_BOOK: &str = "We could not get book. Please try again.";

/// Route table for the catalog endpoints.
pub fn routes(service: Arc<LibraryService>) -> Router {
    Router::new()
        .route("/api/authors", post(create_author))
        .route("/api/books", post(create_book))
        .route("/api/books/{id}", get(get_book))
        .route("/api/authors/{id}/books/", get(get_authors_books))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
struct CreateAuthorBody {
    #[serde(default)]
    name: String,
}

async fn create_author(
    State(service): State<Arc<LibraryService>>,
    body: Bytes,
) -> Result<StatusCode, HttpError> {
    let input: CreateAuthorBody =
        serde_json::from_slice(&body).map_err(|_| HttpError::Internal(ERR_CREATE_AUTHOR))?;
    if input.name.is_empty() {
        return Err(HttpError::UnprocessableEntity(ERR_INVALID_INPUT_BODY));
    }

    service
        .create_author(&input.name)
        .await
        .map_err(|_| HttpError::Internal(ERR_CREATE_AUTHOR))?;

    Ok(StatusCode::CREATED)
}

#[derive(Debug, Deserialize)]
struct CreateBookBody {
    #[serde(default)]
    title: String,
    #[serde(default)]
    author_id: String,
}

async fn create_book(
    State(service): State<Arc<LibraryService>>,
    body: Bytes,
) -> Result<StatusCode, HttpError> {
    let input: CreateBookBody =
        serde_json::from_slice(&body).map_err(|_| HttpError::Internal(ERR_CREATE_BOOK))?;
    if input.title.is_empty() {
        return Err(HttpError::UnprocessableEntity(ERR_INVALID_INPUT_BODY));
    }
    let author_id = Uuid::parse_str(&input.author_id)
        .map_err(|_| HttpError::UnprocessableEntity(ERR_INVALID_INPUT_BODY))?;

    service
        .create_book(&input.title, author_id)
        .await
        .map_err(|_| HttpError::Internal(ERR_CREATE_BOOK))?;

    Ok(StatusCode::CREATED)
}

async fn get_book(
    State(service): State<Arc<LibraryService>>,
    Path(id): Path<String>,
) -> Result<Json<Book>, HttpError> {
    let book_id = parse_path_id(&id, ERR_GET_BOOK)?;

    let book = service
        .get_book(book_id)
        .await
        .map_err(|_| HttpError::Internal(ERR_GET_BOOK))?;

    Ok(Json(book))
}

async fn get_authors_books(
    State(service): State<Arc<LibraryService>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Book>>, HttpError> {
    let author_id = parse_path_id(&id, ERR_GET_AUTHORS_BOOKS)?;

    let books = service
        .get_authors_books(author_id)
        .await
        .map_err(|_| HttpError::Internal(ERR_GET_AUTHORS_BOOKS))?;

    // An empty list serializes as a literal `[]`, never `null`.
    Ok(Json(books))
}

/// An empty capture is structurally invalid; a 36-character capture that
/// is not a well-formed UUID is framed with the endpoint's fixed message.
/// Dispatch only recognizes 36-character identifier segments, so any
/// other length is an unmatched path. The router cannot produce an empty
/// segment, but the branch keeps the dispatch contract explicit.
fn parse_path_id(raw: &str, endpoint_message: &'static str) -> Result<Uuid, HttpError> {
    if raw.is_empty() {
        return Err(HttpError::UnprocessableEntity(ERR_INVALID_PATH_VARIABLES));
    }
    if raw.len() != 36 {
        return Err(HttpError::NotFound);
    }
    Uuid::parse_str(raw).map_err(|_| HttpError::Internal(endpoint_message))
}
