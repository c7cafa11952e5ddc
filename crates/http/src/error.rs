//! Error responses for the bookshelf HTTP layer.
//!
//! Clients only ever see a status code and a fixed human-readable message;
//! internal error text never crosses the HTTP boundary. Logging happens at
//! the service layer, not here.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Client-facing request failure carrying a fixed message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HttpError {
    /// Structurally invalid input: failed body validation or a missing
    /// path identifier.
    #[error("{0}")]
    UnprocessableEntity(&'static str),

    /// Decode failure or downstream service failure, framed with the
    /// endpoint's fixed message.
    #[error("{0}")]
    Internal(&'static str),

    /// Path shape the dispatch table does not recognize.
    #[error("not found")]
    NotFound,
}

impl HttpError {
    pub fn status(&self) -> StatusCode {
        match self {
            HttpError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            HttpError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            HttpError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            HttpError::UnprocessableEntity(message) => message,
            HttpError::Internal(message) => message,
            HttpError::NotFound => "",
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status(), self.message()).into_response()
    }
}
