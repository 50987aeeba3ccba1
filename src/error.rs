//! Error types for the content server
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::config::NotFoundStyle;
use crate::render::not_found_page;

// == Content Error Enum ==
/// Unified error type for request handling.
///
/// Store failures are not listed: they are absorbed by the cache layer.
#[derive(Error, Debug)]
pub enum ContentError {
    /// No route, no file, or a route/target mismatch
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or wrong shared secret
    #[error("Unauthorized")]
    Unauthorized,

    /// A dynamic handler failed
    #[error("Handler for `{route}` failed: {message}")]
    HandlerFailure { route: String, message: String },

    /// A text could not be read from disk
    #[error("Failed to read {path}: {source}")]
    DiskRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ContentError {
    /// Status code the client sees.
    pub fn status(&self) -> StatusCode {
        match self {
            ContentError::Unauthorized => StatusCode::UNAUTHORIZED,
            _ => StatusCode::NOT_FOUND,
        }
    }

    /// Builds the response, rendering 404 bodies in the requested style.
    pub fn into_response_with(self, style: NotFoundStyle) -> Response {
        match self.status() {
            StatusCode::UNAUTHORIZED => (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
            status => match style {
                NotFoundStyle::Html => (status, Html(not_found_page())).into_response(),
                NotFoundStyle::Plain => (status, "Not Found").into_response(),
            },
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ContentError {
    fn into_response(self) -> Response {
        self.into_response_with(NotFoundStyle::Html)
    }
}

// == Result Type Alias ==
/// Convenience Result type for the content server.
pub type Result<T> = std::result::Result<T, ContentError>;
