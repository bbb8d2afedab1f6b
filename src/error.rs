//! Error types shared by the stores and the HTTP handlers

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Wiki errors, from storage up to the request handlers
#[derive(Error, Debug)]
pub enum WikiError {
    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Title cannot be empty")]
    EmptyTitle,

    #[error("Page already exists")]
    PageExists(String),

    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    #[error("Invalid request method")]
    MethodNotAllowed,

    #[error("Unable to upload file")]
    MissingUpload,

    #[error("Malformed form data: {0}")]
    Form(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Feature service error: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, WikiError>;

impl WikiError {
    /// HTTP status this error is reported with
    pub fn status(&self) -> StatusCode {
        match self {
            WikiError::PageNotFound(_) => StatusCode::NOT_FOUND,
            WikiError::EmptyTitle
            | WikiError::EmptyField(_)
            | WikiError::MissingUpload
            | WikiError::Form(_) => StatusCode::BAD_REQUEST,
            WikiError::PageExists(_) => StatusCode::CONFLICT,
            WikiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            WikiError::Io(_)
            | WikiError::Template(_)
            | WikiError::Upstream(_)
            | WikiError::Database(_)
            | WikiError::Join(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WikiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            // Causes stay in the log; clients only see the status text
            tracing::error!("Request failed: {:#}", self);
            let reason = status.canonical_reason().unwrap_or("Internal Server Error");
            return (status, reason).into_response();
        }
        (status, self.to_string()).into_response()
    }
}
