//! Application error types and HTTP response mapping.
//!
//! `BlameError` covers every user-facing failure of the blame engine; its
//! `Display` text is what lands in the status line. `AppError` wraps it for the
//! HTTP layer and implements Axum's `IntoResponse` with a JSON error body.
//!
//! Error mappings:
//! - `NoActiveFile` → 400
//! - `FileNotFound`, `NotInRepository`, `RepoNotFound` → 404
//! - `NotOpen`, `Busy` → 409
//! - `Untracked`, `Empty`, `NoEarlierHistory`, `NoContext`, `Uncommitted` → 422
//! - `Invocation` → 502

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlameError {
    #[error("No active file to blame")]
    NoActiveFile,

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Not inside a git repository: {0}")]
    NotInRepository(String),

    #[error("File is not tracked by git: {0}")]
    Untracked(String),

    #[error("git blame failed: {0}")]
    Invocation(String),

    #[error("No blame information available")]
    Empty,

    #[error("No earlier history: {0}")]
    NoEarlierHistory(String),

    #[error("Move the cursor onto a blamed line first")]
    NoContext,

    #[error("This line is not committed yet")]
    Uncommitted,

    #[error("Blame view is not open")]
    NotOpen,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Blame(#[from] BlameError),

    #[error("Repository not found: {0}")]
    RepoNotFound(String),

    #[error("Another blame operation is in progress")]
    Busy,

    #[error("Unknown key: {0}")]
    UnboundKey(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Blame(e) => match e {
                BlameError::NoActiveFile => StatusCode::BAD_REQUEST,
                BlameError::FileNotFound(_) | BlameError::NotInRepository(_) => {
                    StatusCode::NOT_FOUND
                }
                BlameError::NotOpen => StatusCode::CONFLICT,
                BlameError::Invocation(_) => StatusCode::BAD_GATEWAY,
                BlameError::Untracked(_)
                | BlameError::Empty
                | BlameError::NoEarlierHistory(_)
                | BlameError::NoContext
                | BlameError::Uncommitted => StatusCode::UNPROCESSABLE_ENTITY,
            },
            AppError::RepoNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Busy => StatusCode::CONFLICT,
            AppError::UnboundKey(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
