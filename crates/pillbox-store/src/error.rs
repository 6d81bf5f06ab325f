use pillbox_core::CoreError;
use thiserror::Error;

/// Errors that can occur within any record store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying SQLite / rusqlite error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The remote store could not be reached.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote store answered with a non-success status.
    #[error("Remote store returned {status}: {message}")]
    Remote { status: u16, message: String },

    /// No record with the given ID exists in the store.
    #[error("Medicine not found: {id}")]
    NotFound { id: i64 },

    /// The record was rejected before reaching the backend.
    #[error(transparent)]
    Invalid(#[from] CoreError),

    /// The backend is selected but not configured.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem failure preparing the database location.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
