use thiserror::Error;

/// Errors that can occur while handing a message to a transport.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Network-level failure talking to the provider.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider rejected the request (bad credentials, unknown number, …).
    #[error("Provider error {status}: {message}")]
    Api {
        status: u16,
        code: Option<i64>,
        message: String,
    },

    /// The destination cannot be addressed at all.
    #[error("Invalid destination: {0:?}")]
    InvalidDestination(String),

    /// The transport is selected but not configured.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NotifyError>;
