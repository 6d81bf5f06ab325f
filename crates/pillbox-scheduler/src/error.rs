use pillbox_store::StoreError;
use thiserror::Error;

/// Errors that abort a reminder run.
///
/// Delivery failures never show up here; they are logged per recipient.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Listing active medicines failed; nothing was sent this run.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
