//! Queue error types.

use thiserror::Error;

pub type QueueResult<T> = Result<T, QueueError>;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("No engagement windows configured")]
    NoWindows,

    #[error("Invalid engagement window '{0}'")]
    InvalidWindow(String),

    #[error("Engagement windows overlap: {0} and {1}")]
    Overlapping(String, String),
}

impl QueueError {
    pub fn invalid_window(text: impl Into<String>) -> Self {
        Self::InvalidWindow(text.into())
    }
}
