//! Client error types.

use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Service not configured: {0}")]
    NotConfigured(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Transcript not found for {0}")]
    TranscriptNotFound(String),

    #[error("Invalid transcript: {0}")]
    InvalidTranscript(String),

    #[error("Image decode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Media error: {0}")]
    Media(#[from] reelcut_media::MediaError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    pub fn request_failed(msg: impl Into<String>) -> Self {
        Self::RequestFailed(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Whether the failure concerns the source video rather than the service.
    pub fn is_input_error(&self) -> bool {
        match self {
            ClientError::TranscriptNotFound(_) | ClientError::InvalidTranscript(_) => true,
            ClientError::Media(e) => e.is_input_error(),
            _ => false,
        }
    }
}
