use std::path::PathBuf;
use thiserror::Error;

pub type MediaResult<T> = Result<T, MediaError>;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("ffmpeg binary not found in PATH")]
    FfmpegNotFound,

    #[error("ffprobe binary not found in PATH")]
    FfprobeNotFound,

    #[error("ffmpeg failed: {message}")]
    FfmpegFailed {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("ffprobe failed: {message}")]
    FfprobeFailed {
        message: String,
        stderr: Option<String>,
    },

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Not a usable video: {0}")]
    InvalidVideo(String),

    #[error("Invalid media request: {0}")]
    InvalidInput(String),

    #[error("Unreadable ffprobe output: {0}")]
    ProbeOutput(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    pub fn ffmpeg_failed(
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::FfmpegFailed {
            message: message.into(),
            stderr,
            exit_code,
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Whether the error is about the source rather than the tool.
    ///
    /// Source problems skip the whole video; tool problems skip one clip.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            MediaError::FileNotFound(_) | MediaError::InvalidVideo(_) | MediaError::InvalidInput(_)
        )
    }

    /// Captured stderr of a failed tool run, if any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            MediaError::FfmpegFailed { stderr, .. } | MediaError::FfprobeFailed { stderr, .. } => {
                stderr.as_deref()
            }
            _ => None,
        }
    }
}
