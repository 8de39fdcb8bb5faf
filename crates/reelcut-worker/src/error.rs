//! Worker error types.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

/// Failure classes that decide how much work an error drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Malformed or unreadable video or transcript: skip the video.
    Input,
    /// Cut, classify, blur, overlay or notify failed: skip the clip.
    ExternalTool,
    /// Store could not be written: abort the run.
    Persistence,
    /// Invalid configuration: abort before touching any video.
    Config,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Input => "input",
            FailureKind::ExternalTool => "external-tool",
            FailureKind::Persistence => "persistence",
            FailureKind::Config => "config",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("{0} timed out after {1}s")]
    Timeout(&'static str, u64),

    #[error("Media error: {0}")]
    Media(#[from] reelcut_media::MediaError),

    #[error("Client error: {0}")]
    Client(#[from] reelcut_clients::ClientError),

    #[error("Storage error: {0}")]
    Storage(#[from] reelcut_storage::StorageError),

    #[error("Queue error: {0}")]
    Queue(#[from] reelcut_queue::QueueError),

    #[error("Clip policy error: {0}")]
    Policy(#[from] reelcut_models::PolicyError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            WorkerError::ConfigError(_) | WorkerError::Queue(_) | WorkerError::Policy(_) => {
                FailureKind::Config
            }
            WorkerError::Storage(_) => FailureKind::Persistence,
            WorkerError::Media(e) if e.is_input_error() => FailureKind::Input,
            WorkerError::Client(e) if e.is_input_error() => FailureKind::Input,
            WorkerError::Media(_)
            | WorkerError::Client(_)
            | WorkerError::Timeout(..)
            | WorkerError::Io(_) => FailureKind::ExternalTool,
        }
    }

    /// Whether the run must stop.
    pub fn is_fatal(&self) -> bool {
        matches!(self.kind(), FailureKind::Persistence | FailureKind::Config)
    }
}
