//! External collaborators for the clip pipeline.
//!
//! This crate provides:
//! - Transcribers: sidecar files next to the video, or a Whisper-compatible API
//! - Safety classifiers: Vision SafeSearch, or a local pixel heuristic
//! - Notifiers: Telegram bot, or log-only

pub mod classifier;
pub mod error;
pub mod heuristic;
pub mod notifier;
pub mod transcriber;
pub mod vision;
pub mod whisper;

pub use classifier::SafetyClassifier;
pub use error::{ClientError, ClientResult};
pub use heuristic::HeuristicClassifier;
pub use notifier::{LogNotifier, Notifier, TelegramConfig, TelegramNotifier};
pub use transcriber::{parse_srt, SidecarTranscriber, Transcriber};
pub use vision::{RemoteClassifier, VisionConfig, DEFAULT_VISION_URL};
pub use whisper::{WhisperConfig, WhisperTranscriber, DEFAULT_WHISPER_URL};
