//! Clip pipeline driver.
//!
//! This crate provides:
//! - Boundary reconciliation of transcript segments against scene cuts
//! - Safety moderation and in-place remediation of cut clips
//! - Per-video and per-run orchestration with bounded video concurrency
//! - Environment configuration, structured logging and metrics

pub mod clip_pipeline;
pub mod collaborators;
pub mod config;
pub mod driver;
pub mod error;
pub mod logging;
pub mod metrics;

pub use collaborators::Collaborators;
pub use config::{ClassifierKind, FeatureFlags, PipelineConfig, TranscriberKind};
pub use driver::{Pipeline, VideoReport};
pub use error::{FailureKind, WorkerError, WorkerResult};
pub use logging::VideoLogger;
