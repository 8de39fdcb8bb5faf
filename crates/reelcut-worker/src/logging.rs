//! Structured per-video logging.
//!
//! Gives every event about one source video the same `run_id` and `source`
//! fields so a run can be followed video by video.

use tracing::{error, info, warn, Span};

/// Logger scoped to one source video within one run.
#[derive(Debug, Clone)]
pub struct VideoLogger {
    run_id: String,
    source: String,
}

impl VideoLogger {
    pub fn new(run_id: &str, source: &str) -> Self {
        Self {
            run_id: run_id.to_string(),
            source: source.to_string(),
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(
            run_id = %self.run_id,
            source = %self.source,
            "Video started: {}", message
        );
    }

    pub fn log_progress(&self, message: &str) {
        info!(
            run_id = %self.run_id,
            source = %self.source,
            "Video progress: {}", message
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!(
            run_id = %self.run_id,
            source = %self.source,
            "Video warning: {}", message
        );
    }

    pub fn log_error(&self, message: &str) {
        error!(
            run_id = %self.run_id,
            source = %self.source,
            "Video error: {}", message
        );
    }

    pub fn log_completion(&self, message: &str) {
        info!(
            run_id = %self.run_id,
            source = %self.source,
            "Video completed: {}", message
        );
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Span carrying the run and source fields.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "video",
            run_id = %self.run_id,
            source = %self.source
        )
    }
}
