//! Shared data models for the Reelcut clip pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Transcript segments and scene boundaries (pipeline inputs)
//! - Clip intervals and the duration policy that shapes them
//! - Safety annotations and moderation decisions
//! - Persisted clip records, queue entries and run metadata
//! - Encoding configuration for the media tool

pub mod clip;
pub mod encoding;
pub mod interval;
pub mod run;
pub mod safety;
pub mod schedule;
pub mod segment;
pub mod timestamp;

// Re-export common types
pub use clip::{
    clip_filename, combined_filename, derive_clip_id, sanitize_filename_title, source_tag, ClipRecord,
    Emotion,
};
pub use encoding::EncodingConfig;
pub use interval::{ClipInterval, ClipPolicy, PolicyError};
pub use run::{RunRecord, RunStats};
pub use safety::{Likelihood, MarkerSymbol, ModerationDecision, Remediation, SafetyAnnotation, SafetyRecord};
pub use schedule::{EngagementWindow, QueueEntry};
pub use segment::{SceneBoundaries, TranscriptSegment};
pub use timestamp::{parse_time_of_day, parse_timestamp, TimestampError};
