//! Pipeline counters.
//!
//! Recorded through the `metrics` facade; with no recorder installed they
//! are no-ops.

use metrics::counter;

/// Metric names as constants for consistency.
pub mod names {
    pub const VIDEOS_TOTAL: &str = "reelcut_videos_total";
    pub const CLIPS_TOTAL: &str = "reelcut_clips_total";
    pub const SEGMENTS_DISCARDED_TOTAL: &str = "reelcut_segments_discarded_total";
    pub const QUEUE_ENTRIES_CREATED_TOTAL: &str = "reelcut_queue_entries_created_total";
    pub const NOTIFICATIONS_TOTAL: &str = "reelcut_notifications_total";
}

/// Record a finished video: `processed` or `skipped`.
pub fn record_video(outcome: &'static str) {
    counter!(names::VIDEOS_TOTAL, "outcome" => outcome).increment(1);
}

/// Record a clip outcome: `accepted`, `remediated`, `rejected`, `failed`
/// or `duplicate`.
pub fn record_clip(outcome: &'static str) {
    counter!(names::CLIPS_TOTAL, "outcome" => outcome).increment(1);
}

pub fn record_segments_discarded(count: u64) {
    counter!(names::SEGMENTS_DISCARDED_TOTAL).increment(count);
}

pub fn record_queue_entries(count: u64) {
    counter!(names::QUEUE_ENTRIES_CREATED_TOTAL).increment(count);
}

pub fn record_notification() {
    counter!(names::NOTIFICATIONS_TOTAL).increment(1);
}
