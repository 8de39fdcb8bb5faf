//! Pipeline run metadata.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Counters collected over one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RunStats {
    pub videos_processed: u32,
    pub videos_skipped: u32,
    pub clips_accepted: u32,
    pub clips_remediated: u32,
    pub clips_rejected: u32,
    pub clips_failed: u32,
    pub clips_duplicate: u32,
    pub segments_discarded: u32,
    pub queue_entries_created: u32,
}

impl RunStats {
    /// Add another set of counters into this one.
    pub fn merge(&mut self, other: &RunStats) {
        self.videos_processed += other.videos_processed;
        self.videos_skipped += other.videos_skipped;
        self.clips_accepted += other.clips_accepted;
        self.clips_remediated += other.clips_remediated;
        self.clips_rejected += other.clips_rejected;
        self.clips_failed += other.clips_failed;
        self.clips_duplicate += other.clips_duplicate;
        self.segments_discarded += other.segments_discarded;
        self.queue_entries_created += other.queue_entries_created;
    }
}

/// One pipeline run, appended to the store when the run finishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RunRecord {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub stats: RunStats,
}

impl RunRecord {
    /// Start a new run now.
    pub fn start() -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            finished_at: None,
            stats: RunStats::default(),
        }
    }

    /// Mark the run finished with its final counters.
    pub fn finish(mut self, stats: RunStats) -> Self {
        self.finished_at = Some(Utc::now());
        self.stats = stats;
        self
    }
}
