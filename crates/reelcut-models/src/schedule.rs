//! Engagement windows and publish-queue entries.

use chrono::{DateTime, NaiveTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A daily time-of-day range (UTC) considered high-traffic for publishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EngagementWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl EngagementWindow {
    /// Create a window from hour/minute pairs, returning `None` if either
    /// time is invalid or the window is empty.
    pub fn from_hm(start: (u32, u32), end: (u32, u32)) -> Option<Self> {
        let start = NaiveTime::from_hms_opt(start.0, start.1, 0)?;
        let end = NaiveTime::from_hms_opt(end.0, end.1, 0)?;
        (start < end).then_some(Self { start, end })
    }

    /// Whether two windows share any time of day.
    pub fn overlaps(&self, other: &EngagementWindow) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl std::fmt::Display for EngagementWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

/// A clip assigned to a publish slot.
///
/// References the clip by id only; the queue never owns clip lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QueueEntry {
    pub clip_id: String,
    pub scheduled_at: DateTime<Utc>,
    /// Set by the external posting collaborator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_at: Option<DateTime<Utc>>,
}

impl QueueEntry {
    pub fn new(clip_id: impl Into<String>, scheduled_at: DateTime<Utc>) -> Self {
        Self {
            clip_id: clip_id.into(),
            scheduled_at,
            posted_at: None,
        }
    }

    pub fn is_posted(&self) -> bool {
        self.posted_at.is_some()
    }
}
