//! Clip intervals and the duration policy used to derive them.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default padding added to both ends of a transcript segment (seconds).
pub const DEFAULT_MARGIN_SECS: f64 = 0.5;
/// Default minimum clip length (seconds).
pub const DEFAULT_MIN_CLIP_SECS: f64 = 5.0;
/// Default maximum clip length (seconds).
pub const DEFAULT_MAX_CLIP_SECS: f64 = 15.0;

/// A `[start, end)` time range inside a source video, in seconds.
///
/// Always satisfies `0 <= start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClipInterval {
    pub start: f64,
    pub end: f64,
}

impl ClipInterval {
    /// Create an interval, returning `None` if the bounds are not ordered.
    pub fn new(start: f64, end: f64) -> Option<Self> {
        if start.is_finite() && end.is_finite() && start >= 0.0 && end > start {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Start in whole milliseconds, used for ids and filenames.
    pub fn start_ms(&self) -> u64 {
        (self.start * 1000.0).round() as u64
    }

    /// End in whole milliseconds, used for ids and filenames.
    pub fn end_ms(&self) -> u64 {
        (self.end * 1000.0).round() as u64
    }
}

impl std::fmt::Display for ClipInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}s-{:.3}s", self.start, self.end)
    }
}

/// Invalid duration policy.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolicyError {
    #[error("clip lengths must be positive and finite (min={min}, max={max})")]
    NonPositive { min: f64, max: f64 },

    #[error("minimum clip length {min}s exceeds maximum {max}s")]
    MinExceedsMax { min: f64, max: f64 },

    #[error("margin must be non-negative, got {0}")]
    NegativeMargin(f64),
}

/// Duration constraints applied when reconciling segment boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClipPolicy {
    /// Minimum clip length in seconds
    #[serde(default = "default_min_len")]
    pub min_len: f64,
    /// Maximum clip length in seconds (before scene snapping)
    #[serde(default = "default_max_len")]
    pub max_len: f64,
    /// Padding added to both ends of the segment
    #[serde(default = "default_margin")]
    pub margin: f64,
}

fn default_min_len() -> f64 {
    DEFAULT_MIN_CLIP_SECS
}
fn default_max_len() -> f64 {
    DEFAULT_MAX_CLIP_SECS
}
fn default_margin() -> f64 {
    DEFAULT_MARGIN_SECS
}

impl Default for ClipPolicy {
    fn default() -> Self {
        Self {
            min_len: DEFAULT_MIN_CLIP_SECS,
            max_len: DEFAULT_MAX_CLIP_SECS,
            margin: DEFAULT_MARGIN_SECS,
        }
    }
}

impl ClipPolicy {
    /// Create a policy with the default margin.
    pub fn new(min_len: f64, max_len: f64) -> Self {
        Self {
            min_len,
            max_len,
            margin: DEFAULT_MARGIN_SECS,
        }
    }

    /// Shorter 2-12 second clips.
    pub fn short_form() -> Self {
        Self::new(2.0, 12.0)
    }

    /// Set the padding margin.
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Validate the policy.
    pub fn validate(&self) -> Result<(), PolicyError> {
        let finite = self.min_len.is_finite() && self.max_len.is_finite();
        if !finite || self.min_len <= 0.0 || self.max_len <= 0.0 {
            return Err(PolicyError::NonPositive {
                min: self.min_len,
                max: self.max_len,
            });
        }
        if self.min_len > self.max_len {
            return Err(PolicyError::MinExceedsMax {
                min: self.min_len,
                max: self.max_len,
            });
        }
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(PolicyError::NegativeMargin(self.margin));
        }
        Ok(())
    }
}
