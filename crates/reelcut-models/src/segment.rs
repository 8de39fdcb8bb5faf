//! Transcript segments and scene boundaries.
//!
//! Both are produced by external collaborators (speech-to-text and scene
//! detection) and are immutable once handed to the pipeline.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One transcribed utterance with its time range in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TranscriptSegment {
    /// Utterance text
    pub text: String,
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
}

impl TranscriptSegment {
    /// Create a new segment.
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }

    /// Whether the segment satisfies `0 <= start < end` with finite values.
    pub fn is_valid(&self) -> bool {
        self.start.is_finite() && self.end.is_finite() && self.start >= 0.0 && self.end > self.start
    }

    /// Segment duration in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Strictly increasing scene-change timestamps for one source video.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct SceneBoundaries(Vec<f64>);

impl SceneBoundaries {
    /// Build from arbitrary timestamps.
    ///
    /// Non-finite and negative values are dropped; the rest are sorted and
    /// deduplicated so the strictly-increasing invariant always holds.
    pub fn new(mut timestamps: Vec<f64>) -> Self {
        timestamps.retain(|t| t.is_finite() && *t >= 0.0);
        timestamps.sort_by(|a, b| a.total_cmp(b));
        timestamps.dedup();
        Self(timestamps)
    }

    /// No detected scene changes.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Latest boundary at or before `t`.
    pub fn at_or_before(&self, t: f64) -> Option<f64> {
        let idx = self.0.partition_point(|b| *b <= t);
        idx.checked_sub(1).map(|i| self.0[i])
    }

    /// Earliest boundary at or after `t`.
    pub fn at_or_after(&self, t: f64) -> Option<f64> {
        let idx = self.0.partition_point(|b| *b < t);
        self.0.get(idx).copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<f64>> for SceneBoundaries {
    fn from(timestamps: Vec<f64>) -> Self {
        Self::new(timestamps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_boundaries_normalized() {
        let scenes = SceneBoundaries::new(vec![15.0, 9.0, f64::NAN, 9.0, -1.0, 3.5]);
        assert_eq!(scenes.as_slice(), &[3.5, 9.0, 15.0]);
    }

    #[test]
    fn test_boundary_lookup() {
        let scenes = SceneBoundaries::new(vec![9.0, 15.0]);
        assert_eq!(scenes.at_or_before(9.5), Some(9.0));
        assert_eq!(scenes.at_or_before(9.0), Some(9.0));
        assert_eq!(scenes.at_or_before(8.9), None);
        assert_eq!(scenes.at_or_after(14.5), Some(15.0));
        assert_eq!(scenes.at_or_after(15.0), Some(15.0));
        assert_eq!(scenes.at_or_after(15.1), None);
    }

    #[test]
    fn test_segment_validity() {
        assert!(TranscriptSegment::new("hi", 10.0, 10.8).is_valid());
        assert!(!TranscriptSegment::new("hi", 10.0, 10.0).is_valid());
        assert!(!TranscriptSegment::new("hi", -1.0, 2.0).is_valid());
        assert!(!TranscriptSegment::new("hi", 0.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn test_segment_deserializes_from_transcriber_json() {
        let json = r#"[{"text":"hello","start":1.5,"end":3.25}]"#;
        let segments: Vec<TranscriptSegment> = serde_json::from_str(json).unwrap();
        assert_eq!(segments[0], TranscriptSegment::new("hello", 1.5, 3.25));
    }
}
