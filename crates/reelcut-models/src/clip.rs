//! Persisted clip records.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

use crate::{ClipInterval, SafetyRecord};

/// Emotional tone assigned to a clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    #[default]
    Funny,
    Emotional,
    Inspiring,
}

impl Emotion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Funny => "funny",
            Emotion::Emotional => "emotional",
            Emotion::Inspiring => "inspiring",
        }
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An accepted clip, owned by the clip store once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClipRecord {
    /// Stable id derived from source name + interval
    pub id: String,

    /// Source video file name
    pub source_video: String,

    /// Path of the rendered clip file
    pub path: String,

    /// Time range inside the source video
    pub interval: ClipInterval,

    /// Transcript text the clip was cut around
    #[serde(default)]
    pub transcript: String,

    /// Keywords in relevance order
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Emotional tone
    #[serde(default)]
    pub emotion: Emotion,

    /// Moderation outcome (absent when moderation is disabled)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety: Option<SafetyRecord>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Publish slot, attached by the schedule queue
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl ClipRecord {
    /// Create a record for a clip of `source_video` covering `interval`.
    pub fn new(
        source_video: impl Into<String>,
        interval: ClipInterval,
        path: impl Into<String>,
    ) -> Self {
        let source_video = source_video.into();
        Self {
            id: derive_clip_id(&source_video, &interval),
            source_video,
            path: path.into(),
            interval,
            transcript: String::new(),
            keywords: Vec::new(),
            emotion: Emotion::default(),
            safety: None,
            created_at: Utc::now(),
            scheduled_at: None,
        }
    }

    pub fn with_transcript(mut self, transcript: impl Into<String>) -> Self {
        self.transcript = transcript.into();
        self
    }

    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn with_emotion(mut self, emotion: Emotion) -> Self {
        self.emotion = emotion;
        self
    }

    pub fn with_safety(mut self, safety: SafetyRecord) -> Self {
        self.safety = Some(safety);
        self
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled_at.is_some()
    }
}

/// Derive the stable clip id for a source video and interval.
///
/// Bounds are rounded to milliseconds so logically-equivalent re-runs map to
/// the same id.
pub fn derive_clip_id(source_video: &str, interval: &ClipInterval) -> String {
    let key = format!(
        "{}:{}:{}",
        source_video.trim(),
        interval.start_ms(),
        interval.end_ms()
    );
    let digest = Sha256::digest(key.as_bytes());
    format!("{:x}", digest).chars().take(16).collect()
}

/// Short digest of a source file name.
///
/// Sanitizing drops extensions, punctuation and non-ASCII letters, so the
/// readable stem alone cannot tell `a.mp4` from `a.mov` or `日本.mp4` from
/// `видео.mp4`. The tag can.
pub fn source_tag(source_video: &str) -> String {
    let digest = Sha256::digest(file_name(source_video).as_bytes());
    format!("{:x}", digest).chars().take(8).collect()
}

/// Output filename for a clip: `{stem}_{tag}_{start_ms}_{end_ms}.mp4`.
///
/// Unique per source and interval, so parallel workers never collide.
pub fn clip_filename(source_video: &str, interval: &ClipInterval) -> String {
    format!(
        "{}_{}_{:07}_{:07}.mp4",
        readable_stem(source_video),
        source_tag(source_video),
        interval.start_ms(),
        interval.end_ms()
    )
}

/// Output filename for a video's combined reel: `{stem}_{tag}_combined.mp4`.
pub fn combined_filename(source_video: &str) -> String {
    format!(
        "{}_{}_combined.mp4",
        readable_stem(source_video),
        source_tag(source_video)
    )
}

fn file_name(source_video: &str) -> String {
    let trimmed = source_video.trim();
    Path::new(trimmed)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

fn readable_stem(source_video: &str) -> String {
    let stem = Path::new(source_video.trim())
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    match sanitize_filename_title(&stem) {
        safe if safe.is_empty() => "clip".to_string(),
        safe => safe,
    }
}

/// Sanitize a title for use in filenames.
///
/// Only allows ASCII alphanumeric, hyphen, underscore, and space.
pub fn sanitize_filename_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ' || *c == '-' || *c == '_')
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
        .chars()
        .take(50)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_id_is_stable() {
        let interval = ClipInterval::new(9.0, 15.0).unwrap();
        let a = derive_clip_id("beach.mp4", &interval);
        let b = derive_clip_id("beach.mp4", &ClipInterval::new(9.0000001, 15.0).unwrap());
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_clip_id_differs_by_source_and_interval() {
        let interval = ClipInterval::new(9.0, 15.0).unwrap();
        let other = ClipInterval::new(9.0, 16.0).unwrap();
        assert_ne!(derive_clip_id("a.mp4", &interval), derive_clip_id("b.mp4", &interval));
        assert_ne!(derive_clip_id("a.mp4", &interval), derive_clip_id("a.mp4", &other));
    }

    #[test]
    fn test_clip_filename() {
        let interval = ClipInterval::new(9.0, 15.25).unwrap();
        let name = clip_filename("Raw/Beach Day!.mp4", &interval);
        let tag = source_tag("Beach Day!.mp4");
        assert_eq!(tag.len(), 8);
        assert_eq!(name, format!("beach_day_{}_0009000_0015250.mp4", tag));
        assert!(clip_filename("ăîș.mp4", &interval).starts_with("clip_"));
    }

    #[test]
    fn test_clip_filename_unique_per_source() {
        let interval = ClipInterval::new(9.0, 15.0).unwrap();
        let sources = [
            "a.mp4",
            "a.mov",
            "a.mkv",
            "a.webm",
            "My Video!.mp4",
            "My Video.mp4",
            "日本.mp4",
            "видео.mp4",
        ];
        let names: std::collections::HashSet<String> =
            sources.iter().map(|s| clip_filename(s, &interval)).collect();
        assert_eq!(names.len(), sources.len());

        let long_a = format!("{}a.mp4", "x".repeat(60));
        let long_b = format!("{}b.mp4", "x".repeat(60));
        assert_ne!(clip_filename(&long_a, &interval), clip_filename(&long_b, &interval));
    }

    #[test]
    fn test_combined_filename_unique_per_source() {
        assert_ne!(combined_filename("a.mp4"), combined_filename("a.mov"));
        assert!(combined_filename("a.mp4").starts_with("a_"));
        assert!(combined_filename("a.mp4").ends_with("_combined.mp4"));
    }

    #[test]
    fn test_sanitize_title() {
        assert_eq!(sanitize_filename_title("Hello World!"), "hello_world");
        assert_eq!(sanitize_filename_title("Test@#$%123"), "test123");
        assert_eq!(sanitize_filename_title("Café résumé"), "caf_rsum");
    }

    #[test]
    fn test_record_roundtrip_omits_empty_optionals() {
        let record = ClipRecord::new("beach.mp4", ClipInterval::new(1.0, 6.0).unwrap(), "Clips/x.mp4")
            .with_keywords(vec!["sand".into()])
            .with_emotion(Emotion::Inspiring);
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("safety").is_none());
        assert!(json.get("scheduled_at").is_none());
        assert_eq!(json["emotion"], "inspiring");

        let back: ClipRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
