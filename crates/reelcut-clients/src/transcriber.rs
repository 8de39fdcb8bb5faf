//! Transcript sources.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

use reelcut_models::{parse_timestamp, TranscriptSegment};

use crate::error::{ClientError, ClientResult};

/// Produces timed transcript segments for a video.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, video: &Path) -> ClientResult<Vec<TranscriptSegment>>;
}

/// Reads transcripts that were produced ahead of time and stored next to
/// the video as `<stem>.segments.json` or `<stem>.srt`.
#[derive(Debug, Clone, Default)]
pub struct SidecarTranscriber;

impl SidecarTranscriber {
    pub fn new() -> Self {
        Self
    }

    pub fn json_path(video: &Path) -> PathBuf {
        video.with_extension("segments.json")
    }

    pub fn srt_path(video: &Path) -> PathBuf {
        video.with_extension("srt")
    }
}

#[async_trait]
impl Transcriber for SidecarTranscriber {
    async fn transcribe(&self, video: &Path) -> ClientResult<Vec<TranscriptSegment>> {
        let json_path = Self::json_path(video);
        if json_path.exists() {
            debug!(path = %json_path.display(), "Reading JSON transcript");
            let bytes = tokio::fs::read(&json_path).await?;
            let segments: Vec<TranscriptSegment> = serde_json::from_slice(&bytes)
                .map_err(|e| ClientError::InvalidTranscript(format!("{}: {}", json_path.display(), e)))?;
            return Ok(segments);
        }

        let srt_path = Self::srt_path(video);
        if srt_path.exists() {
            debug!(path = %srt_path.display(), "Reading SRT transcript");
            let text = tokio::fs::read_to_string(&srt_path).await?;
            return parse_srt(&text);
        }

        Err(ClientError::TranscriptNotFound(video.display().to_string()))
    }
}

/// Parse SubRip text into segments.
///
/// Cue numbers are optional. Multi-line cue text is joined with spaces.
pub fn parse_srt(text: &str) -> ClientResult<Vec<TranscriptSegment>> {
    let normalized = text.replace("\r\n", "\n");
    let mut segments = Vec::new();

    for block in normalized.split("\n\n") {
        let mut lines = block.lines().map(str::trim).filter(|l| !l.is_empty());
        let Some(mut first) = lines.next() else {
            continue;
        };
        if !first.contains("-->") {
            first = lines
                .next()
                .ok_or_else(|| ClientError::InvalidTranscript(format!("cue without timing: {}", first)))?;
        }

        let (start, end) = first
            .split_once("-->")
            .ok_or_else(|| ClientError::InvalidTranscript(format!("bad timing line: {}", first)))?;
        let start = parse_timestamp(start)
            .map_err(|e| ClientError::InvalidTranscript(e.to_string()))?;
        let end = parse_timestamp(end.split_whitespace().next().unwrap_or_default())
            .map_err(|e| ClientError::InvalidTranscript(e.to_string()))?;

        let text = lines.collect::<Vec<_>>().join(" ");
        segments.push(TranscriptSegment::new(text, start, end));
    }

    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRT: &str = "1\r\n00:00:10,000 --> 00:00:10,800\r\nhi\r\n\r\n2\r\n00:00:12,500 --> 00:00:15,000\r\nthis is so\r\nfunny\r\n";

    #[test]
    fn test_parse_srt() {
        let segments = parse_srt(SRT).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "hi");
        assert!((segments[0].start - 10.0).abs() < 1e-9);
        assert!((segments[0].end - 10.8).abs() < 1e-9);
        assert_eq!(segments[1].text, "this is so funny");
    }

    #[test]
    fn test_parse_srt_bad_timing() {
        assert!(matches!(
            parse_srt("1\nnot a timing\ntext\n"),
            Err(ClientError::InvalidTranscript(_))
        ));
    }

    #[tokio::test]
    async fn test_sidecar_prefers_json() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("beach.mp4");
        tokio::fs::write(
            dir.path().join("beach.segments.json"),
            br#"[{"text": "hello", "start": 1.0, "end": 2.0}]"#,
        )
        .await
        .unwrap();
        tokio::fs::write(dir.path().join("beach.srt"), SRT).await.unwrap();

        let segments = SidecarTranscriber::new().transcribe(&video).await.unwrap();
        assert_eq!(segments, vec![TranscriptSegment::new("hello", 1.0, 2.0)]);
    }

    #[tokio::test]
    async fn test_sidecar_falls_back_to_srt() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("beach.mp4");
        tokio::fs::write(dir.path().join("beach.srt"), SRT).await.unwrap();

        let segments = SidecarTranscriber::new().transcribe(&video).await.unwrap();
        assert_eq!(segments.len(), 2);
    }

    #[tokio::test]
    async fn test_sidecar_missing_is_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SidecarTranscriber::new()
            .transcribe(&dir.path().join("none.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::TranscriptNotFound(_)));
        assert!(err.is_input_error());
    }
}
