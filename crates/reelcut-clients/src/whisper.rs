//! Whisper-compatible speech-to-text client.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use reelcut_media::{extract_audio, FfmpegRunner};
use reelcut_models::TranscriptSegment;

use crate::error::{ClientError, ClientResult};
use crate::transcriber::Transcriber;

/// Default transcription endpoint.
pub const DEFAULT_WHISPER_URL: &str = "https://api.openai.com/v1/audio/transcriptions";

#[derive(Debug, Clone)]
pub struct WhisperConfig {
    pub url: String,
    pub api_key: String,
    pub model: String,
    /// Uploads are slow; this is well above the classifier timeout.
    pub timeout: Duration,
}

impl WhisperConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            url: DEFAULT_WHISPER_URL.to_string(),
            api_key: api_key.into(),
            model: "whisper-1".to_string(),
            timeout: Duration::from_secs(300),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct VerboseTranscription {
    #[serde(default)]
    segments: Vec<WhisperSegment>,
}

#[derive(Debug, Deserialize)]
struct WhisperSegment {
    start: f64,
    end: f64,
    text: String,
}

/// Transcribes by extracting mono 16 kHz audio and uploading it.
pub struct WhisperTranscriber {
    http: Client,
    config: WhisperConfig,
    runner: FfmpegRunner,
}

impl WhisperTranscriber {
    pub fn new(config: WhisperConfig, runner: FfmpegRunner) -> ClientResult<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            config,
            runner,
        })
    }

    /// Upload an already-extracted audio file.
    pub async fn transcribe_audio(&self, audio: &Path) -> ClientResult<Vec<TranscriptSegment>> {
        let bytes = tokio::fs::read(audio).await?;
        debug!(bytes = bytes.len(), url = %self.config.url, "Uploading audio for transcription");

        let part = Part::bytes(bytes)
            .file_name("audio.mp3")
            .mime_str("audio/mpeg")?;
        let form = Form::new()
            .part("file", part)
            .text("model", self.config.model.clone())
            .text("response_format", "verbose_json");

        let response = self
            .http
            .post(&self.config.url)
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::request_failed(format!(
                "Transcription service returned {}: {}",
                status, body
            )));
        }

        let parsed: VerboseTranscription = response.json().await?;
        Ok(parsed
            .segments
            .into_iter()
            .map(|s| TranscriptSegment::new(s.text.trim(), s.start, s.end))
            .collect())
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, video: &Path) -> ClientResult<Vec<TranscriptSegment>> {
        let work_dir = tempfile::tempdir()?;
        let audio = work_dir.path().join("audio.mp3");
        extract_audio(&self.runner, video, &audio).await?;

        let segments = self.transcribe_audio(&audio).await?;
        info!(video = %video.display(), segments = segments.len(), "Transcription complete");
        Ok(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn transcriber(server: &MockServer) -> WhisperTranscriber {
        let config = WhisperConfig::new("sk-test")
            .with_url(format!("{}/v1/audio/transcriptions", server.uri()));
        WhisperTranscriber::new(config, FfmpegRunner::new()).unwrap()
    }

    #[tokio::test]
    async fn test_transcribe_audio_maps_segments() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/audio/transcriptions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "text": "hi there",
                "segments": [
                    {"id": 0, "start": 10.0, "end": 10.8, "text": " hi"},
                    {"id": 1, "start": 11.0, "end": 12.5, "text": " there "}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("audio.mp3");
        tokio::fs::write(&audio, b"ID3fake").await.unwrap();

        let segments = transcriber(&server).await.transcribe_audio(&audio).await.unwrap();
        assert_eq!(
            segments,
            vec![
                TranscriptSegment::new("hi", 10.0, 10.8),
                TranscriptSegment::new("there", 11.0, 12.5),
            ]
        );
    }

    #[tokio::test]
    async fn test_transcribe_audio_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("audio.mp3");
        tokio::fs::write(&audio, b"ID3fake").await.unwrap();

        let err = transcriber(&server).await.transcribe_audio(&audio).await.unwrap_err();
        assert!(matches!(err, ClientError::RequestFailed(msg) if msg.contains("500")));
    }

    #[tokio::test]
    async fn test_transcribe_missing_video_is_input_error() {
        let server = MockServer::start().await;
        let err = transcriber(&server)
            .await
            .transcribe(Path::new("/nonexistent/video.mp4"))
            .await
            .unwrap_err();
        assert!(err.is_input_error());
    }
}
