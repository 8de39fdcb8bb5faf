//! Google Cloud Vision SafeSearch classifier.

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use reelcut_models::{Likelihood, SafetyAnnotation};

use crate::classifier::SafetyClassifier;
use crate::error::{ClientError, ClientResult};

/// Default Vision API endpoint.
pub const DEFAULT_VISION_URL: &str = "https://vision.googleapis.com/v1/images:annotate";

const MAX_LABELS: u32 = 20;

/// Configuration for the Vision client.
#[derive(Debug, Clone)]
pub struct VisionConfig {
    /// Full `images:annotate` URL
    pub url: String,
    /// API key
    pub api_key: String,
    /// Request timeout
    pub timeout: Duration,
}

impl VisionConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            url: DEFAULT_VISION_URL.to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Serialize)]
struct AnnotateRequest<'a> {
    requests: [ImageRequest<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    image: ImageContent,
    features: [Feature<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Feature<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_results: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<ImageResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageResponse {
    safe_search_annotation: Option<SafeSearch>,
    #[serde(default)]
    label_annotations: Vec<Label>,
    error: Option<ApiStatus>,
}

#[derive(Debug, Deserialize)]
struct SafeSearch {
    #[serde(default)]
    adult: String,
    #[serde(default)]
    violence: String,
    #[serde(default)]
    racy: String,
}

#[derive(Debug, Deserialize)]
struct Label {
    description: String,
}

#[derive(Debug, Deserialize)]
struct ApiStatus {
    #[serde(default)]
    message: String,
}

/// Classifier backed by the Vision `images:annotate` endpoint.
pub struct RemoteClassifier {
    http: Client,
    config: VisionConfig,
}

impl RemoteClassifier {
    pub fn new(config: VisionConfig) -> ClientResult<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }
}

impl ImageResponse {
    fn into_annotation(self) -> ClientResult<SafetyAnnotation> {
        if let Some(err) = self.error {
            return Err(ClientError::request_failed(format!(
                "Vision API error: {}",
                err.message
            )));
        }
        let safe = self
            .safe_search_annotation
            .ok_or_else(|| ClientError::invalid_response("missing safeSearchAnnotation"))?;

        Ok(SafetyAnnotation::new(
            Likelihood::from_api_name(&safe.adult),
            Likelihood::from_api_name(&safe.violence),
            Likelihood::from_api_name(&safe.racy),
        )
        .with_labels(self.label_annotations.into_iter().map(|l| l.description)))
    }
}

#[async_trait]
impl SafetyClassifier for RemoteClassifier {
    fn name(&self) -> &'static str {
        "vision"
    }

    async fn classify(&self, frame_png: &[u8]) -> ClientResult<SafetyAnnotation> {
        let body = AnnotateRequest {
            requests: [ImageRequest {
                image: ImageContent {
                    content: base64::engine::general_purpose::STANDARD.encode(frame_png),
                },
                features: [
                    Feature {
                        kind: "SAFE_SEARCH_DETECTION",
                        max_results: None,
                    },
                    Feature {
                        kind: "LABEL_DETECTION",
                        max_results: Some(MAX_LABELS),
                    },
                ],
            }],
        };

        debug!(url = %self.config.url, bytes = frame_png.len(), "Sending frame to Vision API");

        let response = self
            .http
            .post(&self.config.url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::request_failed(format!(
                "Vision API returned {}: {}",
                status, body
            )));
        }

        let parsed: AnnotateResponse = response.json().await?;
        parsed
            .responses
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::invalid_response("empty responses array"))?
            .into_annotation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn classifier(server: &MockServer) -> RemoteClassifier {
        let config = VisionConfig::new("test-key")
            .with_url(format!("{}/v1/images:annotate", server.uri()));
        RemoteClassifier::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_classify_parses_safe_search_and_labels() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/images:annotate"))
            .and(query_param("key", "test-key"))
            .and(body_partial_json(serde_json::json!({
                "requests": [{"image": {"content": "iVBORw=="}}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "responses": [{
                    "safeSearchAnnotation": {
                        "adult": "POSSIBLE",
                        "violence": "VERY_UNLIKELY",
                        "racy": "UNLIKELY",
                        "spoof": "VERY_UNLIKELY"
                    },
                    "labelAnnotations": [
                        {"description": "Beach", "score": 0.9},
                        {"description": "Child", "score": 0.8}
                    ]
                }]
            })))
            .mount(&server)
            .await;

        let annotation = classifier(&server)
            .await
            .classify(&[0x89, b'P', b'N', b'G'])
            .await
            .unwrap();

        assert_eq!(annotation.adult, Likelihood::Possible);
        assert_eq!(annotation.violence, Likelihood::VeryUnlikely);
        assert_eq!(annotation.racy, Likelihood::Unlikely);
        assert_eq!(annotation.labels, vec!["Beach".to_string(), "Child".to_string()]);
    }

    #[tokio::test]
    async fn test_classify_surfaces_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "responses": [{"error": {"code": 3, "message": "Bad image data."}}]
            })))
            .mount(&server)
            .await;

        let err = classifier(&server).await.classify(b"x").await.unwrap_err();
        assert!(matches!(err, ClientError::RequestFailed(msg) if msg.contains("Bad image data")));
    }

    #[tokio::test]
    async fn test_classify_http_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let err = classifier(&server).await.classify(b"x").await.unwrap_err();
        assert!(matches!(err, ClientError::RequestFailed(_)));
    }

    #[tokio::test]
    async fn test_classify_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_millis(500))
                    .set_body_json(serde_json::json!({"responses": []})),
            )
            .mount(&server)
            .await;

        let config = VisionConfig::new("k")
            .with_url(server.uri())
            .with_timeout(Duration::from_millis(50));
        let err = RemoteClassifier::new(config)
            .unwrap()
            .classify(b"x")
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Network(e) if e.is_timeout()));
    }
}
