//! Best-effort operator notifications.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::ClientResult;

/// Sends a human-readable message somewhere an operator will see it.
///
/// `send` never fails: delivery problems are logged and swallowed.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str);
}

/// Notifier that only writes to the log.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, text: &str) {
        info!(notification = %text, "Notification");
    }
}

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// API base, without the `/bot<token>` suffix
    pub api_base: String,
    pub bot_token: String,
    pub chat_id: String,
    pub timeout: Duration,
}

impl TelegramConfig {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            api_base: "https://api.telegram.org".to_string(),
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_base.trim_end_matches('/'),
            self.bot_token
        )
    }
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Telegram bot `sendMessage` notifier.
pub struct TelegramNotifier {
    http: Client,
    config: TelegramConfig,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig) -> ClientResult<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) {
        let body = SendMessage {
            chat_id: &self.config.chat_id,
            text,
        };

        match self
            .http
            .post(self.config.send_message_url())
            .json(&body)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {}
            Ok(response) => {
                warn!(status = %response.status(), "Telegram notification rejected");
            }
            Err(e) => {
                warn!(error = %e, "Telegram notification failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_telegram_posts_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTOKEN/sendMessage"))
            .and(body_json(serde_json::json!({"chat_id": "42", "text": "clip rejected"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let notifier =
            TelegramNotifier::new(TelegramConfig::new("TOKEN", "42").with_api_base(server.uri()))
                .unwrap();
        notifier.send("clip rejected").await;
    }

    #[tokio::test]
    async fn test_telegram_failure_is_swallowed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let notifier =
            TelegramNotifier::new(TelegramConfig::new("TOKEN", "42").with_api_base(server.uri()))
                .unwrap();
        notifier.send("anything").await;
    }

    #[tokio::test]
    async fn test_telegram_unreachable_is_swallowed() {
        let config = TelegramConfig::new("TOKEN", "42")
            .with_api_base("http://127.0.0.1:9")
            .with_timeout(Duration::from_millis(200));
        TelegramNotifier::new(config).unwrap().send("anything").await;
    }

    #[tokio::test]
    async fn test_log_notifier() {
        LogNotifier.send("hello").await;
    }
}
