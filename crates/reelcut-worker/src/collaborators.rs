//! Constructor-injected collaborators.
//!
//! The driver never reaches for a global client: every external capability
//! is built once here from [`PipelineConfig`] and passed in.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use reelcut_clients::{
    HeuristicClassifier, LogNotifier, Notifier, RemoteClassifier, SafetyClassifier,
    SidecarTranscriber, TelegramConfig, TelegramNotifier, Transcriber, VisionConfig,
    WhisperConfig, WhisperTranscriber,
};
use reelcut_media::{
    Combiner, Cutter, FfmpegTool, FrameSampler, MarkerConfig, Prober, Remediator, SceneDetector,
};

use crate::config::{ClassifierKind, PipelineConfig, TranscriberKind};
use crate::error::{WorkerError, WorkerResult};
use crate::metrics;

#[derive(Clone)]
pub struct Collaborators {
    pub prober: Arc<dyn Prober>,
    pub scenes: Arc<dyn SceneDetector>,
    pub cutter: Arc<dyn Cutter>,
    pub frames: Arc<dyn FrameSampler>,
    pub remediator: Arc<dyn Remediator>,
    pub combiner: Arc<dyn Combiner>,
    pub transcriber: Arc<dyn Transcriber>,
    pub classifier: Arc<dyn SafetyClassifier>,
    pub notifier: Arc<dyn Notifier>,
}

impl Collaborators {
    /// Wire every media capability to one tool and add the remaining clients.
    pub fn with_media<M>(
        media: Arc<M>,
        transcriber: Arc<dyn Transcriber>,
        classifier: Arc<dyn SafetyClassifier>,
        notifier: Arc<dyn Notifier>,
    ) -> Self
    where
        M: Prober + SceneDetector + Cutter + FrameSampler + Remediator + Combiner + 'static,
    {
        Self {
            prober: media.clone(),
            scenes: media.clone(),
            cutter: media.clone(),
            frames: media.clone(),
            remediator: media.clone(),
            combiner: media,
            transcriber,
            classifier,
            notifier,
        }
    }

    /// Build the production collaborators.
    pub fn from_config(config: &PipelineConfig) -> WorkerResult<Self> {
        let markers = MarkerConfig::default().with_assets_dir(config.marker_dir.clone());
        let tool = FfmpegTool::new()
            .with_markers(markers)
            .with_scene_threshold(config.scene_threshold);
        let runner = tool.runner().clone();

        let transcriber: Arc<dyn Transcriber> = match config.transcriber {
            TranscriberKind::Sidecar => Arc::new(SidecarTranscriber::new()),
            TranscriberKind::Whisper => {
                let key = config.openai_api_key.clone().ok_or_else(|| {
                    WorkerError::config_error("OPENAI_API_KEY is required for the whisper transcriber")
                })?;
                let whisper = WhisperConfig::new(key).with_url(config.whisper_url.clone());
                Arc::new(WhisperTranscriber::new(whisper, runner)?)
            }
        };

        let classifier: Arc<dyn SafetyClassifier> = match (config.classifier, &config.vision_api_key) {
            (ClassifierKind::Remote, Some(key)) => {
                let vision = VisionConfig::new(key.clone())
                    .with_url(config.vision_url.clone())
                    .with_timeout(config.external_timeout);
                Arc::new(RemoteClassifier::new(vision)?)
            }
            (ClassifierKind::Remote, None) => {
                warn!("VISION_API_KEY not set, using the heuristic classifier");
                Arc::new(HeuristicClassifier::new())
            }
            (ClassifierKind::Heuristic, _) => Arc::new(HeuristicClassifier::new()),
        };

        let notifier: Arc<dyn Notifier> =
            match (&config.telegram_bot_token, &config.telegram_chat_id) {
                (Some(token), Some(chat)) => {
                    let telegram = TelegramConfig::new(token.clone(), chat.clone())
                        .with_timeout(config.external_timeout);
                    Arc::new(TelegramNotifier::new(telegram)?)
                }
                _ => Arc::new(LogNotifier),
            };

        info!(
            classifier = classifier.name(),
            transcriber = ?config.transcriber,
            telegram = config.has_telegram(),
            "Collaborators ready"
        );

        Ok(Self::with_media(Arc::new(tool), transcriber, classifier, notifier))
    }

    /// Send a notification, giving up after `timeout`. Never fails.
    pub async fn notify(&self, text: &str, timeout: Duration) {
        metrics::record_notification();
        if tokio::time::timeout(timeout, self.notifier.send(text)).await.is_err() {
            warn!(timeout_secs = timeout.as_secs(), "Notification timed out");
        }
    }
}
