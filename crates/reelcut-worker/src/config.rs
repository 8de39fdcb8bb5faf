//! Pipeline configuration.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use reelcut_clients::{DEFAULT_VISION_URL, DEFAULT_WHISPER_URL};
use reelcut_media::{DEFAULT_ASSETS_DIR, DEFAULT_SCENE_THRESHOLD};
use reelcut_models::ClipPolicy;
use reelcut_queue::{EngagementWindows, DEFAULT_WINDOWS};

use crate::error::{WorkerError, WorkerResult};

/// Which safety classifier to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierKind {
    Remote,
    Heuristic,
}

impl FromStr for ClassifierKind {
    type Err = WorkerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "remote" | "vision" => Ok(Self::Remote),
            "heuristic" | "local" => Ok(Self::Heuristic),
            other => Err(WorkerError::config_error(format!(
                "unknown classifier '{}' (expected remote or heuristic)",
                other
            ))),
        }
    }
}

/// Which transcript source to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriberKind {
    Sidecar,
    Whisper,
}

impl FromStr for TranscriberKind {
    type Err = WorkerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sidecar" => Ok(Self::Sidecar),
            "whisper" => Ok(Self::Whisper),
            other => Err(WorkerError::config_error(format!(
                "unknown transcriber '{}' (expected sidecar or whisper)",
                other
            ))),
        }
    }
}

/// Optional pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlags {
    pub moderation: bool,
    pub scheduling: bool,
    pub combination: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            moderation: true,
            scheduling: true,
            combination: false,
        }
    }
}

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Input video directory
    pub raw_dir: PathBuf,
    /// Output directory for cut clips
    pub clip_dir: PathBuf,
    /// Output directory for combined reels
    pub combined_dir: PathBuf,
    /// Clip store document
    pub store_path: PathBuf,
    /// Marker overlay assets
    pub marker_dir: PathBuf,
    pub policy: ClipPolicy,
    pub features: FeatureFlags,
    pub classifier: ClassifierKind,
    pub transcriber: TranscriberKind,
    /// Publish windows, UTC
    pub windows: EngagementWindows,
    /// Bound on classifier and notifier calls
    pub external_timeout: Duration,
    pub max_concurrent_videos: usize,
    pub scene_threshold: f64,
    pub keyword_limit: usize,
    pub vision_url: String,
    pub vision_api_key: Option<String>,
    pub whisper_url: String,
    pub openai_api_key: Option<String>,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            raw_dir: PathBuf::from("Raw"),
            clip_dir: PathBuf::from("Clips"),
            combined_dir: PathBuf::from("Combined"),
            store_path: PathBuf::from("public/mags-log.json"),
            marker_dir: PathBuf::from(DEFAULT_ASSETS_DIR),
            policy: ClipPolicy::default(),
            features: FeatureFlags::default(),
            classifier: ClassifierKind::Remote,
            transcriber: TranscriberKind::Sidecar,
            windows: EngagementWindows::default(),
            external_timeout: Duration::from_secs(10),
            max_concurrent_videos: 1,
            scene_threshold: DEFAULT_SCENE_THRESHOLD,
            keyword_limit: 5,
            vision_url: DEFAULT_VISION_URL.to_string(),
            vision_api_key: None,
            whisper_url: DEFAULT_WHISPER_URL.to_string(),
            openai_api_key: None,
            telegram_bot_token: None,
            telegram_chat_id: None,
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> WorkerResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from any key lookup; unset keys take defaults, set but
    /// invalid keys are errors.
    pub fn from_lookup<F>(lookup: F) -> WorkerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let policy = ClipPolicy {
            min_len: parse_or(&get, "REELCUT_MIN_CLIP_SECS", defaults.policy.min_len)?,
            max_len: parse_or(&get, "REELCUT_MAX_CLIP_SECS", defaults.policy.max_len)?,
            margin: parse_or(&get, "REELCUT_MARGIN_SECS", defaults.policy.margin)?,
        };

        let features = FeatureFlags {
            moderation: flag_or(&get, "REELCUT_ENABLE_MODERATION", defaults.features.moderation)?,
            scheduling: flag_or(&get, "REELCUT_ENABLE_SCHEDULING", defaults.features.scheduling)?,
            combination: flag_or(
                &get,
                "REELCUT_ENABLE_COMBINATION",
                defaults.features.combination,
            )?,
        };

        let windows = EngagementWindows::parse(
            get("REELCUT_SCHEDULE_WINDOWS")
                .as_deref()
                .unwrap_or(DEFAULT_WINDOWS),
        )?;

        let config = Self {
            raw_dir: get("REELCUT_RAW_DIR").map(PathBuf::from).unwrap_or(defaults.raw_dir),
            clip_dir: get("REELCUT_CLIP_DIR").map(PathBuf::from).unwrap_or(defaults.clip_dir),
            combined_dir: get("REELCUT_COMBINED_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.combined_dir),
            store_path: get("REELCUT_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.store_path),
            marker_dir: get("REELCUT_MARKER_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.marker_dir),
            policy,
            features,
            classifier: parse_or(&get, "REELCUT_CLASSIFIER", defaults.classifier)?,
            transcriber: parse_or(&get, "REELCUT_TRANSCRIBER", defaults.transcriber)?,
            windows,
            external_timeout: Duration::from_secs(parse_or(
                &get,
                "REELCUT_EXTERNAL_TIMEOUT_SECS",
                defaults.external_timeout.as_secs(),
            )?),
            max_concurrent_videos: parse_or(
                &get,
                "REELCUT_MAX_CONCURRENT_VIDEOS",
                defaults.max_concurrent_videos,
            )?,
            scene_threshold: parse_or(&get, "REELCUT_SCENE_THRESHOLD", defaults.scene_threshold)?,
            keyword_limit: parse_or(&get, "REELCUT_KEYWORD_LIMIT", defaults.keyword_limit)?,
            vision_url: get("VISION_API_URL").unwrap_or(defaults.vision_url),
            vision_api_key: get("VISION_API_KEY"),
            whisper_url: get("WHISPER_API_URL").unwrap_or(defaults.whisper_url),
            openai_api_key: get("OPENAI_API_KEY"),
            telegram_bot_token: get("TELEGRAM_BOT_TOKEN"),
            telegram_chat_id: get("TELEGRAM_CHAT_ID"),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> WorkerResult<()> {
        self.policy.validate()?;
        if self.max_concurrent_videos == 0 {
            return Err(WorkerError::config_error(
                "REELCUT_MAX_CONCURRENT_VIDEOS must be at least 1",
            ));
        }
        if self.external_timeout.is_zero() {
            return Err(WorkerError::config_error(
                "REELCUT_EXTERNAL_TIMEOUT_SECS must be at least 1",
            ));
        }
        if !(self.scene_threshold > 0.0 && self.scene_threshold < 1.0) {
            return Err(WorkerError::config_error(format!(
                "REELCUT_SCENE_THRESHOLD must be in (0, 1), got {}",
                self.scene_threshold
            )));
        }
        if self.keyword_limit == 0 {
            return Err(WorkerError::config_error(
                "REELCUT_KEYWORD_LIMIT must be at least 1",
            ));
        }
        Ok(())
    }

    /// Whether a Telegram notifier can be built.
    pub fn has_telegram(&self) -> bool {
        self.telegram_bot_token.is_some() && self.telegram_chat_id.is_some()
    }
}

fn parse_or<G, T>(get: &G, key: &str, default: T) -> WorkerResult<T>
where
    G: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| WorkerError::config_error(format!("invalid value for {}: '{}'", key, raw))),
    }
}

fn flag_or<G>(get: &G, key: &str, default: bool) -> WorkerResult<bool>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key).map(|v| v.to_lowercase()) {
        None => Ok(default),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(WorkerError::config_error(format!(
                "invalid value for {}: '{}'",
                key, v
            ))),
        },
    }
}
