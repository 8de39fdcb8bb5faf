//! Media collaborator traits and their FFmpeg implementation.
//!
//! The pipeline is written against these traits so tests can substitute
//! in-memory fakes for the external binaries.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use reelcut_models::{ClipInterval, EncodingConfig, MarkerSymbol, SceneBoundaries};

use crate::clip::{cut_clip, extract_frame_png};
use crate::command::FfmpegRunner;
use crate::concat::concat_clips;
use crate::error::MediaResult;
use crate::probe::get_duration;
use crate::remediation::{blur_in_place, overlay_in_place, MarkerConfig};
use crate::scene::{detect_scene_changes, DEFAULT_SCENE_THRESHOLD};

/// Reports the duration of a video.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn duration(&self, video: &Path) -> MediaResult<f64>;
}

/// Finds scene-change timestamps.
#[async_trait]
pub trait SceneDetector: Send + Sync {
    async fn detect(&self, video: &Path) -> MediaResult<SceneBoundaries>;
}

/// Renders one interval of a video into its own file.
#[async_trait]
pub trait Cutter: Send + Sync {
    async fn cut(&self, source: &Path, interval: &ClipInterval, dest: &Path) -> MediaResult<()>;
}

/// Samples a still frame for classification.
#[async_trait]
pub trait FrameSampler: Send + Sync {
    async fn frame_png(&self, video: &Path, at_secs: f64) -> MediaResult<Vec<u8>>;
}

/// Modifies a clip file in place.
#[async_trait]
pub trait Remediator: Send + Sync {
    async fn blur(&self, clip: &Path) -> MediaResult<()>;
    async fn overlay(&self, clip: &Path, symbol: MarkerSymbol) -> MediaResult<()>;
}

/// Joins clips into a single file.
#[async_trait]
pub trait Combiner: Send + Sync {
    async fn concat(&self, clips: &[PathBuf], dest: &Path) -> MediaResult<()>;
}

/// FFmpeg-backed implementation of every media trait.
#[derive(Debug, Clone)]
pub struct FfmpegTool {
    runner: FfmpegRunner,
    encoding: EncodingConfig,
    markers: MarkerConfig,
    scene_threshold: f64,
}

impl Default for FfmpegTool {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegTool {
    pub fn new() -> Self {
        Self {
            runner: FfmpegRunner::new(),
            encoding: EncodingConfig::default(),
            markers: MarkerConfig::default(),
            scene_threshold: DEFAULT_SCENE_THRESHOLD,
        }
    }

    pub fn with_runner(mut self, runner: FfmpegRunner) -> Self {
        self.runner = runner;
        self
    }

    pub fn with_encoding(mut self, encoding: EncodingConfig) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_markers(mut self, markers: MarkerConfig) -> Self {
        self.markers = markers;
        self
    }

    pub fn with_scene_threshold(mut self, threshold: f64) -> Self {
        self.scene_threshold = threshold;
        self
    }

    pub fn runner(&self) -> &FfmpegRunner {
        &self.runner
    }
}

#[async_trait]
impl Prober for FfmpegTool {
    async fn duration(&self, video: &Path) -> MediaResult<f64> {
        get_duration(video).await
    }
}

#[async_trait]
impl SceneDetector for FfmpegTool {
    async fn detect(&self, video: &Path) -> MediaResult<SceneBoundaries> {
        detect_scene_changes(&self.runner, video, self.scene_threshold).await
    }
}

#[async_trait]
impl Cutter for FfmpegTool {
    async fn cut(&self, source: &Path, interval: &ClipInterval, dest: &Path) -> MediaResult<()> {
        cut_clip(&self.runner, source, interval, dest, &self.encoding).await
    }
}

#[async_trait]
impl FrameSampler for FfmpegTool {
    async fn frame_png(&self, video: &Path, at_secs: f64) -> MediaResult<Vec<u8>> {
        extract_frame_png(&self.runner, video, at_secs).await
    }
}

#[async_trait]
impl Remediator for FfmpegTool {
    async fn blur(&self, clip: &Path) -> MediaResult<()> {
        blur_in_place(&self.runner, clip, &self.encoding).await
    }

    async fn overlay(&self, clip: &Path, symbol: MarkerSymbol) -> MediaResult<()> {
        overlay_in_place(&self.runner, clip, symbol, &self.markers, &self.encoding).await
    }
}

#[async_trait]
impl Combiner for FfmpegTool {
    async fn concat(&self, clips: &[PathBuf], dest: &Path) -> MediaResult<()> {
        concat_clips(&self.runner, clips, dest).await
    }
}
