//! In-place clip remediation: full-frame blur and marker overlay.
//!
//! Both operations render to a sibling temp file and then replace the
//! original, so a failed render never leaves a half-written clip behind.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use reelcut_models::{EncodingConfig, MarkerSymbol};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::fs_utils::{move_file, remove_if_exists};

/// Default directory holding `<symbol>.png` marker assets.
pub const DEFAULT_ASSETS_DIR: &str = "assets/markers";

/// Blur strength for full-frame remediation (boxblur radius:power).
const BLUR_FILTER: &str = "boxblur=20:3";

/// Marker overlay configuration.
#[derive(Debug, Clone)]
pub struct MarkerConfig {
    /// Directory containing `high-risk-symbol.png` / `coverage-symbol.png`
    pub assets_dir: PathBuf,
    /// Opacity (0.0 to 1.0)
    pub opacity: f32,
    /// Offset from the bottom-right edge for corner markers (pixels)
    pub offset: u32,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from(DEFAULT_ASSETS_DIR),
            opacity: 0.85,
            offset: 20,
        }
    }
}

impl MarkerConfig {
    pub fn with_assets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.assets_dir = dir.into();
        self
    }

    /// Set marker opacity (0.0 = invisible, 1.0 = fully opaque).
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// Path of the PNG asset for `symbol`, if it exists.
    pub fn asset_for(&self, symbol: MarkerSymbol) -> Option<PathBuf> {
        let path = self.assets_dir.join(format!("{}.png", symbol.as_str()));
        path.exists().then_some(path)
    }
}

fn escape_filter_path(path: &str) -> String {
    path.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace(':', "\\:")
}

/// Overlay position: high-risk markers sit in the corner, coverage markers
/// are centered over the frame.
fn marker_position(symbol: MarkerSymbol, offset: u32) -> String {
    match symbol {
        MarkerSymbol::HighRiskSymbol => format!("W-w-{}:H-h-{}", offset, offset),
        MarkerSymbol::CoverageSymbol => "(W-w)/2:(H-h)/2".to_string(),
    }
}

/// Build the single-input filter graph that draws `symbol` on the video.
///
/// Uses the `movie` source filter when an asset exists, otherwise draws a
/// plain box so remediation still produces a visible marker.
pub(crate) fn build_marker_filter(
    symbol: MarkerSymbol,
    asset: Option<&Path>,
    config: &MarkerConfig,
) -> String {
    let position = marker_position(symbol, config.offset);

    match asset {
        Some(path) => {
            let escaped = escape_filter_path(&path.to_string_lossy());
            if config.opacity < 1.0 {
                format!(
                    "movie='{}',format=rgba,colorchannelmixer=aa={:.2}[mk];[in][mk]overlay={}:format=auto[out]",
                    escaped, config.opacity, position
                )
            } else {
                format!(
                    "movie='{}'[mk];[in][mk]overlay={}:format=auto[out]",
                    escaped, position
                )
            }
        }
        None => match symbol {
            MarkerSymbol::HighRiskSymbol => format!(
                "drawbox=x=iw-iw/8-{o}:y=ih-iw/8-{o}:w=iw/8:h=iw/8:color=red@{a:.2}:t=fill",
                o = config.offset,
                a = config.opacity
            ),
            MarkerSymbol::CoverageSymbol => format!(
                "drawbox=x=iw/4:y=ih/4:w=iw/2:h=ih/2:color=white@{:.2}:t=fill",
                config.opacity
            ),
        },
    }
}

fn temp_path(video: &Path, tag: &str) -> PathBuf {
    video.with_extension(format!("{}.mp4", tag))
}

/// Render `video` through `filter` into a temp file, then replace `video`.
async fn render_in_place(
    runner: &FfmpegRunner,
    video: &Path,
    filter: String,
    tag: &str,
    encoding: &EncodingConfig,
) -> MediaResult<()> {
    if !video.exists() {
        return Err(MediaError::FileNotFound(video.to_path_buf()));
    }

    let temp_output = temp_path(video, tag);
    let cmd = FfmpegCommand::new(video, &temp_output)
        .video_filter(filter)
        .output_args([
            "-c:v",
            encoding.codec.as_str(),
            "-preset",
            encoding.preset.as_str(),
            "-crf",
        ])
        .output_arg(encoding.crf.to_string())
        .output_args(["-c:a", "copy"])
        .faststart();

    if let Err(e) = runner.run(&cmd).await {
        let _ = remove_if_exists(&temp_output).await;
        return Err(e);
    }

    move_file(&temp_output, video).await
}

/// Blur every frame of `video`, replacing the file.
pub async fn blur_in_place(
    runner: &FfmpegRunner,
    video: &Path,
    encoding: &EncodingConfig,
) -> MediaResult<()> {
    info!(video = %video.display(), "Applying full-frame blur");
    render_in_place(runner, video, BLUR_FILTER.to_string(), "blurred", encoding).await
}

/// Draw the marker for `symbol` on `video`, replacing the file.
pub async fn overlay_in_place(
    runner: &FfmpegRunner,
    video: &Path,
    symbol: MarkerSymbol,
    config: &MarkerConfig,
    encoding: &EncodingConfig,
) -> MediaResult<()> {
    let asset = config.asset_for(symbol);
    if asset.is_none() {
        debug!(
            symbol = symbol.as_str(),
            assets_dir = %config.assets_dir.display(),
            "Marker asset missing, drawing fallback box"
        );
    }

    let filter = build_marker_filter(symbol, asset.as_deref(), config);
    info!(video = %video.display(), symbol = symbol.as_str(), "Applying marker overlay");
    render_in_place(runner, video, filter, "marked", encoding).await
}
