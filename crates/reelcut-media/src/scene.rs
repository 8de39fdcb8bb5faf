//! Scene-change detection from FFmpeg's scene score.

use std::path::Path;
use tracing::debug;

use reelcut_models::SceneBoundaries;

use crate::command::{FfmpegCommand, FfmpegRunner, STDOUT};
use crate::error::{MediaError, MediaResult};

/// Scene score above which a frame counts as a cut.
pub const DEFAULT_SCENE_THRESHOLD: f64 = 0.4;

/// Detect scene-change timestamps in `video`.
///
/// Runs `select='gt(scene,T)',showinfo` and reads `pts_time` from the
/// showinfo lines FFmpeg prints to stderr. A video with no cuts yields
/// empty boundaries.
pub async fn detect_scene_changes(
    runner: &FfmpegRunner,
    video: &Path,
    threshold: f64,
) -> MediaResult<SceneBoundaries> {
    if !video.exists() {
        return Err(MediaError::FileNotFound(video.to_path_buf()));
    }
    if !(threshold > 0.0 && threshold < 1.0) {
        return Err(MediaError::invalid_input(format!(
            "scene threshold must be in (0, 1), got {}",
            threshold
        )));
    }

    let cmd = FfmpegCommand::new(video, STDOUT)
        .log_level("info")
        .video_filter(format!("select='gt(scene,{})',showinfo", threshold))
        .output_arg("-an")
        .format("null");

    let output = runner.output(&cmd).await?;
    let boundaries = parse_showinfo(&output.stderr);
    debug!(
        video = %video.display(),
        count = boundaries.len(),
        "Detected scene changes"
    );
    Ok(boundaries)
}

/// Extract every `pts_time:<secs>` value from showinfo output.
pub(crate) fn parse_showinfo(stderr: &str) -> SceneBoundaries {
    let times: Vec<f64> = stderr
        .lines()
        .filter(|line| line.contains("Parsed_showinfo"))
        .filter_map(|line| {
            let rest = line.split("pts_time:").nth(1)?;
            rest.split_whitespace().next()?.parse::<f64>().ok()
        })
        .collect();
    SceneBoundaries::new(times)
}
