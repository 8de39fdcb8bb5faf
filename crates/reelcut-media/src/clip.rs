//! Clip cutting plus frame and audio extraction.

use std::path::Path;
use tracing::{info, warn};

use reelcut_models::{ClipInterval, EncodingConfig};

use crate::command::{FfmpegCommand, FfmpegRunner, STDOUT};
use crate::error::{MediaError, MediaResult};

/// Cut `[start, end)` from `input` into `output`.
///
/// The segment is re-encoded so the cut lands on the exact timestamps rather
/// than the nearest keyframe. A partially written output is removed on
/// failure.
pub async fn cut_clip(
    runner: &FfmpegRunner,
    input: &Path,
    interval: &ClipInterval,
    output: &Path,
    encoding: &EncodingConfig,
) -> MediaResult<()> {
    if !input.exists() {
        return Err(MediaError::FileNotFound(input.to_path_buf()));
    }

    if let Some(parent) = output.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    info!(
        "Cutting clip: {} -> {} ({})",
        input.display(),
        output.display(),
        interval
    );

    let cmd = FfmpegCommand::new(input, output)
        .seek(interval.start)
        .duration(interval.duration())
        .output_args(encoding.to_ffmpeg_args())
        .faststart();

    if let Err(e) = runner.run(&cmd).await {
        if let Err(rm) = tokio::fs::remove_file(output).await {
            if rm.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to remove partial clip {}: {}", output.display(), rm);
            }
        }
        return Err(e);
    }

    Ok(())
}

/// Extract a single PNG frame at `at_secs` and return its bytes.
pub async fn extract_frame_png(
    runner: &FfmpegRunner,
    video: &Path,
    at_secs: f64,
) -> MediaResult<Vec<u8>> {
    if !video.exists() {
        return Err(MediaError::FileNotFound(video.to_path_buf()));
    }

    let cmd = FfmpegCommand::new(video, STDOUT)
        .seek(at_secs.max(0.0))
        .output_args(["-frames:v", "1", "-f", "image2pipe", "-vcodec", "png"]);

    let output = runner.output(&cmd).await?;
    if output.stdout.is_empty() {
        return Err(MediaError::InvalidVideo(format!(
            "No frame decoded from {} at {:.3}s",
            video.display(),
            at_secs
        )));
    }

    Ok(output.stdout)
}

/// Extract mono 16 kHz MP3 audio suitable for speech-to-text upload.
pub async fn extract_audio(runner: &FfmpegRunner, video: &Path, output: &Path) -> MediaResult<()> {
    if !video.exists() {
        return Err(MediaError::FileNotFound(video.to_path_buf()));
    }

    let cmd = FfmpegCommand::new(video, output).output_args([
        "-vn",
        "-ac",
        "1",
        "-ar",
        "16000",
        "-c:a",
        "libmp3lame",
        "-b:a",
        "64k",
    ]);

    runner.run(&cmd).await
}
