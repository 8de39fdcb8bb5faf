//! Source video probing.
//!
//! The pipeline only needs to know how long a video is and that it really
//! is a video; everything else about the streams is left to FFmpeg.

use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::error::{MediaError, MediaResult};

/// What ffprobe reports about a source file.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaInfo {
    /// Container duration in seconds, always finite and positive
    pub duration: f64,
    pub has_audio: bool,
}

#[derive(Debug, Deserialize)]
struct ProbeJson {
    #[serde(default)]
    format: Option<ProbeFormat>,
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
}

/// Run ffprobe on `path`.
///
/// Missing files, files without a video stream and files without a usable
/// duration are input errors.
pub async fn probe_media(path: impl AsRef<Path>) -> MediaResult<MediaInfo> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(MediaError::FileNotFound(path.to_path_buf()));
    }
    which::which("ffprobe").map_err(|_| MediaError::FfprobeNotFound)?;

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration:stream=codec_type",
            "-of",
            "json",
        ])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Err(MediaError::FfprobeFailed {
            message: format!("ffprobe exited with {} for {}", output.status, path.display()),
            stderr: Some(String::from_utf8_lossy(&output.stderr).trim().to_string()),
        });
    }

    parse_probe_json(&output.stdout)
}

/// Duration of `path` in seconds.
pub async fn get_duration(path: impl AsRef<Path>) -> MediaResult<f64> {
    Ok(probe_media(path).await?.duration)
}

fn parse_probe_json(stdout: &[u8]) -> MediaResult<MediaInfo> {
    let probe: ProbeJson = serde_json::from_slice(stdout)?;
    let has = |kind: &str| {
        probe
            .streams
            .iter()
            .any(|s| s.codec_type.as_deref() == Some(kind))
    };

    if !has("video") {
        return Err(MediaError::InvalidVideo("no video stream".to_string()));
    }

    let duration = probe
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .and_then(|d| d.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0)
        .ok_or_else(|| MediaError::InvalidVideo("missing or zero duration".to_string()))?;

    Ok(MediaInfo {
        duration,
        has_audio: has("audio"),
    })
}
