//! Concatenation of clips into one combined reel.

use std::path::{Path, PathBuf};
use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Build the concat-demuxer list file body.
fn build_concat_list(clips: &[PathBuf]) -> String {
    clips
        .iter()
        .map(|p| format!("file '{}'\n", p.to_string_lossy().replace('\'', "'\\''")))
        .collect()
}

/// Concatenate `clips`, in order, into `output` without re-encoding.
///
/// All clips come from the same source and encoder settings, so stream copy
/// is safe.
pub async fn concat_clips(
    runner: &FfmpegRunner,
    clips: &[PathBuf],
    output: &Path,
) -> MediaResult<()> {
    if clips.is_empty() {
        return Err(MediaError::invalid_input("no clips to concatenate"));
    }
    if let Some(missing) = clips.iter().find(|p| !p.exists()) {
        return Err(MediaError::FileNotFound(missing.clone()));
    }
    if let Some(parent) = output.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // Paths in the list file are resolved relative to the list itself.
    let absolute: Vec<PathBuf> = clips
        .iter()
        .map(|p| std::path::absolute(p).unwrap_or_else(|_| p.clone()))
        .collect();

    let list_dir = tempfile::tempdir()?;
    let list_path = list_dir.path().join("concat.txt");
    tokio::fs::write(&list_path, build_concat_list(&absolute)).await?;

    info!(
        count = clips.len(),
        output = %output.display(),
        "Concatenating clips"
    );

    let cmd = FfmpegCommand::new(&list_path, output)
        .input_arg("-f")
        .input_arg("concat")
        .input_arg("-safe")
        .input_arg("0")
        .codec_copy()
        .faststart();

    if let Err(e) = runner.run(&cmd).await {
        let _ = crate::fs_utils::remove_if_exists(output).await;
        return Err(e);
    }
    Ok(())
}
