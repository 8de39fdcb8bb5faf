//! File replacement for in-place renders.
//!
//! Remediation renders to a sibling temp file and then swaps it over the
//! clip, so a crash mid-render never leaves a half-written clip behind.

use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

use crate::error::MediaResult;

/// Linux and macOS both use 18 for a rename across filesystems.
const EXDEV: i32 = 18;

/// Replace `dst` with `src`, creating `dst`'s directory if needed.
///
/// Falls back to copying when the two live on different filesystems.
pub async fn move_file(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> MediaResult<()> {
    let (src, dst) = (src.as_ref(), dst.as_ref());

    if let Some(dir) = dst.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).await?;
    }

    match fs::rename(src, dst).await {
        Err(e) if e.raw_os_error() == Some(EXDEV) => {
            tracing::debug!(src = %src.display(), dst = %dst.display(), "Rename crosses devices, copying");
            fs::copy(src, dst).await?;
            remove_if_exists(src).await?;
            Ok(())
        }
        other => Ok(other?),
    }
}

/// Delete `path`; a file that is already gone is not an error.
///
/// Returns `true` when something was deleted.
///
/// ```
/// # tokio_test::block_on(async {
/// let dir = tempfile::tempdir().unwrap();
/// let clip = dir.path().join("rejected.mp4");
/// tokio::fs::write(&clip, b"clip").await.unwrap();
///
/// assert!(reelcut_media::remove_if_exists(&clip).await.unwrap());
/// assert!(!reelcut_media::remove_if_exists(&clip).await.unwrap());
/// # });
/// ```
pub async fn remove_if_exists(path: impl AsRef<Path>) -> MediaResult<bool> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_render_replaces_clip() {
        let dir = TempDir::new().unwrap();
        let render = dir.path().join("a_0009000_0015000.render.mp4");
        let clip = dir.path().join("a_0009000_0015000.mp4");
        fs::write(&render, b"blurred").await.unwrap();
        fs::write(&clip, b"raw cut").await.unwrap();

        move_file(&render, &clip).await.unwrap();

        assert!(!render.exists());
        assert_eq!(fs::read(&clip).await.unwrap(), b"blurred");
    }

    #[tokio::test]
    async fn test_missing_destination_dir_is_created() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("clip.mp4");
        let dst = dir.path().join("nested").join("clip.mp4");
        fs::write(&src, b"x").await.unwrap();

        move_file(&src, &dst).await.unwrap();
        assert!(dst.exists());
    }

    #[tokio::test]
    async fn test_remove_twice() {
        let dir = TempDir::new().unwrap();
        let clip = dir.path().join("clip.mp4");
        fs::write(&clip, b"x").await.unwrap();

        assert!(remove_if_exists(&clip).await.unwrap());
        assert!(!remove_if_exists(&clip).await.unwrap());
    }
}
