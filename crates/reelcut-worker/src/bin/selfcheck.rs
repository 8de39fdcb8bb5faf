use std::path::Path;

use reelcut_media::{check_ffmpeg, check_ffprobe};
use reelcut_storage::ClipStore;
use reelcut_worker::PipelineConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = PipelineConfig::from_env()?;

    println!(
        "reelcut-selfcheck: starting with raw_dir={} store={}",
        config.raw_dir.display(),
        config.store_path.display()
    );

    let ffmpeg = check_ffmpeg().map_err(|e| anyhow::anyhow!("ffmpeg not available: {}", e))?;
    let ffprobe = check_ffprobe().map_err(|e| anyhow::anyhow!("ffprobe not available: {}", e))?;
    println!("reelcut-selfcheck: ffmpeg={} ffprobe={}", ffmpeg.display(), ffprobe.display());

    ensure_dir(&config.clip_dir).await?;
    if config.features.combination {
        ensure_dir(&config.combined_dir).await?;
    }
    if let Some(parent) = config.store_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent).await?;
    }

    let doc = ClipStore::new(&config.store_path)
        .verify()
        .await
        .map_err(|e| anyhow::anyhow!("store check failed: {}", e))?;
    println!(
        "reelcut-selfcheck: store ok ({} clips, {} scheduled, {} runs)",
        doc.clips.len(),
        doc.schedule.len(),
        doc.runs.len()
    );

    println!("reelcut-selfcheck: ok");
    Ok(())
}

async fn ensure_dir(path: &Path) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {}", path.display(), e))?;
    Ok(())
}
