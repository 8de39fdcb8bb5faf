//! Run orchestration.
//!
//! A run walks every video in the raw directory, turns each transcript
//! segment into at most one stored clip, optionally joins one video's clips
//! into a reel, records the run, and finally hands every unscheduled clip
//! to the schedule queue.
//!
//! Videos may run concurrently; each video's segments run one at a time.
//! Only a store write failure stops the run.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tracing::{info, warn, Instrument};

use reelcut_models::{combined_filename, ClipRecord, QueueEntry, RunRecord, RunStats};
use reelcut_queue::ScheduleQueue;
use reelcut_storage::ClipStore;

use crate::clip_pipeline::{
    combination_order, process_segment, validate_segments, SegmentOutcome, VideoContext,
};
use crate::collaborators::Collaborators;
use crate::config::PipelineConfig;
use crate::error::{FailureKind, WorkerError, WorkerResult};
use crate::logging::VideoLogger;
use crate::metrics;

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "mkv", "webm"];

/// Result of processing one source video.
#[derive(Debug, Clone, Default)]
pub struct VideoReport {
    pub source: String,
    /// Why the video was skipped, if it was
    pub skipped: Option<String>,
    pub stats: RunStats,
    /// Clips appended for this video in this run
    pub accepted: Vec<ClipRecord>,
    pub combined: Option<PathBuf>,
}

pub struct Pipeline {
    config: PipelineConfig,
    deps: Collaborators,
    store: Arc<ClipStore>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, deps: Collaborators) -> Self {
        let store = Arc::new(ClipStore::new(config.store_path.clone()));
        Self {
            config,
            deps,
            store,
        }
    }

    pub fn with_store(mut self, store: Arc<ClipStore>) -> Self {
        self.store = store;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn store(&self) -> &ClipStore {
        &self.store
    }

    /// Process every video in the raw directory and record the run.
    pub async fn run(&self) -> WorkerResult<RunRecord> {
        let run = RunRecord::start();
        info!(run_id = %run.run_id, raw_dir = %self.config.raw_dir.display(), "Run started");

        tokio::fs::create_dir_all(&self.config.clip_dir).await?;

        let videos = discover_videos(&self.config.raw_dir).await?;
        info!(run_id = %run.run_id, videos = videos.len(), "Videos discovered");

        let run_id = run.run_id.clone();
        let mut reports = stream::iter(videos)
            .map(|video| {
                let run_id = run_id.clone();
                async move { self.process_video(&run_id, &video).await }
            })
            .buffer_unordered(self.config.max_concurrent_videos);

        let mut stats = RunStats::default();
        while let Some(report) = reports.next().await {
            match report {
                Ok(report) => stats.merge(&report.stats),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!(run_id = %run_id, kind = %e.kind(), error = %e, "Video dropped");
                    metrics::record_video("skipped");
                    stats.videos_skipped += 1;
                }
            }
        }
        drop(reports);

        if self.config.features.scheduling {
            let entries = self.schedule_pending(Utc::now()).await?;
            stats.queue_entries_created = entries.len() as u32;
        }

        let run = run.finish(stats);
        self.store.record_run(run.clone()).await?;

        info!(
            run_id = %run.run_id,
            videos_processed = stats.videos_processed,
            videos_skipped = stats.videos_skipped,
            clips_accepted = stats.clips_accepted,
            clips_rejected = stats.clips_rejected,
            clips_failed = stats.clips_failed,
            queue_entries = stats.queue_entries_created,
            "Run finished"
        );
        Ok(run)
    }

    /// Turn one video into stored clips.
    ///
    /// A video whose duration, transcript or scenes cannot be obtained is
    /// skipped and reported, not returned as an error.
    pub async fn process_video(&self, run_id: &str, video: &Path) -> WorkerResult<VideoReport> {
        let source_name = video
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| video.display().to_string());
        let logger = VideoLogger::new(run_id, &source_name);
        let span = logger.create_span();
        self.process_video_inner(&logger, video, &source_name)
            .instrument(span)
            .await
    }

    async fn process_video_inner(
        &self,
        logger: &VideoLogger,
        video: &Path,
        source_name: &str,
    ) -> WorkerResult<VideoReport> {
        logger.log_start(&video.display().to_string());

        let duration = match self.deps.prober.duration(video).await {
            Ok(d) => d,
            Err(e) => return self.skip_or_abort(logger, "probe failed", e.into()).await,
        };
        let segments = match self.deps.transcriber.transcribe(video).await {
            Ok(s) => s,
            Err(e) => return self.skip_or_abort(logger, "transcript unavailable", e.into()).await,
        };
        let scenes = match self.deps.scenes.detect(video).await {
            Ok(s) => s,
            Err(e) => return self.skip_or_abort(logger, "scene detection failed", e.into()).await,
        };

        let (segments, malformed) = validate_segments(segments);
        logger.log_progress(&format!(
            "{} segments, {} scene cuts, {:.1}s",
            segments.len(),
            scenes.len(),
            duration
        ));

        let mut report = VideoReport {
            source: source_name.to_string(),
            ..Default::default()
        };
        report.stats.segments_discarded = malformed as u32;

        let ctx = VideoContext {
            config: &self.config,
            deps: &self.deps,
            store: &self.store,
            source: video,
            source_name,
            scenes: &scenes,
            duration,
            logger,
        };

        for segment in &segments {
            let outcome = process_segment(&ctx, segment).await?;
            if !matches!(outcome, SegmentOutcome::Discarded) {
                metrics::record_clip(outcome.as_str());
            }
            let stats = &mut report.stats;
            match outcome {
                SegmentOutcome::Accepted { record, remediated } => {
                    stats.clips_accepted += 1;
                    if remediated {
                        stats.clips_remediated += 1;
                    }
                    report.accepted.push(record);
                }
                SegmentOutcome::Rejected => stats.clips_rejected += 1,
                SegmentOutcome::Failed => stats.clips_failed += 1,
                SegmentOutcome::Duplicate => stats.clips_duplicate += 1,
                SegmentOutcome::Discarded => stats.segments_discarded += 1,
            }
        }

        metrics::record_segments_discarded(report.stats.segments_discarded as u64);

        if self.config.features.combination && report.accepted.len() >= 2 {
            report.combined = self.combine(logger, &report.accepted).await;
        }

        report.stats.videos_processed = 1;
        metrics::record_video("processed");
        logger.log_completion(&format!(
            "{} accepted, {} rejected, {} failed, {} duplicate",
            report.stats.clips_accepted,
            report.stats.clips_rejected,
            report.stats.clips_failed,
            report.stats.clips_duplicate
        ));
        Ok(report)
    }

    /// Assign every unscheduled stored clip to the next free window.
    ///
    /// Returns only the entries created by this call.
    pub async fn schedule_pending(&self, now: DateTime<Utc>) -> WorkerResult<Vec<QueueEntry>> {
        let existing = self.store.schedule().await;
        let mut queue = ScheduleQueue::new(self.config.windows.clone(), &existing);
        let pending = self.store.unscheduled().await;
        let entries = queue.assign(&pending, now);

        let written = self.store.record_schedule(&entries).await?;
        metrics::record_queue_entries(written as u64);
        info!(pending = pending.len(), scheduled = written, "Schedule updated");
        Ok(entries)
    }

    /// Input and tool failures skip the video; persistence and config
    /// failures stop the run.
    async fn skip_or_abort(
        &self,
        logger: &VideoLogger,
        stage: &str,
        err: WorkerError,
    ) -> WorkerResult<VideoReport> {
        if err.is_fatal() {
            return Err(err);
        }
        let reason = format!("{}: {}", stage, err);
        Ok(self.skip(logger, err.kind(), reason).await)
    }

    async fn skip(&self, logger: &VideoLogger, kind: FailureKind, reason: String) -> VideoReport {
        logger.log_error(&format!("skipping video ({}): {}", kind, reason));
        metrics::record_video("skipped");
        self.deps
            .notify(
                &format!("Skipped video {} ({}): {}", logger.source(), kind, reason),
                self.config.external_timeout,
            )
            .await;

        VideoReport {
            source: logger.source().to_string(),
            skipped: Some(reason),
            stats: RunStats {
                videos_skipped: 1,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Concatenate a video's accepted clips. Failure is reported, never fatal.
    async fn combine(
        &self,
        logger: &VideoLogger,
        accepted: &[ClipRecord],
    ) -> Option<PathBuf> {
        let dest = self.config.combined_dir.join(combined_filename(logger.source()));
        let clips = combination_order(accepted);

        let result = match tokio::fs::create_dir_all(&self.config.combined_dir).await {
            Ok(()) => self.deps.combiner.concat(&clips, &dest).await.map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match result {
            Ok(()) => {
                logger.log_progress(&format!("combined {} clips into {}", clips.len(), dest.display()));
                Some(dest)
            }
            Err(e) => {
                logger.log_warning(&format!("combination failed: {}", e));
                self.deps
                    .notify(
                        &format!("Combining clips of {} failed: {}", logger.source(), e),
                        self.config.external_timeout,
                    )
                    .await;
                None
            }
        }
    }
}

/// Video files directly inside `dir`, sorted by name.
///
/// A missing directory yields no videos.
pub async fn discover_videos(dir: &Path) -> WorkerResult<Vec<PathBuf>> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(dir = %dir.display(), "Raw directory does not exist");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let mut videos = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_video = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| VIDEO_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
            .unwrap_or(false);
        if is_video && entry.file_type().await?.is_file() {
            videos.push(path);
        }
    }
    videos.sort();
    Ok(videos)
}
