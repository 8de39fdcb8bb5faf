use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use reelcut_media::remove_if_exists;
use reelcut_models::{
    clip_filename, derive_clip_id, ClipInterval, ClipRecord, MarkerSymbol, ModerationDecision,
    SafetyAnnotation, SafetyRecord, SceneBoundaries, TranscriptSegment,
};
use reelcut_storage::{AppendOutcome, ClipStore};

use crate::clip_pipeline::boundary::reconcile;
use crate::clip_pipeline::metadata::{classify_emotion, extract_keywords};
use crate::clip_pipeline::moderation::moderate;
use crate::collaborators::Collaborators;
use crate::config::PipelineConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::logging::VideoLogger;

/// Everything one video's segments share.
pub struct VideoContext<'a> {
    pub config: &'a PipelineConfig,
    pub deps: &'a Collaborators,
    pub store: &'a ClipStore,
    pub source: &'a Path,
    /// File name of the source, used for ids and clip filenames
    pub source_name: &'a str,
    pub scenes: &'a SceneBoundaries,
    pub duration: f64,
    pub logger: &'a VideoLogger,
}

/// What happened to one transcript segment.
#[derive(Debug, Clone)]
pub enum SegmentOutcome {
    Accepted { record: ClipRecord, remediated: bool },
    Rejected,
    Failed,
    Duplicate,
    /// No interval satisfied the duration policy.
    Discarded,
}

impl SegmentOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentOutcome::Accepted { remediated: true, .. } => "remediated",
            SegmentOutcome::Accepted { .. } => "accepted",
            SegmentOutcome::Rejected => "rejected",
            SegmentOutcome::Failed => "failed",
            SegmentOutcome::Duplicate => "duplicate",
            SegmentOutcome::Discarded => "discarded",
        }
    }
}

/// Reconcile, cut, moderate and store one segment.
///
/// Cut, classify and remediation failures delete the partial clip and come
/// back as [`SegmentOutcome::Failed`]. Only a store write failure is an
/// `Err`.
pub async fn process_segment(
    ctx: &VideoContext<'_>,
    segment: &TranscriptSegment,
) -> WorkerResult<SegmentOutcome> {
    let Some(interval) = reconcile(segment, ctx.scenes, ctx.duration, &ctx.config.policy) else {
        debug!(
            source = %ctx.source_name,
            start = segment.start,
            end = segment.end,
            "No clip interval fits segment"
        );
        return Ok(SegmentOutcome::Discarded);
    };

    let clip_id = derive_clip_id(ctx.source_name, &interval);
    if ctx.store.contains(&clip_id).await {
        debug!(clip_id = %clip_id, "Clip already stored, skipping");
        return Ok(SegmentOutcome::Duplicate);
    }

    let clip_path = ctx.config.clip_dir.join(clip_filename(ctx.source_name, &interval));

    info!(
        source = %ctx.source_name,
        clip_id = %clip_id,
        start = interval.start,
        end = interval.end,
        "Cutting clip"
    );

    if let Err(e) = ctx.deps.cutter.cut(ctx.source, &interval, &clip_path).await {
        if let Some(stderr) = e.stderr() {
            debug!(clip_id = %clip_id, stderr = %stderr, "Cut stderr");
        }
        let reason = format!("cut failed: {}", e);
        discard(ctx, &clip_path, &clip_id, &reason).await;
        return Ok(SegmentOutcome::Failed);
    }

    let mut safety = None;
    let mut remediated = false;
    if ctx.config.features.moderation {
        let annotation = match classify(ctx, &clip_path, &interval).await {
            Ok(annotation) => annotation,
            Err(e) => {
                let reason = format!("classification failed: {}", e);
                discard(ctx, &clip_path, &clip_id, &reason).await;
                return Ok(SegmentOutcome::Failed);
            }
        };

        let decision = moderate(&annotation);
        info!(clip_id = %clip_id, decision = %decision, "Clip moderated");

        match decision {
            ModerationDecision::Reject => {
                delete_clip(&clip_path).await;
                ctx.logger.log_warning(&format!("clip {} rejected by moderation", clip_id));
                ctx.deps
                    .notify(
                        &format!(
                            "Rejected clip {} from {} ({:.1}s-{:.1}s): violence likely",
                            clip_id, ctx.source_name, interval.start, interval.end
                        ),
                        ctx.config.external_timeout,
                    )
                    .await;
                return Ok(SegmentOutcome::Rejected);
            }
            ModerationDecision::OverlayMarker { symbol, needs_blur } => {
                if let Err(e) = remediate(ctx, &clip_path, symbol, needs_blur).await {
                    let reason = format!("remediation failed: {}", e);
                    discard(ctx, &clip_path, &clip_id, &reason).await;
                    return Ok(SegmentOutcome::Failed);
                }
                remediated = true;
            }
            ModerationDecision::Pass => {}
        }

        safety = Some(SafetyRecord {
            remediation: decision.remediation(),
            annotation,
            decision,
        });
    }

    let text = segment.text.trim();
    let mut record = ClipRecord::new(ctx.source_name, interval, clip_path.to_string_lossy())
        .with_transcript(text)
        .with_keywords(extract_keywords(text, ctx.config.keyword_limit))
        .with_emotion(classify_emotion(text));
    if let Some(safety) = safety {
        record = record.with_safety(safety);
    }

    match ctx.store.append(record.clone()).await? {
        AppendOutcome::Inserted => Ok(SegmentOutcome::Accepted { record, remediated }),
        AppendOutcome::Duplicate => Ok(SegmentOutcome::Duplicate),
    }
}

/// Sample the clip's middle frame and classify it, bounded by the
/// external timeout.
async fn classify(
    ctx: &VideoContext<'_>,
    clip_path: &Path,
    interval: &ClipInterval,
) -> WorkerResult<SafetyAnnotation> {
    let frame = ctx
        .deps
        .frames
        .frame_png(clip_path, interval.duration() / 2.0)
        .await?;

    let timeout = ctx.config.external_timeout;
    match tokio::time::timeout(timeout, ctx.deps.classifier.classify(&frame)).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(WorkerError::Timeout("classifier", timeout.as_secs())),
    }
}

/// Blur (when asked) and then overlay the marker, in place.
async fn remediate(
    ctx: &VideoContext<'_>,
    clip_path: &Path,
    symbol: MarkerSymbol,
    needs_blur: bool,
) -> WorkerResult<()> {
    if needs_blur {
        ctx.deps.remediator.blur(clip_path).await?;
    }
    ctx.deps.remediator.overlay(clip_path, symbol).await?;
    Ok(())
}

/// Delete a clip that must not be kept, then tell the operator why.
async fn discard(ctx: &VideoContext<'_>, clip_path: &Path, clip_id: &str, reason: &str) {
    delete_clip(clip_path).await;
    ctx.logger.log_error(&format!("clip {} dropped: {}", clip_id, reason));
    ctx.deps
        .notify(
            &format!("Dropped clip {} from {}: {}", clip_id, ctx.source_name, reason),
            ctx.config.external_timeout,
        )
        .await;
}

async fn delete_clip(path: &Path) {
    if let Err(e) = remove_if_exists(path).await {
        warn!(path = %path.display(), error = %e, "Failed to delete clip");
    }
}

/// Clip paths of accepted records in interval order.
pub fn combination_order(records: &[ClipRecord]) -> Vec<PathBuf> {
    let mut sorted: Vec<&ClipRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.interval.start.total_cmp(&b.interval.start));
    sorted.iter().map(|r| PathBuf::from(&r.path)).collect()
}
