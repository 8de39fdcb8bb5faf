//! Boundary reconciliation.
//!
//! Turns one transcript segment into a clip interval in three fixed steps:
//! pad by the margin, clamp the length to the policy, then snap outward to
//! scene cuts. The order matters: snapping before clamping would let scene
//! cuts defeat the length bounds.
//!
//! Snapping happens after clamping and only ever widens the interval, so a
//! result can exceed `max_len` by the distance to the nearest cut.

use reelcut_models::{ClipInterval, ClipPolicy, SceneBoundaries, TranscriptSegment};

const EPSILON: f64 = 1e-9;

/// Reconcile `segment` against `scenes` for a video of `video_duration`
/// seconds. Returns `None` when no interval of at least `min_len` fits.
pub fn reconcile(
    segment: &TranscriptSegment,
    scenes: &SceneBoundaries,
    video_duration: f64,
    policy: &ClipPolicy,
) -> Option<ClipInterval> {
    if !segment.is_valid() || !video_duration.is_finite() || video_duration <= 0.0 {
        return None;
    }
    if segment.start >= video_duration {
        return None;
    }

    // Pad
    let start = (segment.start - policy.margin).max(0.0);
    let mut end = segment.end + policy.margin;

    // Clamp
    let len = end - start;
    if len < policy.min_len {
        end = start + policy.min_len;
    } else if len > policy.max_len {
        end = start + policy.max_len;
    }

    // Snap outward, then keep the end inside the video
    let mut start = scenes.at_or_before(start).unwrap_or(0.0);
    let end = scenes
        .at_or_after(end)
        .unwrap_or(video_duration)
        .min(video_duration);

    // Near the end of the video the cap can undercut min_len; recover the
    // missing length from before the start instead.
    if end - start < policy.min_len - EPSILON {
        let wanted = (end - policy.min_len).max(0.0);
        start = scenes.at_or_before(wanted).unwrap_or(0.0);
    }

    if end - start < policy.min_len - EPSILON {
        return None;
    }
    ClipInterval::new(start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: f64, end: f64) -> TranscriptSegment {
        TranscriptSegment::new("hi", start, end)
    }

    fn scenes(ts: &[f64]) -> SceneBoundaries {
        SceneBoundaries::new(ts.to_vec())
    }

    fn assert_interval(got: Option<ClipInterval>, start: f64, end: f64) {
        let got = got.expect("expected an interval");
        assert!((got.start - start).abs() < 1e-9, "start {} != {}", got.start, start);
        assert!((got.end - end).abs() < 1e-9, "end {} != {}", got.end, end);
    }

    #[test]
    fn test_short_segment_is_padded_clamped_and_snapped() {
        // [10.0, 10.8] -> pad [9.5, 11.3] -> clamp [9.5, 14.5] -> snap [9.0, 15.0]
        let got = reconcile(&seg(10.0, 10.8), &scenes(&[9.0, 15.0]), 60.0, &ClipPolicy::default());
        assert_interval(got, 9.0, 15.0);
    }

    #[test]
    fn test_no_scenes_snaps_to_video_bounds() {
        let got = reconcile(&seg(10.0, 12.0), &SceneBoundaries::empty(), 60.0, &ClipPolicy::default());
        assert_interval(got, 0.0, 60.0);
    }

    #[test]
    fn test_long_segment_is_shrunk_before_snapping() {
        // pad [19.5, 60.5] -> clamp [19.5, 34.5] -> snap [18.0, 35.0]
        let got = reconcile(
            &seg(20.0, 60.0),
            &scenes(&[5.0, 18.0, 35.0, 50.0]),
            120.0,
            &ClipPolicy::default(),
        );
        assert_interval(got, 18.0, 35.0);
    }

    #[test]
    fn test_snapping_may_exceed_max_len() {
        // clamp gives [19.5, 34.5]; nearest cuts are 2.0 and 58.0
        let policy = ClipPolicy::default();
        let got = reconcile(&seg(20.0, 60.0), &scenes(&[2.0, 58.0]), 120.0, &policy)
            .expect("interval");
        assert!((got.start - 2.0).abs() < 1e-9);
        assert!((got.end - 58.0).abs() < 1e-9);
        assert!(got.duration() > policy.max_len);
    }

    #[test]
    fn test_boundary_on_exact_value_is_used() {
        let got = reconcile(&seg(10.5, 13.5), &scenes(&[10.0, 14.0]), 60.0, &ClipPolicy::default());
        // pad [10.0, 14.0], length 4 -> clamp [10.0, 15.0] -> end snaps to video end
        assert_interval(got, 10.0, 60.0);
    }

    #[test]
    fn test_start_never_negative() {
        let got = reconcile(&seg(0.2, 1.0), &scenes(&[8.0]), 60.0, &ClipPolicy::default());
        assert_interval(got, 0.0, 8.0);
    }

    #[test]
    fn test_end_capped_at_video_duration_with_backfill() {
        // pad [57.5, 59.5] -> clamp [57.5, 62.5] -> snap [57.0, 60.0] is only 3s,
        // so start backs off to 55.0 and snaps to the cut at 50.0
        let got = reconcile(&seg(58.0, 59.0), &scenes(&[50.0, 57.0]), 60.0, &ClipPolicy::default());
        assert_interval(got, 50.0, 60.0);
    }

    #[test]
    fn test_video_shorter_than_min_len_is_rejected() {
        assert!(reconcile(&seg(0.5, 1.5), &SceneBoundaries::empty(), 3.0, &ClipPolicy::default()).is_none());
    }

    #[test]
    fn test_segment_past_video_end_is_rejected() {
        assert!(reconcile(&seg(70.0, 72.0), &SceneBoundaries::empty(), 60.0, &ClipPolicy::default()).is_none());
    }

    #[test]
    fn test_invalid_segment_is_rejected() {
        let policy = ClipPolicy::default();
        assert!(reconcile(&seg(5.0, 5.0), &SceneBoundaries::empty(), 60.0, &policy).is_none());
        assert!(reconcile(&seg(f64::NAN, 5.0), &SceneBoundaries::empty(), 60.0, &policy).is_none());
    }

    #[test]
    fn test_short_form_policy() {
        // pad [9.5, 11.3] len 1.8 -> clamp to 2 -> [9.5, 11.5] -> snap [9.0, 12.0]
        let got = reconcile(&seg(10.0, 10.8), &scenes(&[9.0, 12.0, 30.0]), 60.0, &ClipPolicy::short_form());
        assert_interval(got, 9.0, 12.0);
    }

    #[test]
    fn test_result_respects_min_len_for_many_inputs() {
        let policy = ClipPolicy::default();
        let cuts = scenes(&[3.0, 11.0, 19.5, 27.0, 41.0]);
        for i in 0..80 {
            let start = i as f64 * 0.6;
            for len in [0.1, 1.0, 4.0, 9.0, 20.0] {
                if let Some(interval) = reconcile(&seg(start, start + len), &cuts, 45.0, &policy) {
                    assert!(interval.duration() >= policy.min_len - 1e-9);
                    assert!(interval.start >= 0.0 && interval.end <= 45.0);
                }
            }
        }
    }
}
