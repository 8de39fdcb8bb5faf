use reelcut_models::TranscriptSegment;
use tracing::warn;

/// Drop malformed segments and order the rest by start time.
///
/// Returns the usable segments and how many were discarded.
pub fn validate_segments(segments: Vec<TranscriptSegment>) -> (Vec<TranscriptSegment>, usize) {
    let total = segments.len();
    let mut valid: Vec<TranscriptSegment> = segments
        .into_iter()
        .filter(|s| {
            if s.is_valid() {
                true
            } else {
                warn!(start = s.start, end = s.end, text = %s.text, "Discarding malformed segment");
                false
            }
        })
        .collect();

    valid.sort_by(|a, b| a.start.total_cmp(&b.start));
    let discarded = total - valid.len();
    (valid, discarded)
}
