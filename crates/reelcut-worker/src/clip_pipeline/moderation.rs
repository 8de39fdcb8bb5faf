//! Safety moderation.
//!
//! Maps one [`SafetyAnnotation`] onto a [`ModerationDecision`]. Rules are
//! checked in priority order and the first match wins:
//!
//! 1. violence likely or very likely: reject
//! 2. adult or racy likely or very likely: overlay the high-risk marker
//! 3. labels mention both "shirtless" and "child": blur, then overlay the
//!    coverage marker
//! 4. any category possible: overlay the high-risk marker
//! 5. otherwise: pass
//!
//! The function is pure. Deleting, blurring and overlaying are the caller's
//! job.

use reelcut_models::{Likelihood, MarkerSymbol, ModerationDecision, SafetyAnnotation};

pub fn moderate(annotation: &SafetyAnnotation) -> ModerationDecision {
    if annotation.violence.is_high() {
        return ModerationDecision::Reject;
    }

    if annotation.adult.is_high() || annotation.racy.is_high() {
        return ModerationDecision::overlay(MarkerSymbol::HighRiskSymbol);
    }

    if labels_mention(&annotation.labels, "shirtless") && labels_mention(&annotation.labels, "child") {
        return ModerationDecision::blur_then_overlay(MarkerSymbol::CoverageSymbol);
    }

    let possible = [annotation.adult, annotation.violence, annotation.racy]
        .iter()
        .any(|l| *l == Likelihood::Possible);
    if possible {
        return ModerationDecision::overlay(MarkerSymbol::HighRiskSymbol);
    }

    ModerationDecision::Pass
}

/// Case-insensitive substring match against any label.
fn labels_mention(labels: &[String], needle: &str) -> bool {
    labels.iter().any(|l| l.to_lowercase().contains(needle))
}
