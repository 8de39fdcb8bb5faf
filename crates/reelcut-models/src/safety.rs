//! Safety annotations and moderation outcomes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Ordinal likelihood reported by a safety classifier.
///
/// Variants are declared in increasing order so `Ord` follows severity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Likelihood {
    #[default]
    Unknown,
    VeryUnlikely,
    Unlikely,
    Possible,
    Likely,
    VeryLikely,
}

impl Likelihood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Likelihood::Unknown => "unknown",
            Likelihood::VeryUnlikely => "very_unlikely",
            Likelihood::Unlikely => "unlikely",
            Likelihood::Possible => "possible",
            Likelihood::Likely => "likely",
            Likelihood::VeryLikely => "very_likely",
        }
    }

    /// `Likely` or `VeryLikely`.
    pub fn is_high(&self) -> bool {
        matches!(self, Likelihood::Likely | Likelihood::VeryLikely)
    }

    /// Parse the upper-case names used by cloud vision APIs
    /// (`VERY_UNLIKELY`, `POSSIBLE`, ...). Unrecognised values map to `Unknown`.
    pub fn from_api_name(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "VERY_UNLIKELY" => Likelihood::VeryUnlikely,
            "UNLIKELY" => Likelihood::Unlikely,
            "POSSIBLE" => Likelihood::Possible,
            "LIKELY" => Likelihood::Likely,
            "VERY_LIKELY" => Likelihood::VeryLikely,
            _ => Likelihood::Unknown,
        }
    }
}

impl std::fmt::Display for Likelihood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-category likelihoods plus free-text labels for one raw clip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SafetyAnnotation {
    #[serde(default)]
    pub adult: Likelihood,
    #[serde(default)]
    pub violence: Likelihood,
    #[serde(default)]
    pub racy: Likelihood,
    #[serde(default)]
    pub labels: Vec<String>,
}

impl SafetyAnnotation {
    pub fn new(adult: Likelihood, violence: Likelihood, racy: Likelihood) -> Self {
        Self {
            adult,
            violence,
            racy,
            labels: Vec::new(),
        }
    }

    /// Attach free-text labels.
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels.extend(labels.into_iter().map(Into::into));
        self
    }
}

/// Visual marker overlaid on a clip during remediation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerSymbol {
    /// Marks content with elevated adult/racy risk.
    HighRiskSymbol,
    /// Covers exposed skin (shirt overlay).
    CoverageSymbol,
}

impl MarkerSymbol {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerSymbol::HighRiskSymbol => "high-risk-symbol",
            MarkerSymbol::CoverageSymbol => "coverage-symbol",
        }
    }
}

impl std::fmt::Display for MarkerSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of moderating one clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ModerationDecision {
    /// Delete the clip and notify.
    Reject,
    /// Overlay a marker, optionally blurring the whole frame first.
    OverlayMarker { symbol: MarkerSymbol, needs_blur: bool },
    /// Publish unchanged.
    Pass,
}

impl ModerationDecision {
    pub fn overlay(symbol: MarkerSymbol) -> Self {
        Self::OverlayMarker {
            symbol,
            needs_blur: false,
        }
    }

    pub fn blur_then_overlay(symbol: MarkerSymbol) -> Self {
        Self::OverlayMarker {
            symbol,
            needs_blur: true,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationDecision::Reject => "reject",
            ModerationDecision::OverlayMarker { needs_blur: true, .. } => "blur_then_overlay",
            ModerationDecision::OverlayMarker { .. } => "overlay_marker",
            ModerationDecision::Pass => "pass",
        }
    }

    /// The remediation this decision requires, if any.
    pub fn remediation(&self) -> Option<Remediation> {
        match *self {
            ModerationDecision::OverlayMarker { symbol, needs_blur } => Some(Remediation {
                marker: symbol,
                blurred: needs_blur,
            }),
            _ => None,
        }
    }
}

impl std::fmt::Display for ModerationDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Remediation that was applied to a stored clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Remediation {
    pub marker: MarkerSymbol,
    pub blurred: bool,
}

/// Safety section of a persisted clip record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SafetyRecord {
    pub annotation: SafetyAnnotation,
    pub decision: ModerationDecision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<Remediation>,
}
