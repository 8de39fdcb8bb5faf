//! Local pixel-heuristic classifier.
//!
//! Estimates exposure from the share of skin-toned pixels. It cannot judge
//! violence and produces no labels, so it only ever raises adult/racy.

use async_trait::async_trait;
use tracing::debug;

use reelcut_models::{Likelihood, SafetyAnnotation};

use crate::classifier::SafetyClassifier;
use crate::error::ClientResult;

/// Frames are downscaled to at most this size before sampling.
const SAMPLE_SIZE: u32 = 128;

/// Skin ratio at or above which a frame is treated as likely racy.
pub const LIKELY_SKIN_RATIO: f32 = 0.45;

/// Skin ratio at or above which a frame is treated as possibly racy.
pub const POSSIBLE_SKIN_RATIO: f32 = 0.30;

#[derive(Debug, Clone, Default)]
pub struct HeuristicClassifier;

impl HeuristicClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Share of pixels in `frame_png` that look like skin, in `[0, 1]`.
    pub fn skin_ratio(frame_png: &[u8]) -> ClientResult<f32> {
        let mut img = image::load_from_memory(frame_png)?;
        if img.width() > SAMPLE_SIZE || img.height() > SAMPLE_SIZE {
            img = img.thumbnail(SAMPLE_SIZE, SAMPLE_SIZE);
        }
        let rgba = img.to_rgba8();

        let total = (rgba.width() * rgba.height()) as usize;
        if total == 0 {
            return Ok(0.0);
        }
        let skin = rgba
            .pixels()
            .filter(|p| is_skin(p.0[0], p.0[1], p.0[2]))
            .count();
        Ok(skin as f32 / total as f32)
    }

    fn annotate(ratio: f32) -> SafetyAnnotation {
        let (adult, racy) = if ratio >= LIKELY_SKIN_RATIO {
            (Likelihood::Possible, Likelihood::Likely)
        } else if ratio >= POSSIBLE_SKIN_RATIO {
            (Likelihood::Unlikely, Likelihood::Possible)
        } else {
            (Likelihood::VeryUnlikely, Likelihood::VeryUnlikely)
        };
        SafetyAnnotation::new(adult, Likelihood::Unknown, racy)
    }
}

/// RGB skin rule for daylight illumination.
fn is_skin(r: u8, g: u8, b: u8) -> bool {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    r > 95 && g > 40 && b > 20 && max - min > 15 && r.abs_diff(g) > 15 && r > g && r > b
}

#[async_trait]
impl SafetyClassifier for HeuristicClassifier {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    async fn classify(&self, frame_png: &[u8]) -> ClientResult<SafetyAnnotation> {
        let ratio = Self::skin_ratio(frame_png)?;
        debug!(skin_ratio = ratio, "Heuristic classification");
        Ok(Self::annotate(ratio))
    }
}
