//! Safety classification capability.

use async_trait::async_trait;

use reelcut_models::SafetyAnnotation;

use crate::error::ClientResult;

/// Classifies a still frame sampled from a clip.
///
/// Implementations are chosen once at construction; callers never branch on
/// which one they hold.
#[async_trait]
pub trait SafetyClassifier: Send + Sync {
    /// Short name for logs and run records.
    fn name(&self) -> &'static str;

    async fn classify(&self, frame_png: &[u8]) -> ClientResult<SafetyAnnotation>;
}
