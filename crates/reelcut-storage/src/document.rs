//! The persisted store document.

use serde::{Deserialize, Serialize};

use reelcut_models::{ClipRecord, QueueEntry, RunRecord};

/// Everything the store persists, written as one unit.
///
/// Missing keys load as empty so older documents that only carry `clips`
/// stay readable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default)]
    pub clips: Vec<ClipRecord>,

    #[serde(default)]
    pub schedule: Vec<QueueEntry>,

    #[serde(default)]
    pub runs: Vec<RunRecord>,
}

impl StoreDocument {
    pub fn clip(&self, id: &str) -> Option<&ClipRecord> {
        self.clips.iter().find(|c| c.id == id)
    }

    pub fn clip_mut(&mut self, id: &str) -> Option<&mut ClipRecord> {
        self.clips.iter_mut().find(|c| c.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.clip(id).is_some()
    }

    pub fn entry_mut(&mut self, clip_id: &str) -> Option<&mut QueueEntry> {
        self.schedule.iter_mut().find(|e| e.clip_id == clip_id)
    }

    /// Clips without a publish slot, in creation order.
    pub fn unscheduled(&self) -> Vec<ClipRecord> {
        let mut clips: Vec<ClipRecord> = self
            .clips
            .iter()
            .filter(|c| !c.is_scheduled() && !self.schedule.iter().any(|e| e.clip_id == c.id))
            .cloned()
            .collect();
        // Stable sort keeps append order for identical timestamps.
        clips.sort_by_key(|c| c.created_at);
        clips
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelcut_models::ClipInterval;

    #[test]
    fn test_missing_keys_default_to_empty() {
        let doc: StoreDocument = serde_json::from_str(r#"{"clips": []}"#).unwrap();
        assert!(doc.schedule.is_empty());
        assert!(doc.runs.is_empty());

        let doc: StoreDocument = serde_json::from_str("{}").unwrap();
        assert_eq!(doc, StoreDocument::default());
    }

    #[test]
    fn test_unscheduled_excludes_scheduled_clips() {
        let mut doc = StoreDocument::default();
        let a = ClipRecord::new("a.mp4", ClipInterval::new(0.0, 5.0).unwrap(), "Clips/a.mp4");
        let mut b = ClipRecord::new("b.mp4", ClipInterval::new(0.0, 5.0).unwrap(), "Clips/b.mp4");
        b.scheduled_at = Some(chrono::Utc::now());
        doc.clips.push(a.clone());
        doc.clips.push(b);

        let pending = doc.unscheduled();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, a.id);
    }
}
