//! JSON-file clip store.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use reelcut_models::{ClipRecord, QueueEntry, RunRecord};

use crate::document::StoreDocument;
use crate::error::{StorageError, StorageResult};

/// Result of an idempotent append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    Inserted,
    Duplicate,
}

/// Append-only clip store backed by one JSON document.
///
/// Every mutation loads the full document, applies a change and rewrites
/// the whole file, all under one lock. Only one process may write a given
/// path at a time.
#[derive(Debug)]
pub struct ClipStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl ClipStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document.
    ///
    /// A missing file is the initial state. A file that cannot be read or
    /// parsed is logged and treated as empty rather than aborting the run.
    pub async fn load(&self) -> StoreDocument {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => match serde_json::from_slice::<StoreDocument>(&bytes) {
                Ok(doc) => doc,
                Err(e) => {
                    warn!(
                        path = %self.path.display(),
                        error = %e,
                        "Store document is corrupt, starting from empty"
                    );
                    StoreDocument::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No store document yet");
                StoreDocument::default()
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Store document unreadable, starting from empty"
                );
                StoreDocument::default()
            }
        }
    }

    /// Parse the document strictly, surfacing corruption as an error.
    pub async fn verify(&self) -> StorageResult<StoreDocument> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoreDocument::default()),
            Err(e) => Err(StorageError::ReadFailed {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    async fn write(&self, doc: &StoreDocument) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StorageError::write_failed(&self.path, e))?;
            }
        }

        let body = serde_json::to_vec_pretty(doc)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &body)
            .await
            .map_err(|e| StorageError::write_failed(&tmp, e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StorageError::write_failed(&self.path, e))?;
        Ok(())
    }

    /// Run a read-modify-write cycle under the store lock.
    ///
    /// The document is only written when `f` returns `Ok`.
    pub async fn update<T, F>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(&mut StoreDocument) -> StorageResult<T>,
    {
        let _guard = self.lock.lock().await;
        let mut doc = self.load().await;
        let out = f(&mut doc)?;
        self.write(&doc).await?;
        Ok(out)
    }

    /// Append a clip unless one with the same id is already stored.
    ///
    /// ```
    /// # tokio_test::block_on(async {
    /// use reelcut_models::{ClipInterval, ClipRecord};
    /// use reelcut_storage::{AppendOutcome, ClipStore};
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let store = ClipStore::new(dir.path().join("mags-log.json"));
    /// let record = ClipRecord::new("a.mp4", ClipInterval::new(9.0, 15.0).unwrap(), "Clips/a.mp4");
    ///
    /// assert_eq!(store.append(record.clone()).await.unwrap(), AppendOutcome::Inserted);
    /// assert_eq!(store.append(record).await.unwrap(), AppendOutcome::Duplicate);
    /// assert_eq!(store.all().await.len(), 1);
    /// # });
    /// ```
    pub async fn append(&self, record: ClipRecord) -> StorageResult<AppendOutcome> {
        let id = record.id.clone();
        let outcome = self
            .update(move |doc| {
                if doc.contains(&record.id) {
                    return Ok(AppendOutcome::Duplicate);
                }
                doc.clips.push(record);
                Ok(AppendOutcome::Inserted)
            })
            .await?;

        match outcome {
            AppendOutcome::Inserted => info!(clip_id = %id, "Clip appended"),
            AppendOutcome::Duplicate => debug!(clip_id = %id, "Clip already stored"),
        }
        Ok(outcome)
    }

    pub async fn all(&self) -> Vec<ClipRecord> {
        let _guard = self.lock.lock().await;
        self.load().await.clips
    }

    pub async fn contains(&self, id: &str) -> bool {
        let _guard = self.lock.lock().await;
        self.load().await.contains(id)
    }

    /// Clips without a publish slot, in creation order.
    pub async fn unscheduled(&self) -> Vec<ClipRecord> {
        let _guard = self.lock.lock().await;
        self.load().await.unscheduled()
    }

    pub async fn schedule(&self) -> Vec<QueueEntry> {
        let _guard = self.lock.lock().await;
        self.load().await.schedule
    }

    /// Attach a publish time to a stored clip.
    ///
    /// A clip that already has a slot keeps it.
    pub async fn mark_scheduled(&self, id: &str, when: DateTime<Utc>) -> StorageResult<()> {
        let entries = vec![QueueEntry::new(id, when)];
        let written = self.record_schedule(&entries).await?;
        if written == 0 && !self.contains(id).await {
            return Err(StorageError::not_found(id));
        }
        Ok(())
    }

    /// Persist queue entries and stamp their clips, skipping clips that
    /// already have an entry. Returns how many entries were written.
    pub async fn record_schedule(&self, entries: &[QueueEntry]) -> StorageResult<usize> {
        self.update(|doc| {
            let mut written = 0;
            for entry in entries {
                if doc.schedule.iter().any(|e| e.clip_id == entry.clip_id) {
                    continue;
                }
                let Some(clip) = doc.clip_mut(&entry.clip_id) else {
                    warn!(clip_id = %entry.clip_id, "Queue entry for unknown clip ignored");
                    continue;
                };
                if clip.scheduled_at.is_some() {
                    continue;
                }
                clip.scheduled_at = Some(entry.scheduled_at);
                doc.schedule.push(entry.clone());
                written += 1;
            }
            Ok(written)
        })
        .await
    }

    /// Stamp the queue entry of `clip_id` as posted.
    pub async fn mark_posted(&self, clip_id: &str, when: DateTime<Utc>) -> StorageResult<()> {
        self.update(|doc| {
            let entry = doc
                .entry_mut(clip_id)
                .ok_or_else(|| StorageError::EntryNotFound(clip_id.to_string()))?;
            entry.posted_at = Some(when);
            Ok(())
        })
        .await
    }

    pub async fn record_run(&self, run: RunRecord) -> StorageResult<()> {
        self.update(move |doc| {
            doc.runs.push(run);
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use reelcut_models::{ClipInterval, RunStats};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn record(source: &str, start: f64, end: f64) -> ClipRecord {
        ClipRecord::new(
            source,
            ClipInterval::new(start, end).unwrap(),
            format!("Clips/{}", source),
        )
    }

    fn store_in(dir: &TempDir) -> ClipStore {
        ClipStore::new(dir.path().join("public").join("mags-log.json"))
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.all().await.is_empty());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        tokio::fs::create_dir_all(store.path().parent().unwrap()).await.unwrap();
        tokio::fs::write(store.path(), b"{not json").await.unwrap();

        assert!(store.all().await.is_empty());
        assert!(store.verify().await.is_err());

        // The next write replaces the corrupt document.
        store.append(record("a.mp4", 0.0, 5.0)).await.unwrap();
        assert_eq!(store.verify().await.unwrap().clips.len(), 1);
    }

    #[tokio::test]
    async fn test_append_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let first = store.append(record("a.mp4", 9.0, 15.0)).await.unwrap();
        let second = store.append(record("a.mp4", 9.0, 15.0)).await.unwrap();

        assert_eq!(first, AppendOutcome::Inserted);
        assert_eq!(second, AppendOutcome::Duplicate);
        assert_eq!(store.all().await.len(), 1);
    }

    #[tokio::test]
    async fn test_first_write_produces_expected_shape() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.append(record("a.mp4", 0.0, 5.0)).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&tokio::fs::read(store.path()).await.unwrap()).unwrap();
        assert_eq!(raw["clips"].as_array().unwrap().len(), 1);
        assert!(raw["schedule"].as_array().unwrap().is_empty());
        assert!(raw["runs"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_serialized() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(store_in(&dir));

        let mut handles = Vec::new();
        for i in 0..10 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .append(record(&format!("v{}.mp4", i), 0.0, 5.0))
                    .await
                    .unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.all().await.len(), 10);
    }

    #[tokio::test]
    async fn test_mark_scheduled_keeps_existing_slot() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let clip = record("a.mp4", 0.0, 5.0);
        let id = clip.id.clone();
        store.append(clip).await.unwrap();

        let first = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2024, 5, 1, 14, 0, 0).unwrap();
        store.mark_scheduled(&id, first).await.unwrap();
        store.mark_scheduled(&id, second).await.unwrap();

        let clips = store.all().await;
        assert_eq!(clips[0].scheduled_at, Some(first));
        assert_eq!(store.schedule().await.len(), 1);
        assert!(store.unscheduled().await.is_empty());
    }

    #[tokio::test]
    async fn test_mark_scheduled_unknown_clip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let err = store.mark_scheduled("missing", Utc::now()).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_mark_posted() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let clip = record("a.mp4", 0.0, 5.0);
        let id = clip.id.clone();
        store.append(clip).await.unwrap();
        store.mark_scheduled(&id, Utc::now()).await.unwrap();

        let posted = Utc::now();
        store.mark_posted(&id, posted).await.unwrap();
        assert_eq!(store.schedule().await[0].posted_at, Some(posted));

        assert!(matches!(
            store.mark_posted("other", posted).await,
            Err(StorageError::EntryNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_record_run() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let run = RunRecord::start().finish(RunStats {
            clips_accepted: 2,
            ..Default::default()
        });
        store.record_run(run.clone()).await.unwrap();

        let doc = store.verify().await.unwrap();
        assert_eq!(doc.runs, vec![run]);
    }

    #[tokio::test]
    async fn test_unwritable_path_is_fatal() {
        let dir = TempDir::new().unwrap();
        // A regular file where the parent directory should be.
        let blocker = dir.path().join("public");
        tokio::fs::write(&blocker, b"x").await.unwrap();
        let store = ClipStore::new(blocker.join("mags-log.json"));

        let err = store.append(record("a.mp4", 0.0, 5.0)).await.unwrap_err();
        assert!(matches!(err, StorageError::WriteFailed { .. }));
    }
}
