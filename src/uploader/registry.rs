//! Shared registry of in-flight uploads.
//!
//! The registry is the only shared mutable state in the pipeline. The
//! orchestrator inserts a record when an upload becomes visible and
//! removes it on the terminal event; everything else reads ordered
//! snapshots. Mutation goes through the methods here, nowhere else.

use indexmap::IndexMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use super::types::UploadRecord;

/// Clonable handle to the process-wide upload record store. Records keep
/// insertion order, which is the order the UI lists them in.
#[derive(Clone, Default)]
pub struct UploadRegistry {
    records: Arc<Mutex<IndexMap<Uuid, UploadRecord>>>,
}

impl UploadRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record.
    pub fn insert(&self, record: UploadRecord) {
        if let Ok(mut records) = self.records.lock() {
            records.insert(record.id, record);
        }
    }

    /// Remove the record with exactly this id, preserving the order of
    /// the remaining records. No-op for ids that are not present, so
    /// racing completions can never evict another upload's record.
    pub fn remove(&self, id: Uuid) -> Option<UploadRecord> {
        self.records.lock().ok()?.shift_remove(&id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.records
            .lock()
            .map(|records| records.contains_key(&id))
            .unwrap_or(false)
    }

    /// Record a length-computable progress event. `progress_loaded`
    /// never moves backwards; a late or reordered event cannot shrink an
    /// already observed value.
    pub fn update_progress(&self, id: Uuid, loaded: u64, total: u64) {
        if let Ok(mut records) = self.records.lock() {
            if let Some(record) = records.get_mut(&id) {
                record.progress_total = Some(total);
                record.progress_loaded =
                    Some(record.progress_loaded.map_or(loaded, |prev| prev.max(loaded)));
            }
        }
    }

    /// Rewrite the display name after a container-changing transcode.
    pub fn rename(&self, id: Uuid, name: String) {
        if let Ok(mut records) = self.records.lock() {
            if let Some(record) = records.get_mut(&id) {
                record.name = name;
            }
        }
    }

    /// Ordered snapshot for UI consumption.
    pub fn snapshot(&self) -> Vec<UploadRecord> {
        self.records
            .lock()
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use url::Url;

    fn test_record(name: &str) -> UploadRecord {
        UploadRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            progress_total: None,
            progress_loaded: None,
            preview_url: Url::parse("file:///tmp/preview.png").unwrap(),
            queued_at: Utc::now(),
        }
    }

    #[test]
    fn test_insertion_order_preserved() {
        let registry = UploadRegistry::new();
        registry.insert(test_record("first"));
        registry.insert(test_record("second"));
        registry.insert(test_record("third"));

        let names: Vec<String> = registry
            .snapshot()
            .into_iter()
            .map(|record| record.name)
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_remove_is_exact_and_order_preserving() {
        let registry = UploadRegistry::new();
        let a = test_record("a");
        let b = test_record("b");
        let c = test_record("c");
        let b_id = b.id;
        registry.insert(a);
        registry.insert(b);
        registry.insert(c);

        let removed = registry.remove(b_id).unwrap();
        assert_eq!(removed.name, "b");
        assert!(!registry.contains(b_id));

        let names: Vec<String> = registry
            .snapshot()
            .into_iter()
            .map(|record| record.name)
            .collect();
        assert_eq!(names, vec!["a", "c"]);

        // A second removal of the same id is a no-op
        assert!(registry.remove(b_id).is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let registry = UploadRegistry::new();
        registry.insert(test_record("only"));
        assert!(registry.remove(Uuid::new_v4()).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_progress_is_monotonic() {
        let registry = UploadRegistry::new();
        let record = test_record("file");
        let id = record.id;
        registry.insert(record);

        registry.update_progress(id, 10, 100);
        registry.update_progress(id, 40, 100);
        // A stale event must not move progress backwards
        registry.update_progress(id, 25, 100);

        let snapshot = registry.snapshot();
        assert_eq!(snapshot[0].progress_loaded, Some(40));
        assert_eq!(snapshot[0].progress_total, Some(100));
    }

    #[test]
    fn test_progress_for_unknown_id_is_noop() {
        let registry = UploadRegistry::new();
        registry.update_progress(Uuid::new_v4(), 10, 100);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_rename() {
        let registry = UploadRegistry::new();
        let record = test_record("photo.webp");
        let id = record.id;
        registry.insert(record);

        registry.rename(id, "photo.webp.jpg".to_string());
        assert_eq!(registry.snapshot()[0].name, "photo.webp.jpg");
    }
}
