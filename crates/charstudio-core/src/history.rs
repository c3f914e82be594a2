//! Generation history.
//!
//! An append-at-head log of completed generations. Items are created
//! the moment an image part arrives from the model and are immutable
//! afterwards; the only mutations the log supports are single deletion
//! and bulk clear. Serializes to JSON for `localStorage` persistence.

use serde::{Deserialize, Serialize};
use web_time::{SystemTime, UNIX_EPOCH};

use crate::types::AspectRatio;

/// Lifecycle state of a history item. Items only ever enter the log
/// completed; the field exists in the persisted shape so future states
/// can be added without a migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryStatus {
    /// The image arrived and the entry is final.
    #[default]
    Completed,
}

/// One generated image, recorded at the instant it arrived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    /// Unique id: creation millis plus a per-log sequence suffix.
    pub id: String,
    /// The generated image as a data URI.
    pub image: String,
    /// The prompt that produced it. Mask edits carry an
    /// ` (edit: …)` suffix describing the edit.
    pub prompt: String,
    /// The aspect ratio that was requested.
    pub aspect_ratio: AspectRatio,
    /// Lifecycle state.
    #[serde(default)]
    pub status: HistoryStatus,
}

/// Newest-first log of generated images.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryLog {
    items: Vec<HistoryItem>,
    #[serde(default, skip_serializing)]
    next_sequence: u64,
}

impl HistoryLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly generated image at the head of the log.
    ///
    /// The id combines wall-clock millis with a per-log sequence
    /// number, so multiple image parts recorded from one response get
    /// distinct ids even within the same millisecond.
    pub fn record(&mut self, image: String, prompt: String, aspect_ratio: AspectRatio) {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis());
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.wrapping_add(1);
        self.prepend(HistoryItem {
            id: format!("{millis}-{sequence}"),
            image,
            prompt,
            aspect_ratio,
            status: HistoryStatus::Completed,
        });
    }

    /// Insert an already-built item at the head.
    pub fn prepend(&mut self, item: HistoryItem) {
        self.items.insert(0, item);
    }

    /// Fold a scratch log onto the head of this one, preserving the
    /// scratch log's newest-first order. Items recorded while a round
    /// trip was in flight land on top of whatever the log holds *now*,
    /// so deletions made in the meantime survive instead of being
    /// overwritten by a stale snapshot.
    pub fn absorb(&mut self, newer: Self) {
        for item in newer.items.into_iter().rev() {
            self.prepend(item);
        }
    }

    /// All items, newest first.
    #[must_use]
    pub fn list_all(&self) -> &[HistoryItem] {
        &self.items
    }

    /// Look up an item by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&HistoryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Delete one item by id. Returns whether anything was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Number of items in the log.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the log holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn record_prepends_newest_first() {
        let mut log = HistoryLog::new();
        log.record("data:a".into(), "first".into(), AspectRatio::Square);
        log.record("data:b".into(), "second".into(), AspectRatio::Widescreen);
        let items = log.list_all();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].prompt, "second");
        assert_eq!(items[1].prompt, "first");
    }

    #[test]
    fn ids_are_unique_within_a_burst() {
        // Several records inside the same millisecond must still get
        // distinct ids, via the sequence suffix.
        let mut log = HistoryLog::new();
        for i in 0..20 {
            log.record("data:x".into(), format!("p{i}"), AspectRatio::Square);
        }
        let mut ids: Vec<&str> = log.list_all().iter().map(|i| i.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 20);
    }

    #[test]
    fn delete_removes_exactly_one() {
        let mut log = HistoryLog::new();
        log.record("data:a".into(), "keep".into(), AspectRatio::Square);
        log.record("data:b".into(), "drop".into(), AspectRatio::Square);
        let id = log.list_all()[0].id.clone();
        assert!(log.delete(&id));
        assert!(!log.delete(&id));
        assert_eq!(log.len(), 1);
        assert_eq!(log.list_all()[0].prompt, "keep");
    }

    #[test]
    fn absorb_keeps_deletions_made_while_recording_elsewhere() {
        let mut live = HistoryLog::new();
        live.record("data:a".into(), "old".into(), AspectRatio::Square);
        live.record("data:b".into(), "doomed".into(), AspectRatio::Square);

        // New items accumulate in a scratch log while the user deletes
        // from the live one.
        let mut scratch = HistoryLog::new();
        scratch.record("data:c".into(), "fresh-1".into(), AspectRatio::Square);
        scratch.record("data:d".into(), "fresh-2".into(), AspectRatio::Square);
        let doomed = live.list_all()[0].id.clone();
        assert!(live.delete(&doomed));

        live.absorb(scratch);
        let prompts: Vec<&str> = live.list_all().iter().map(|i| i.prompt.as_str()).collect();
        assert_eq!(prompts, vec!["fresh-2", "fresh-1", "old"]);
    }

    #[test]
    fn absorb_onto_a_cleared_log_keeps_only_the_new_items() {
        let mut live = HistoryLog::new();
        live.record("data:a".into(), "old".into(), AspectRatio::Square);

        let mut scratch = HistoryLog::new();
        scratch.record("data:b".into(), "fresh".into(), AspectRatio::Square);
        live.clear();

        live.absorb(scratch);
        assert_eq!(live.len(), 1);
        assert_eq!(live.list_all()[0].prompt, "fresh");
    }

    #[test]
    fn clear_empties_the_log() {
        let mut log = HistoryLog::new();
        log.record("data:a".into(), "x".into(), AspectRatio::Portrait);
        log.clear();
        assert!(log.is_empty());
        assert!(log.get("anything").is_none());
    }

    #[test]
    fn get_finds_by_id() {
        let mut log = HistoryLog::new();
        log.record("data:a".into(), "wanted".into(), AspectRatio::Anamorphic);
        let id = log.list_all()[0].id.clone();
        assert_eq!(log.get(&id).unwrap().prompt, "wanted");
    }

    #[test]
    fn serde_round_trip_preserves_items_and_order() {
        let mut log = HistoryLog::new();
        log.record("data:a".into(), "one".into(), AspectRatio::Square);
        log.record("data:b".into(), "two".into(), AspectRatio::Widescreen);
        let json = serde_json::to_string(&log).unwrap();
        let back: HistoryLog = serde_json::from_str(&json).unwrap();
        assert_eq!(back.list_all(), log.list_all());
    }

    #[test]
    fn deserializes_items_missing_a_status_field() {
        // Persisted logs from before the status field was stored.
        let json = r#"{"items":[{"id":"1-0","image":"data:a","prompt":"p","aspect_ratio":"Square"}]}"#;
        let log: HistoryLog = serde_json::from_str(json).unwrap();
        assert_eq!(log.list_all()[0].status, HistoryStatus::Completed);
    }
}
