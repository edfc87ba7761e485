//! Completed-download cache.
//!
//! Background download workers drop finished payloads here; the frame thread
//! takes them out when it needs them. Anything nobody claimed is evicted by
//! the maintenance sweep so abandoned skins and texture packs do not pile up.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// A finished download waiting to be claimed.
#[derive(Clone, Debug)]
pub struct DownloadedItem {
    /// Raw payload.
    pub data: Vec<u8>,
    /// When the item landed in the cache.
    pub time_added: Instant,
}

/// Thread-safe cache of finished downloads, keyed by request identifier.
///
/// Cloning shares the same underlying cache.
#[derive(Clone, Debug, Default)]
pub struct DownloadCache {
    entries: Arc<Mutex<HashMap<String, DownloadedItem>>>,
}

impl DownloadCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a finished download, replacing any previous one with the same id.
    pub fn add(&self, identifier: impl Into<String>, data: Vec<u8>) {
        self.add_at(identifier, data, Instant::now());
    }

    /// Stores a finished download with an explicit arrival time.
    pub fn add_at(&self, identifier: impl Into<String>, data: Vec<u8>, time_added: Instant) {
        self.entries
            .lock()
            .insert(identifier.into(), DownloadedItem { data, time_added });
    }

    /// Removes and returns the download for `identifier`, if it arrived.
    #[must_use]
    pub fn try_take(&self, identifier: &str) -> Option<DownloadedItem> {
        self.entries.lock().remove(identifier)
    }

    /// Evicts entries older than `max_age_secs`. Returns how many were dropped.
    pub fn purge_old_entries(&self, max_age_secs: f64) -> usize {
        self.purge_older_than(Instant::now(), max_age_secs)
    }

    /// Evicts entries older than `max_age_secs` as of `now`.
    pub fn purge_older_than(&self, now: Instant, max_age_secs: f64) -> usize {
        let max_age = Duration::from_secs_f64(max_age_secs.max(0.0));
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, item| now.saturating_duration_since(item.time_added) <= max_age);
        let purged = before - entries.len();
        if purged > 0 {
            tracing::debug!("purged {} stale downloads", purged);
        }
        purged
    }

    /// Drops everything.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Number of unclaimed downloads.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true if nothing is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
