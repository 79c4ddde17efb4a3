//! In-memory leaderboard store, for tests and offline play.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use bloomquiz_core::error::StoreError;
use bloomquiz_core::leaderboard::{retain_newest, LeaderboardEntry, RETENTION_CAP};
use bloomquiz_core::traits::LeaderboardStore;

/// A leaderboard that lives as long as the process.
pub struct MemoryStore {
    entries: Mutex<Vec<LeaderboardEntry>>,
    retention_cap: usize,
    /// Number of appends made.
    append_count: AtomicU32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_entries(Vec::new())
    }

    /// Start from an existing set of entries, newest submission first.
    pub fn with_entries(entries: Vec<LeaderboardEntry>) -> Self {
        Self {
            entries: Mutex::new(entries),
            retention_cap: RETENTION_CAP,
            append_count: AtomicU32::new(0),
        }
    }

    pub fn with_retention_cap(mut self, retention_cap: usize) -> Self {
        self.retention_cap = retention_cap;
        self
    }

    /// Get the number of appends made to this store.
    pub fn append_count(&self) -> u32 {
        self.append_count.load(Ordering::Relaxed)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<LeaderboardEntry>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LeaderboardStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn list_entries(&self) -> Result<Vec<LeaderboardEntry>, StoreError> {
        Ok(self.lock()?.clone())
    }

    async fn append_entry(&self, entry: &LeaderboardEntry) -> Result<(), StoreError> {
        let mut entries = self.lock()?;
        entries.insert(0, entry.clone());
        let kept = retain_newest(std::mem::take(&mut *entries), self.retention_cap);
        *entries = kept;
        self.append_count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
