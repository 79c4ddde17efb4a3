//! Core trait definitions for leaderboard storage.
//!
//! Implemented by the `bloomquiz-store` crate (JSON file, remote API,
//! in-memory).

use async_trait::async_trait;

use crate::error::StoreError;
use crate::leaderboard::LeaderboardEntry;

/// Backend holding raw leaderboard submissions.
///
/// Backends make no ordering or uniqueness promises: `list_entries` may return
/// entries in any order, including duplicates. Ranking is the caller's job.
#[async_trait]
pub trait LeaderboardStore: Send + Sync {
    /// Human-readable backend name (e.g. "file").
    fn name(&self) -> &str;

    /// Every entry the backend currently holds.
    async fn list_entries(&self) -> Result<Vec<LeaderboardEntry>, StoreError>;

    /// Append one already-normalized entry.
    ///
    /// The append and any retention trim happen atomically with respect to
    /// other appends on the same backend.
    async fn append_entry(&self, entry: &LeaderboardEntry) -> Result<(), StoreError>;
}
