//! Leaderboard service: ranking rules bound to a storage backend.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::SubmitError;
use crate::leaderboard::{
    self, normalize_entry, LeaderboardEntry, Submission, DEFAULT_DISPLAY_CAP,
};
use crate::traits::LeaderboardStore;

/// Ranked access to a shared leaderboard.
pub struct LeaderboardService {
    store: Arc<dyn LeaderboardStore>,
    display_cap: usize,
}

impl LeaderboardService {
    pub fn new(store: Arc<dyn LeaderboardStore>) -> Self {
        Self {
            store,
            display_cap: DEFAULT_DISPLAY_CAP,
        }
    }

    pub fn with_display_cap(mut self, display_cap: usize) -> Self {
        self.display_cap = display_cap;
        self
    }

    pub fn display_cap(&self) -> usize {
        self.display_cap
    }

    /// Name of the underlying backend.
    pub fn store_name(&self) -> &str {
        self.store.name()
    }

    /// The ranked, display-capped leaderboard.
    ///
    /// An unreachable store yields an empty board rather than an error, so a
    /// broken backend never takes the rest of the game down with it.
    pub async fn top(&self) -> Vec<LeaderboardEntry> {
        match self.store.list_entries().await {
            Ok(entries) => leaderboard::top(entries, self.display_cap),
            Err(e) => {
                tracing::warn!(store = self.store.name(), "leaderboard read failed: {e}");
                Vec::new()
            }
        }
    }

    /// Validate a raw JSON body, then store it.
    pub async fn submit_json(
        &self,
        body: &Value,
        now: DateTime<Utc>,
    ) -> Result<LeaderboardEntry, SubmitError> {
        let submission = Submission::from_json(body)?;
        self.submit(&submission, now).await
    }

    /// Normalize and store a submission. Returns the entry as stored.
    pub async fn submit(
        &self,
        submission: &Submission,
        now: DateTime<Utc>,
    ) -> Result<LeaderboardEntry, SubmitError> {
        let entry = normalize_entry(submission, now);
        if let Err(e) = self.store.append_entry(&entry).await {
            tracing::error!(
                store = self.store.name(),
                retryable = e.is_retryable(),
                "leaderboard write failed: {e}"
            );
            return Err(e.into());
        }
        tracing::info!(name = %entry.name, score = entry.score, "leaderboard entry saved");
        Ok(entry)
    }

    /// Whether `score` would currently make the displayed board.
    pub async fn is_eligible(&self, score: u64) -> bool {
        let current = self.top().await;
        leaderboard::is_eligible(score, &current, self.display_cap)
    }

    /// 1-based position `score` would take on the displayed board, if any.
    ///
    /// Ties are placed below existing entries with the same score.
    pub async fn rank_of(&self, score: u64) -> Option<usize> {
        let current = self.top().await;
        let position = current.iter().take_while(|e| e.score >= score).count();
        (position < self.display_cap).then_some(position + 1)
    }
}
