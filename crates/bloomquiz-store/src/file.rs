//! JSON file leaderboard store.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fs4::fs_std::FileExt;
use tempfile::NamedTempFile;
use tracing::instrument;

use bloomquiz_core::error::StoreError;
use bloomquiz_core::leaderboard::{retain_newest, LeaderboardEntry, RETENTION_CAP};
use bloomquiz_core::traits::LeaderboardStore;

use crate::records::decode_entries;

/// Leaderboard kept as a JSON array in a local file, newest entries first.
///
/// A missing file reads as an empty board. Appends hold an exclusive lock on
/// a sibling `.lock` file for the whole read-modify-write, so several
/// processes can share one board. The new content is written to a uniquely
/// named temporary file and renamed over the board.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    retention_cap: usize,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            retention_cap: RETENTION_CAP,
        }
    }

    pub fn with_retention_cap(mut self, retention_cap: usize) -> Self {
        self.retention_cap = retention_cap;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        let mut lock = self.path.clone().into_os_string();
        lock.push(".lock");
        PathBuf::from(lock)
    }

    fn parent_dir(&self) -> &Path {
        self.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
    }

    fn read_entries(&self) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let source = self.path.display().to_string();
        let raw = serde_json::from_str(&content)
            .map_err(|e| StoreError::Malformed(format!("{source}: {e}")))?;
        decode_entries(raw, &source)
    }

    fn write_entries(&self, entries: &[LeaderboardEntry]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| StoreError::Malformed(e.to_string()))?;

        let mut tmp = NamedTempFile::new_in(self.parent_dir())?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    /// Blocking append; the lock is released when `lock` is dropped.
    fn append_locked(&self, entry: &LeaderboardEntry) -> Result<usize, StoreError> {
        std::fs::create_dir_all(self.parent_dir())?;
        let lock: File = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path())?;
        lock.lock_exclusive()?;

        let mut entries = self.read_entries()?;
        entries.insert(0, entry.clone());
        let entries = retain_newest(entries, self.retention_cap);
        self.write_entries(&entries)?;
        Ok(entries.len())
    }
}

#[async_trait]
impl LeaderboardStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn list_entries(&self) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.read_entries())
            .await
            .map_err(|e| StoreError::Unavailable(format!("file store task failed: {e}")))?
    }

    #[instrument(skip(self, entry), fields(path = %self.path.display()))]
    async fn append_entry(&self, entry: &LeaderboardEntry) -> Result<(), StoreError> {
        let store = self.clone();
        let entry = entry.clone();
        let stored = tokio::task::spawn_blocking(move || store.append_locked(&entry))
            .await
            .map_err(|e| StoreError::Unavailable(format!("file store task failed: {e}")))??;

        tracing::debug!(stored, "leaderboard file updated");
        Ok(())
    }
}
