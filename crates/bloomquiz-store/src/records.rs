//! Decoding of raw leaderboard records.

use serde_json::Value;

use bloomquiz_core::error::StoreError;
use bloomquiz_core::leaderboard::LeaderboardEntry;

/// Decode a JSON array of records, skipping the ones that do not match the
/// entry schema (such as older `accuracy`/`time`/`level` records).
pub fn decode_entries(raw: Value, source: &str) -> Result<Vec<LeaderboardEntry>, StoreError> {
    let Value::Array(records) = raw else {
        return Err(StoreError::Malformed(format!(
            "{source}: expected a JSON array of entries"
        )));
    };

    let total = records.len();
    let entries: Vec<LeaderboardEntry> = records
        .into_iter()
        .enumerate()
        .filter_map(|(i, record)| match serde_json::from_value(record) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(source, record = i, "skipping leaderboard record: {e}");
                None
            }
        })
        .collect();

    if entries.len() < total {
        tracing::debug!(source, kept = entries.len(), total, "decoded leaderboard records");
    }
    Ok(entries)
}
