//! Leaderboard entries and the rules that order and bound them.
//!
//! Two independent limits apply:
//!
//! - the **retention cap** bounds storage by recency ([`retain_newest`]);
//! - the **display cap** bounds what players see by rank ([`truncate`] after
//!   [`rank`]).
//!
//! Stored collections are never assumed to be sorted; every read ranks again.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SubmissionError;

/// Raw submissions kept by storage, newest first.
pub const RETENTION_CAP: usize = 1000;

/// Entries shown by default.
pub const DEFAULT_DISPLAY_CAP: usize = 10;

/// Longest player name kept, in characters.
pub const NAME_MAX_CHARS: usize = 40;

/// Name given to submissions whose name is blank.
pub const DEFAULT_PLAYER_NAME: &str = "Anonyme";

/// One ranked result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u64,
    /// Share of correct answers, 0..=100.
    pub percent: f64,
    /// When the submission was received (milliseconds since the epoch on the wire).
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date: DateTime<Utc>,
}

/// A submission as it crosses the wire, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub name: String,
    pub score: f64,
    pub percent: f64,
}

impl Submission {
    pub fn new(name: impl Into<String>, score: f64, percent: f64) -> Self {
        Self {
            name: name.into(),
            score,
            percent,
        }
    }

    /// Check a JSON body against the submission contract.
    ///
    /// `name` must be a string, `score` and `percent` must be numbers.
    /// Extra fields are ignored.
    pub fn from_json(value: &Value) -> Result<Self, SubmissionError> {
        let object = value.as_object().ok_or(SubmissionError::NotAnObject)?;

        let field = |name: &'static str| {
            object
                .get(name)
                .filter(|v| !v.is_null())
                .ok_or(SubmissionError::MissingField(name))
        };
        let number = |name: &'static str| {
            field(name)?
                .as_f64()
                .ok_or(SubmissionError::WrongType {
                    field: name,
                    expected: "number",
                })
        };

        let name = field("name")?
            .as_str()
            .ok_or(SubmissionError::WrongType {
                field: "name",
                expected: "string",
            })?
            .to_string();

        Ok(Self {
            name,
            score: number("score")?,
            percent: number("percent")?,
        })
    }
}

/// Sanitize a submission into a storable entry stamped with `now`.
pub fn normalize_entry(submission: &Submission, now: DateTime<Utc>) -> LeaderboardEntry {
    let trimmed = submission.name.trim();
    let name: String = trimmed.chars().take(NAME_MAX_CHARS).collect();
    let name = if name.is_empty() {
        DEFAULT_PLAYER_NAME.to_string()
    } else {
        name
    };

    let score = if submission.score.is_finite() {
        submission.score.floor().max(0.0) as u64
    } else if submission.score == f64::INFINITY {
        u64::MAX
    } else {
        0
    };

    LeaderboardEntry {
        name,
        score,
        percent: clamp_percent(submission.percent),
        date: now,
    }
}

fn clamp_percent(percent: f64) -> f64 {
    if percent.is_nan() {
        return 0.0;
    }
    percent.clamp(0.0, 100.0)
}

/// Leaderboard order: score, then precision, then most recent first.
pub fn compare_entries(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| b.percent.total_cmp(&a.percent))
        .then_with(|| b.date.cmp(&a.date))
}

/// Sort entries into leaderboard order.
///
/// Entries equal on every key keep their relative input order, so ranking an
/// already ranked list changes nothing.
pub fn rank(mut entries: Vec<LeaderboardEntry>) -> Vec<LeaderboardEntry> {
    entries.sort_by(compare_entries);
    entries
}

/// Keep the first `n` entries.
pub fn truncate(mut entries: Vec<LeaderboardEntry>, n: usize) -> Vec<LeaderboardEntry> {
    entries.truncate(n);
    entries
}

/// Ranked, display-capped view of an unordered collection.
pub fn top(entries: Vec<LeaderboardEntry>, display_cap: usize) -> Vec<LeaderboardEntry> {
    truncate(rank(entries), display_cap)
}

/// Keep the `cap` most recent submissions, regardless of score.
///
/// `entries` must be in arrival order, newest first. Position decides, not
/// `date`, so an entry stamped by a clock that stepped backwards is still
/// kept as the newest.
pub fn retain_newest(mut entries: Vec<LeaderboardEntry>, cap: usize) -> Vec<LeaderboardEntry> {
    entries.truncate(cap);
    entries
}

/// Whether `score` would make it into `current_top`.
///
/// Advisory only, for deciding whether to offer a save action. What actually
/// appears is always decided by [`rank`] and [`truncate`].
pub fn is_eligible(score: u64, current_top: &[LeaderboardEntry], display_cap: usize) -> bool {
    if current_top.len() < display_cap {
        return true;
    }
    current_top
        .iter()
        .map(|e| e.score)
        .min()
        .map_or(true, |lowest| score > lowest)
}
