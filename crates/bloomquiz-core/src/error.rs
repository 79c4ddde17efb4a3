//! Error types shared across the quiz core and its storage collaborators.
//!
//! `StoreError` is defined here rather than in `bloomquiz-store` so the
//! leaderboard service can classify storage failures without depending on any
//! particular backend.

use thiserror::Error;

use crate::engine::Phase;

/// A transition was requested outside the phase that allows it.
///
/// These are caller contract violations. The state is left untouched and the
/// call must not be retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// `answer` or `next_question` was called while the game was not being played.
    #[error("cannot {action} while the game is {phase}")]
    NotPlaying { action: &'static str, phase: Phase },
}

/// A leaderboard submission did not match the wire contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// The body was not a JSON object.
    #[error("submission must be a JSON object")]
    NotAnObject,

    /// A required field is absent.
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    /// A required field has the wrong JSON type.
    #[error("field `{field}` must be a {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
}

/// Errors raised by a leaderboard storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be reached (connection refused, DNS, ...).
    #[error("leaderboard store unavailable: {0}")]
    Unavailable(String),

    /// The request timed out.
    #[error("leaderboard request timed out after {0}s")]
    Timeout(u64),

    /// The backend refused the entry as malformed.
    #[error("leaderboard store rejected the entry: {0}")]
    Rejected(String),

    /// The backend answered with an unexpected status.
    #[error("leaderboard API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Local persistence failed.
    #[error("leaderboard file error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored or received data could not be (de)serialized.
    #[error("leaderboard data is malformed: {0}")]
    Malformed(String),
}

impl StoreError {
    /// Returns `true` if the same request may succeed when tried again later.
    pub fn is_retryable(&self) -> bool {
        match self {
            StoreError::Unavailable(_) | StoreError::Timeout(_) | StoreError::Io(_) => true,
            StoreError::Api { status, .. } => *status >= 500 || *status == 429,
            StoreError::Rejected(_) | StoreError::Malformed(_) => false,
        }
    }
}

/// Why a leaderboard submission did not land.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("invalid submission: {0}")]
    Invalid(#[from] SubmissionError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SubmitError {
    /// Returns `true` if the user may retry the save action.
    pub fn is_retryable(&self) -> bool {
        match self {
            SubmitError::Invalid(_) => false,
            SubmitError::Store(e) => e.is_retryable(),
        }
    }
}
