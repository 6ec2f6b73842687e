//! Error types shared across the engine.

use crate::record::DayOffset;
use thiserror::Error;

/// A value that is neither an attempt count in `1..=6` nor the fail sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid outcome `{0}`, expected 1-6 or \"X\"")]
pub struct OutcomeError(pub String);

/// Structural problems found in an untrusted backup payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("backup must be an object of day -> outcome, found {found}")]
    NotAnObject { found: &'static str },
    #[error("`{key}` is not a valid day offset")]
    InvalidDay { key: String },
    #[error("day {day} has an invalid outcome: {source}")]
    InvalidOutcome {
        day: DayOffset,
        #[source]
        source: OutcomeError,
    },
}

/// Failure to turn backup text into a [`ScoreRecord`](crate::ScoreRecord).
#[derive(Debug, Error)]
pub enum BackupError {
    #[error("malformed JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Failure of a local mutation. The in-memory state is untouched when returned.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to persist `{key}`: {source}")]
    Persistence {
        key: String,
        #[source]
        source: Box<dyn std::error::Error + 'static>,
    },
    #[error("failed to serialize `{key}`: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Anything that went wrong talking to the remote score service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("sync details are not configured")]
    NotConfigured,
    #[error("network error: {0}")]
    Network(String),
    #[error("request rejected with status {status}")]
    Rejected { status: u16 },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("no server data saved for `{user}`")]
    NoSavedData { user: String },
}

/// A clipboard or file could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct SourceError(pub String);

/// Misuse of the restore workflow, or a commit that could not be persisted.
#[derive(Debug, Error)]
pub enum RestoreError {
    #[error("a restore is already {state}; reset it first")]
    Busy { state: &'static str },
    #[error("there is no restore candidate to confirm")]
    NothingToConfirm,
    #[error("restore could not be committed: {0}")]
    Commit(#[from] StoreError),
}
