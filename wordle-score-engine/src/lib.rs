//! Wordle Score Engine
//!
//! Platform-agnostic core for tracking daily Wordle outcomes: the cumulative
//! scoring algorithm, a persistent score store, backup/restore with a
//! compare-before-commit step, and remote sync status tracking.
//! Platform specifics (durable storage, clipboard, files, network, time) are
//! reached through the traits defined here.

pub mod backup;
pub mod calendar;
pub mod config;
pub mod engine;
pub mod error;
pub mod numbers;
pub mod observe;
pub mod record;
pub mod remote;
pub mod restore;
pub mod score;
pub mod settings;
pub mod share;
pub mod store;
pub mod sync;

// Re-export commonly used types
pub use backup::{BackupPayload, decode, encode, validate};
pub use calendar::{SystemClock, day_offset_for, today_offset};
pub use config::EngineConfig;
pub use engine::ScoreEngine;
pub use error::{
    BackupError, OutcomeError, RemoteError, RestoreError, SourceError, StoreError,
    ValidationError,
};
pub use observe::SubscriptionId;
pub use record::{Attempts, DayOffset, FAIL_SENTINEL, Outcome, ScoreRecord};
pub use remote::{AllScores, LeaderboardRow, PushBody, SyncDetails};
pub use restore::{
    DayComparison, RecordComparison, RestoreCandidate, RestoreFailure, RestoreOrigin,
    RestoreState, RestoreWorkflow,
};
pub use score::{PersonScore, ScoreRenderData, compute_score};
pub use settings::{Settings, SettingsStore, Theme};
pub use share::{ShareResult, parse_share_text};
pub use store::ScoreStore;
pub use sync::{PushTicket, RemotePusher, SyncStatus, SyncStatusChannel};

use async_trait::async_trait;
use chrono::NaiveDate;

/// Synchronous key-value persistence (browser `localStorage` or similar).
/// Platform-specific implementations should provide this
pub trait DurableStorage {
    type Error: std::error::Error + 'static;

    /// Read the raw value stored under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be accessed.
    fn read(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Durably write `value` under `key` before returning
    ///
    /// # Errors
    ///
    /// Returns an error if the value could not be stored, e.g. when the quota
    /// is exhausted.
    fn write(&self, key: &str, value: &str) -> Result<(), Self::Error>;
}

/// Source of wall-clock time and the user's local calendar date.
pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64;

    /// Today's date in the user's local time zone.
    fn today(&self) -> NaiveDate;
}

/// Contract of the remote score service.
#[async_trait(?Send)]
pub trait RemoteScores {
    /// Fetch every known user's record (`GET /scores`).
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`] on network failure, rejection or an
    /// unreadable response.
    async fn fetch_all(&self, details: &SyncDetails) -> Result<AllScores, RemoteError>;

    /// Store `record` as the caller's own record.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`] on network failure or rejection.
    async fn push(&self, details: &SyncDetails, record: &ScoreRecord) -> Result<(), RemoteError>;
}

/// Something a backup can be read from: the clipboard or a chosen file.
#[async_trait(?Send)]
pub trait TextSource {
    /// Read the whole text content.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] if the content cannot be read.
    async fn read_text(&self) -> Result<String, SourceError>;
}
