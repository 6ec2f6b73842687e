//! Composition of the store, settings, sync channel and restore workflow.
use crate::backup::BackupPayload;
use crate::calendar::today_offset;
use crate::config::EngineConfig;
use crate::error::{RemoteError, RestoreError, StoreError};
use crate::record::{DayOffset, Outcome};
use crate::remote::{LeaderboardRow, SyncDetails};
use crate::restore::{RecordComparison, RestoreWorkflow};
use crate::settings::SettingsStore;
use crate::share::{ShareResult, parse_share_text};
use crate::store::ScoreStore;
use crate::sync::{RemotePusher, SyncStatus, SyncStatusChannel};
use crate::{Clock, DurableStorage, RemoteScores, TextSource};
use futures::task::LocalSpawn;
use std::rc::Rc;

/// Main engine managing one user's scores
pub struct ScoreEngine<S: DurableStorage> {
    config: EngineConfig,
    clock: Rc<dyn Clock>,
    scores: ScoreStore<S>,
    settings: SettingsStore<S>,
    channel: SyncStatusChannel,
    remote: Option<Rc<dyn RemoteScores>>,
    restore: RestoreWorkflow,
}

impl<S: DurableStorage> ScoreEngine<S> {
    /// Load the record and settings from `storage`. The engine works fully
    /// offline until [`with_remote`](Self::with_remote) is called.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the storage cannot be read.
    pub fn open(storage: S, clock: Rc<dyn Clock>, config: EngineConfig) -> Result<Self, StoreError> {
        let storage = Rc::new(storage);
        let scores = ScoreStore::open(Rc::clone(&storage), &config)?;
        let settings = SettingsStore::open(storage, &config)?;
        let channel = SyncStatusChannel::new(Rc::clone(&clock), config.sync_display_window());
        Ok(Self {
            config,
            clock,
            scores,
            settings,
            channel,
            remote: None,
            restore: RestoreWorkflow::new(),
        })
    }

    /// Push every committed record to `remote`, spawning requests on `spawner`.
    #[must_use]
    pub fn with_remote(mut self, remote: Rc<dyn RemoteScores>, spawner: Rc<dyn LocalSpawn>) -> Self {
        let pusher = RemotePusher::new(
            Rc::clone(&remote),
            spawner,
            self.channel.clone(),
            self.settings.get().sync_details,
        );
        self.scores.attach_pusher(pusher);
        self.remote = Some(remote);
        self
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub const fn scores(&self) -> &ScoreStore<S> {
        &self.scores
    }

    #[must_use]
    pub const fn settings(&self) -> &SettingsStore<S> {
        &self.settings
    }

    #[must_use]
    pub const fn sync_channel(&self) -> &SyncStatusChannel {
        &self.channel
    }

    #[must_use]
    pub fn sync_status(&self) -> SyncStatus {
        self.channel.status()
    }

    #[must_use]
    pub const fn restore(&self) -> &RestoreWorkflow {
        &self.restore
    }

    #[must_use]
    pub fn today(&self) -> DayOffset {
        today_offset(self.clock.as_ref())
    }

    /// Record today's outcome.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the record cannot be persisted.
    pub fn set_today(&self, outcome: Outcome) -> Result<DayOffset, StoreError> {
        let day = self.today();
        self.scores.set_day(day, outcome)?;
        Ok(day)
    }

    /// Record a result pasted from Wordle's share text. Results for future
    /// days are ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the record cannot be persisted.
    pub fn record_share_text(&self, text: &str) -> Result<Option<ShareResult>, StoreError> {
        let Some(result) = parse_share_text(text) else {
            return Ok(None);
        };
        if result.day > self.today() {
            log::warn!("ignoring shared result for future day {}", result.day);
            return Ok(None);
        }
        self.scores.set_day(result.day, result.outcome)?;
        Ok(Some(result))
    }

    #[must_use]
    pub fn sync_details(&self) -> SyncDetails {
        self.settings.get().sync_details
    }

    /// Sync is possible when a remote is attached and credentials are set.
    #[must_use]
    pub fn can_sync(&self) -> bool {
        self.remote.is_some() && self.sync_details().is_configured()
    }

    /// Persist new credentials and push the current record with them.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the settings cannot be persisted.
    pub fn set_sync_details(&self, details: SyncDetails) -> Result<(), StoreError> {
        self.settings
            .update(|settings| settings.sync_details = details.clone())?;
        if let Some(pusher) = self.scores.pusher() {
            pusher.set_details(details);
        }
        self.scores.push_now();
        Ok(())
    }

    #[must_use]
    pub fn backup(&self) -> BackupPayload {
        self.scores.backup()
    }

    /// # Errors
    ///
    /// Returns [`RestoreError::Busy`] unless the restore workflow is idle.
    pub async fn restore_from_clipboard(&self, clipboard: &dyn TextSource) -> Result<(), RestoreError> {
        self.restore.request_from_clipboard(clipboard).await
    }

    /// # Errors
    ///
    /// Returns [`RestoreError::Busy`] unless the restore workflow is idle.
    pub async fn restore_from_file(&self, file: &dyn TextSource) -> Result<(), RestoreError> {
        self.restore.request_from_file(file).await
    }

    /// # Errors
    ///
    /// Returns [`RestoreError::Busy`] unless the restore workflow is idle.
    pub async fn restore_from_remote(&self) -> Result<(), RestoreError> {
        let details = self.sync_details();
        match &self.remote {
            Some(remote) => self.restore.request_from_remote(remote.as_ref(), &details).await,
            None => self.restore.request_from_remote(&Offline, &details).await,
        }
    }

    #[must_use]
    pub fn restore_comparison(&self) -> Option<RecordComparison> {
        self.restore.comparison(&self.scores.get())
    }

    /// # Errors
    ///
    /// See [`RestoreWorkflow::confirm`].
    pub fn confirm_restore(&self) -> Result<(), RestoreError> {
        self.restore.confirm(&self.scores)
    }

    pub fn reset_restore(&self) {
        self.restore.reset();
    }

    /// Everyone's standing, fetched from the remote service.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`] when sync is not possible or the fetch fails.
    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardRow>, RemoteError> {
        let details = self.sync_details();
        let remote = self.remote.as_ref().ok_or(RemoteError::NotConfigured)?;
        if !details.is_configured() {
            return Err(RemoteError::NotConfigured);
        }
        Ok(remote.fetch_all(&details).await?.leaderboard())
    }
}

/// Stand-in remote for engines opened without one.
struct Offline;

#[async_trait::async_trait(?Send)]
impl RemoteScores for Offline {
    async fn fetch_all(&self, _details: &SyncDetails) -> Result<crate::AllScores, RemoteError> {
        Err(RemoteError::NotConfigured)
    }

    async fn push(&self, _details: &SyncDetails, _record: &crate::ScoreRecord) -> Result<(), RemoteError> {
        Err(RemoteError::NotConfigured)
    }
}
