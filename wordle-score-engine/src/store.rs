//! Persistent score record store.
//!
//! Every mutation is written to durable storage before it becomes visible in
//! memory, then handed to the [`RemotePusher`] (if one is attached) without
//! waiting for the network.

use crate::DurableStorage;
use crate::backup::{BackupPayload, decode, encode};
use crate::config::EngineConfig;
use crate::error::StoreError;
use crate::observe::{Observers, SubscriptionId};
use crate::record::{DayOffset, Outcome, ScoreRecord};
use crate::score::{PersonScore, compute_score};
use crate::sync::RemotePusher;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub struct ScoreStore<S: DurableStorage> {
    storage: Rc<S>,
    key: String,
    record: RefCell<ScoreRecord>,
    cached_score: Cell<Option<PersonScore>>,
    observers: Observers<ScoreRecord>,
    pusher: Option<RemotePusher>,
}

impl<S: DurableStorage> ScoreStore<S> {
    /// Load the record stored under the configured key. A stored value that
    /// is not a valid record is logged and treated as empty; it is only
    /// overwritten by the next mutation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] if the storage cannot be read.
    pub fn open(storage: Rc<S>, config: &EngineConfig) -> Result<Self, StoreError> {
        let key = config.record_key.clone();
        let raw = storage.read(&key).map_err(|err| StoreError::Persistence {
            key: key.clone(),
            source: Box::new(err),
        })?;
        let record = match raw.as_deref().map(decode) {
            None => ScoreRecord::new(),
            Some(Ok(record)) => {
                log::debug!("loaded {} days from {key}", record.len());
                record
            }
            Some(Err(err)) => {
                log::warn!("ignoring unreadable record under {key}: {err}");
                ScoreRecord::new()
            }
        };
        Ok(Self {
            storage,
            key,
            record: RefCell::new(record),
            cached_score: Cell::new(None),
            observers: Observers::default(),
            pusher: None,
        })
    }

    pub fn attach_pusher(&mut self, pusher: RemotePusher) {
        self.pusher = Some(pusher);
    }

    #[must_use]
    pub const fn pusher(&self) -> Option<&RemotePusher> {
        self.pusher.as_ref()
    }

    /// Snapshot of the current record.
    #[must_use]
    pub fn get(&self) -> ScoreRecord {
        self.record.borrow().clone()
    }

    #[must_use]
    pub fn outcome(&self, day: DayOffset) -> Option<Outcome> {
        self.record.borrow().get(day)
    }

    /// Entries sorted ascending by day.
    #[must_use]
    pub fn entries(&self) -> Vec<(DayOffset, Outcome)> {
        self.record.borrow().entries().collect()
    }

    /// Cumulative score, computed once per record state.
    #[must_use]
    pub fn score(&self) -> PersonScore {
        if let Some(score) = self.cached_score.get() {
            return score;
        }
        let score = compute_score(&self.record.borrow());
        self.cached_score.set(Some(score));
        score
    }

    #[must_use]
    pub fn backup(&self) -> BackupPayload {
        encode(&self.record.borrow())
    }

    /// Upsert one day.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the new record cannot be persisted; the
    /// in-memory record is left unchanged.
    pub fn set_day(&self, day: DayOffset, outcome: Outcome) -> Result<(), StoreError> {
        let mut next = self.get();
        next.insert(day, outcome);
        self.commit(next)
    }

    /// Remove one day. Returns `false` without touching storage when the day
    /// was not recorded.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the new record cannot be persisted; the
    /// in-memory record is left unchanged.
    pub fn delete_day(&self, day: DayOffset) -> Result<bool, StoreError> {
        let mut next = self.get();
        if next.remove(day).is_none() {
            return Ok(false);
        }
        self.commit(next)?;
        Ok(true)
    }

    /// Discard the whole record in favour of `record`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the new record cannot be persisted; the
    /// in-memory record is left unchanged.
    pub fn replace_all(&self, record: ScoreRecord) -> Result<(), StoreError> {
        self.commit(record)
    }

    /// Send the current record to the remote service, e.g. after the sync
    /// details changed.
    pub fn push_now(&self) {
        if let Some(pusher) = &self.pusher {
            pusher.push(&self.get());
        }
    }

    pub fn subscribe(&self, listener: impl Fn(&ScoreRecord) + 'static) -> SubscriptionId {
        self.observers.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    fn commit(&self, next: ScoreRecord) -> Result<(), StoreError> {
        let payload = serde_json::to_string(&next).map_err(|source| StoreError::Serialize {
            key: self.key.clone(),
            source,
        })?;
        if let Err(err) = self.storage.write(&self.key, &payload) {
            log::error!("failed to persist {}: {err}", self.key);
            return Err(StoreError::Persistence {
                key: self.key.clone(),
                source: Box::new(err),
            });
        }

        log::debug!("persisted {} days to {}", next.len(), self.key);
        *self.record.borrow_mut() = next.clone();
        self.cached_score.set(None);
        self.observers.notify(&next);
        if let Some(pusher) = &self.pusher {
            pusher.push(&next);
        }
        Ok(())
    }
}
