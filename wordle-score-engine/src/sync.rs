//! Remote push and the sync status state machine.
//!
//! `idle -> loading -> {success, failed} -> idle`. Settled statuses read as
//! `idle` again once the display window has passed, and a new push moves
//! straight back to `loading`. Each push is tagged with a sequence number;
//! only the completion of the most recently issued push may settle the
//! status.

use crate::error::RemoteError;
use crate::observe::{Observers, SubscriptionId};
use crate::record::ScoreRecord;
use crate::remote::SyncDetails;
use crate::{Clock, RemoteScores};
use futures::task::{LocalSpawn, LocalSpawnExt};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Failed,
}

impl SyncStatus {
    /// Indicator text for the status.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Idle => "",
            Self::Loading => "Syncing your score",
            Self::Success => "Synced changes",
            Self::Failed => "Failed to sync - try reloading.",
        }
    }
}

/// Sequence number of an issued push.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PushTicket(u64);

#[derive(Debug, Default)]
struct ChannelState {
    issued: u64,
    status: SyncStatus,
    settled_at_ms: u64,
}

/// Observable sync status. Cloning shares the same underlying state.
#[derive(Clone)]
pub struct SyncStatusChannel {
    state: Rc<RefCell<ChannelState>>,
    observers: Rc<Observers<SyncStatus>>,
    clock: Rc<dyn Clock>,
    display_window_ms: u64,
}

impl SyncStatusChannel {
    #[must_use]
    pub fn new(clock: Rc<dyn Clock>, display_window: Duration) -> Self {
        Self {
            state: Rc::new(RefCell::new(ChannelState::default())),
            observers: Rc::new(Observers::default()),
            clock,
            display_window_ms: u64::try_from(display_window.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Current status, with settled statuses expired back to `idle`.
    #[must_use]
    pub fn status(&self) -> SyncStatus {
        let state = self.state.borrow();
        match state.status {
            SyncStatus::Success | SyncStatus::Failed
                if self.clock.now_ms().saturating_sub(state.settled_at_ms)
                    >= self.display_window_ms =>
            {
                SyncStatus::Idle
            }
            status => status,
        }
    }

    /// Issue a new push: the status becomes `loading` and every earlier
    /// ticket is superseded.
    pub fn begin_push(&self) -> PushTicket {
        let ticket = {
            let mut state = self.state.borrow_mut();
            state.issued += 1;
            state.status = SyncStatus::Loading;
            PushTicket(state.issued)
        };
        self.observers.notify(&SyncStatus::Loading);
        ticket
    }

    /// Settle the push identified by `ticket`. Returns `false`, leaving the
    /// status untouched, when a newer push has been issued since.
    pub fn complete(&self, ticket: PushTicket, result: &Result<(), RemoteError>) -> bool {
        let status = {
            let mut state = self.state.borrow_mut();
            if ticket.0 != state.issued {
                log::debug!(
                    "dropping stale push completion #{} (latest #{})",
                    ticket.0,
                    state.issued
                );
                return false;
            }
            state.status = if result.is_ok() {
                SyncStatus::Success
            } else {
                SyncStatus::Failed
            };
            state.settled_at_ms = self.clock.now_ms();
            state.status
        };
        self.observers.notify(&status);
        true
    }

    /// Most recently issued ticket, if any push was ever started.
    #[must_use]
    pub fn latest_ticket(&self) -> Option<PushTicket> {
        let issued = self.state.borrow().issued;
        (issued > 0).then_some(PushTicket(issued))
    }

    /// Called on `loading` and on every settle. The expiry back to `idle` is
    /// not announced; read [`status`](Self::status) after the display window.
    pub fn subscribe(&self, listener: impl Fn(&SyncStatus) + 'static) -> SubscriptionId {
        self.observers.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }
}

#[derive(Default)]
struct PushQueue {
    pending: Option<(PushTicket, ScoreRecord)>,
    in_flight: bool,
}

struct PusherInner {
    remote: Rc<dyn RemoteScores>,
    spawner: Rc<dyn LocalSpawn>,
    channel: SyncStatusChannel,
    details: RefCell<SyncDetails>,
    queue: RefCell<PushQueue>,
}

/// Sends the latest record to the remote service without blocking the caller.
///
/// At most one request is in flight. Records arriving meanwhile replace the
/// queued one, and the newest is sent once the current request finishes.
#[derive(Clone)]
pub struct RemotePusher {
    inner: Rc<PusherInner>,
}

impl RemotePusher {
    #[must_use]
    pub fn new(
        remote: Rc<dyn RemoteScores>,
        spawner: Rc<dyn LocalSpawn>,
        channel: SyncStatusChannel,
        details: SyncDetails,
    ) -> Self {
        Self {
            inner: Rc::new(PusherInner {
                remote,
                spawner,
                channel,
                details: RefCell::new(details),
                queue: RefCell::new(PushQueue::default()),
            }),
        }
    }

    #[must_use]
    pub fn channel(&self) -> &SyncStatusChannel {
        &self.inner.channel
    }

    #[must_use]
    pub fn details(&self) -> SyncDetails {
        self.inner.details.borrow().clone()
    }

    pub fn set_details(&self, details: SyncDetails) {
        *self.inner.details.borrow_mut() = details;
    }

    /// Queue `record` for sending. Skipped when sync is not configured.
    pub fn push(&self, record: &ScoreRecord) {
        if !self.inner.details.borrow().is_configured() {
            log::debug!("sync not configured, skipping push");
            return;
        }

        let ticket = self.inner.channel.begin_push();
        {
            let mut queue = self.inner.queue.borrow_mut();
            queue.pending = Some((ticket, record.clone()));
            if queue.in_flight {
                log::debug!("push #{} queued behind in-flight request", ticket.0);
                return;
            }
            queue.in_flight = true;
        }

        if let Err(err) = self.inner.spawner.spawn_local(drain(Rc::clone(&self.inner))) {
            log::error!("could not spawn push task: {err}");
            let mut queue = self.inner.queue.borrow_mut();
            queue.in_flight = false;
            queue.pending = None;
            drop(queue);
            self.inner
                .channel
                .complete(ticket, &Err(RemoteError::Network(err.to_string())));
        }
    }
}

async fn drain(inner: Rc<PusherInner>) {
    loop {
        let next = {
            let mut queue = inner.queue.borrow_mut();
            let next = queue.pending.take();
            if next.is_none() {
                queue.in_flight = false;
            }
            next
        };
        let Some((ticket, record)) = next else {
            return;
        };

        let details = inner.details.borrow().clone();
        let result = if details.is_configured() {
            log::debug!("push #{} sending {} days", ticket.0, record.len());
            inner.remote.push(&details, &record).await
        } else {
            Err(RemoteError::NotConfigured)
        };
        match &result {
            Ok(()) => log::info!("push #{} acknowledged", ticket.0),
            Err(err) => log::warn!("push #{} failed: {err}", ticket.0),
        }
        inner.channel.complete(ticket, &result);
    }
}
