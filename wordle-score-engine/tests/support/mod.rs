//! In-memory adapters shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use futures::channel::oneshot;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::convert::Infallible;
use std::rc::Rc;
use wordle_score_engine::{
    AllScores, Clock, DurableStorage, RemoteError, RemoteScores, ScoreRecord, SourceError,
    SyncDetails, TextSource,
};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Cloning shares the same entries, so a test can inspect what the engine wrote.
#[derive(Default, Clone)]
pub struct MemoryStorage {
    pub entries: Rc<RefCell<HashMap<String, String>>>,
}

impl DurableStorage for MemoryStorage {
    type Error = Infallible;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

pub struct ManualClock {
    pub now: Cell<u64>,
    pub date: NaiveDate,
}

impl ManualClock {
    pub fn on(y: i32, m: u32, d: u32) -> Self {
        Self {
            now: Cell::new(0),
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
        }
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }

    fn today(&self) -> NaiveDate {
        self.date
    }
}

/// Remote whose requests stay pending until the test releases them.
#[derive(Default)]
pub struct GatedRemote {
    pub pushed: RefCell<Vec<ScoreRecord>>,
    gates: RefCell<VecDeque<oneshot::Sender<Result<(), RemoteError>>>>,
    pub scores: RefCell<AllScores>,
    fetch_gate: RefCell<Option<oneshot::Sender<()>>>,
    pub gate_fetches: Cell<bool>,
}

impl GatedRemote {
    /// Settle the oldest outstanding push.
    pub fn release(&self, result: Result<(), RemoteError>) {
        let gate = self.gates.borrow_mut().pop_front().expect("no push in flight");
        let _ = gate.send(result);
    }

    pub fn outstanding(&self) -> usize {
        self.gates.borrow().len()
    }

    pub fn release_fetch(&self) {
        if let Some(gate) = self.fetch_gate.borrow_mut().take() {
            let _ = gate.send(());
        }
    }
}

#[async_trait(?Send)]
impl RemoteScores for GatedRemote {
    async fn fetch_all(&self, _details: &SyncDetails) -> Result<AllScores, RemoteError> {
        if self.gate_fetches.get() {
            let (tx, rx) = oneshot::channel();
            *self.fetch_gate.borrow_mut() = Some(tx);
            rx.await
                .map_err(|_| RemoteError::Network("request dropped".into()))?;
        }
        Ok(self.scores.borrow().clone())
    }

    async fn push(&self, _details: &SyncDetails, record: &ScoreRecord) -> Result<(), RemoteError> {
        self.pushed.borrow_mut().push(record.clone());
        let (tx, rx) = oneshot::channel();
        self.gates.borrow_mut().push_back(tx);
        rx.await
            .unwrap_or_else(|_| Err(RemoteError::Network("request dropped".into())))
    }
}

/// Clipboard or file returning fixed text, optionally held until released.
pub struct StaticText {
    text: Result<String, String>,
    gate: RefCell<Option<oneshot::Receiver<()>>>,
}

impl StaticText {
    pub fn new(text: &str) -> Self {
        Self {
            text: Ok(text.to_string()),
            gate: RefCell::new(None),
        }
    }

    pub fn unreadable(reason: &str) -> Self {
        Self {
            text: Err(reason.to_string()),
            gate: RefCell::new(None),
        }
    }

    pub fn gated(text: &str) -> (Self, oneshot::Sender<()>) {
        let (tx, rx) = oneshot::channel();
        let source = Self {
            text: Ok(text.to_string()),
            gate: RefCell::new(Some(rx)),
        };
        (source, tx)
    }
}

#[async_trait(?Send)]
impl TextSource for StaticText {
    async fn read_text(&self) -> Result<String, SourceError> {
        let gate = self.gate.borrow_mut().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.text.clone().map_err(SourceError)
    }
}
