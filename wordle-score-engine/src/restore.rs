//! Compare-before-commit restore workflow.
//!
//! ```text
//! idle --request--> acquiring --valid--> comparing --confirm--> success
//!                             \--error-> failed                 |
//! comparing/success/failed --reset--> idle   <------------------/
//! ```
//!
//! Only one acquisition may run at a time. A `reset` while acquiring makes
//! the late result be discarded.

use crate::backup::decode;
use crate::error::{RemoteError, RestoreError};
use crate::record::{DayOffset, Outcome, ScoreRecord};
use crate::remote::SyncDetails;
use crate::score::{PersonScore, compute_score};
use crate::store::ScoreStore;
use crate::{DurableStorage, RemoteScores, TextSource};
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RestoreOrigin {
    Clipboard,
    File,
    Remote,
}

impl fmt::Display for RestoreOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Clipboard => "clipboard",
            Self::File => "file",
            Self::Remote => "server",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreCandidate {
    pub record: ScoreRecord,
    pub origin: RestoreOrigin,
}

/// Why a restore failed, tagged with where the backup came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreFailure {
    pub origin: RestoreOrigin,
    pub message: String,
}

impl fmt::Display for RestoreFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed to restore backup from {}: {}",
            self.origin, self.message
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RestoreState {
    #[default]
    Idle,
    Acquiring(RestoreOrigin),
    Comparing(RestoreCandidate),
    Success,
    Failed(RestoreFailure),
}

impl RestoreState {
    const fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Acquiring(_) => "in progress",
            Self::Comparing(_) => "awaiting confirmation",
            Self::Success => "finished",
            Self::Failed(_) => "failed",
        }
    }
}

/// One row of the side-by-side view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayComparison {
    pub day: DayOffset,
    pub current: Option<Outcome>,
    pub candidate: Option<Outcome>,
}

impl DayComparison {
    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.current != self.candidate
    }
}

/// Live record and restore candidate, day by day.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordComparison {
    pub origin: RestoreOrigin,
    pub rows: Vec<DayComparison>,
    pub current_score: PersonScore,
    pub candidate_score: PersonScore,
}

impl RecordComparison {
    #[must_use]
    pub fn new(origin: RestoreOrigin, current: &ScoreRecord, candidate: &ScoreRecord) -> Self {
        let days: BTreeSet<DayOffset> = current
            .entries()
            .chain(candidate.entries())
            .map(|(day, _)| day)
            .collect();
        let rows = days
            .into_iter()
            .map(|day| DayComparison {
                day,
                current: current.get(day),
                candidate: candidate.get(day),
            })
            .collect();
        Self {
            origin,
            rows,
            current_score: compute_score(current),
            candidate_score: compute_score(candidate),
        }
    }

    pub fn changed(&self) -> impl Iterator<Item = &DayComparison> {
        self.rows.iter().filter(|row| row.is_changed())
    }

    #[must_use]
    pub fn is_identical(&self) -> bool {
        self.changed().next().is_none()
    }

    /// Days that would disappear on confirm.
    #[must_use]
    pub fn removed_days(&self) -> Vec<DayOffset> {
        self.rows
            .iter()
            .filter(|row| row.current.is_some() && row.candidate.is_none())
            .map(|row| row.day)
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct RestoreWorkflow {
    state: RefCell<RestoreState>,
    generation: Cell<u64>,
}

impl RestoreWorkflow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> RestoreState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn candidate(&self) -> Option<RestoreCandidate> {
        match &*self.state.borrow() {
            RestoreState::Comparing(candidate) => Some(candidate.clone()),
            _ => None,
        }
    }

    /// Side-by-side view against `live`, available while comparing.
    #[must_use]
    pub fn comparison(&self, live: &ScoreRecord) -> Option<RecordComparison> {
        match &*self.state.borrow() {
            RestoreState::Comparing(candidate) => Some(RecordComparison::new(
                candidate.origin,
                live,
                &candidate.record,
            )),
            _ => None,
        }
    }

    /// Read a backup from the clipboard.
    ///
    /// # Errors
    ///
    /// Returns [`RestoreError::Busy`] unless the workflow is idle. Read and
    /// decode failures are reported through [`RestoreState::Failed`].
    pub async fn request_from_clipboard(&self, clipboard: &dyn TextSource) -> Result<(), RestoreError> {
        self.acquire_text(RestoreOrigin::Clipboard, clipboard).await
    }

    /// Read a backup from a user-chosen file.
    ///
    /// # Errors
    ///
    /// Returns [`RestoreError::Busy`] unless the workflow is idle. Read and
    /// decode failures are reported through [`RestoreState::Failed`].
    pub async fn request_from_file(&self, file: &dyn TextSource) -> Result<(), RestoreError> {
        self.acquire_text(RestoreOrigin::File, file).await
    }

    /// Fetch the caller's own record from the remote service.
    ///
    /// # Errors
    ///
    /// Returns [`RestoreError::Busy`] unless the workflow is idle. Network
    /// failures and missing data are reported through [`RestoreState::Failed`].
    pub async fn request_from_remote(
        &self,
        remote: &dyn RemoteScores,
        details: &SyncDetails,
    ) -> Result<(), RestoreError> {
        let origin = RestoreOrigin::Remote;
        let generation = self.begin(origin)?;
        let result = if details.is_configured() {
            match remote.fetch_all(details).await {
                Ok(all) => all.record_for(&details.user),
                Err(err) => Err(err),
            }
        } else {
            Err(RemoteError::NotConfigured)
        };
        let result = result.map_err(|err| match err {
            RemoteError::NoSavedData { .. } => String::from("No server data saved"),
            other => other.to_string(),
        });
        self.finish(generation, origin, result);
        Ok(())
    }

    /// Replace the live record with the candidate.
    ///
    /// # Errors
    ///
    /// Returns [`RestoreError::NothingToConfirm`] unless comparing, and
    /// [`RestoreError::Commit`] if the store could not persist the record; the
    /// candidate is kept in that case so the user can retry or reset.
    pub fn confirm<S: DurableStorage>(&self, store: &ScoreStore<S>) -> Result<(), RestoreError> {
        let candidate = self.candidate().ok_or(RestoreError::NothingToConfirm)?;
        let days = candidate.record.len();
        store.replace_all(candidate.record)?;
        log::info!("restored {days} days from {}", candidate.origin);
        self.transition(RestoreState::Success);
        Ok(())
    }

    /// Drop any candidate or result and return to idle.
    pub fn reset(&self) {
        self.generation.set(self.generation.get() + 1);
        self.transition(RestoreState::Idle);
    }

    async fn acquire_text(&self, origin: RestoreOrigin, source: &dyn TextSource) -> Result<(), RestoreError> {
        let generation = self.begin(origin)?;
        let result = match source.read_text().await {
            Ok(text) => decode(&text).map_err(|err| {
                let what = match origin {
                    RestoreOrigin::File => "Invalid backup file",
                    _ => "Invalid backup in clipboard",
                };
                format!("{what} ({err})")
            }),
            Err(err) => Err(format!("Could not read the {origin}: {err}")),
        };
        self.finish(generation, origin, result);
        Ok(())
    }

    fn begin(&self, origin: RestoreOrigin) -> Result<u64, RestoreError> {
        let mut state = self.state.borrow_mut();
        if *state != RestoreState::Idle {
            log::debug!("rejecting {origin} restore while {}", state.label());
            return Err(RestoreError::Busy {
                state: state.label(),
            });
        }
        *state = RestoreState::Acquiring(origin);
        drop(state);
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        Ok(generation)
    }

    fn finish(&self, generation: u64, origin: RestoreOrigin, result: Result<ScoreRecord, String>) {
        if generation != self.generation.get() {
            log::debug!("discarding {origin} restore result after reset");
            return;
        }
        let next = match result {
            Ok(record) => RestoreState::Comparing(RestoreCandidate { record, origin }),
            Err(message) => {
                log::warn!("restore from {origin} failed: {message}");
                RestoreState::Failed(RestoreFailure { origin, message })
            }
        };
        self.transition(next);
    }

    fn transition(&self, next: RestoreState) {
        let mut state = self.state.borrow_mut();
        log::debug!("restore {} -> {}", state.label(), next.label());
        *state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solved(count: u8) -> Outcome {
        Outcome::solved(count).unwrap()
    }

    #[test]
    fn comparison_lists_union_of_days() {
        let current = ScoreRecord::from([(1, solved(3)), (2, solved(4))]);
        let candidate = ScoreRecord::from([(2, solved(4)), (3, Outcome::Failed)]);
        let cmp = RecordComparison::new(RestoreOrigin::File, &current, &candidate);

        let days: Vec<_> = cmp.rows.iter().map(|row| row.day).collect();
        assert_eq!(days, vec![1, 2, 3]);
        let changed: Vec<_> = cmp.changed().map(|row| row.day).collect();
        assert_eq!(changed, vec![1, 3]);
        assert_eq!(cmp.removed_days(), vec![1]);
        assert!(!cmp.is_identical());
        assert!((cmp.current_score.total_score - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn failure_message_names_origin() {
        let failure = RestoreFailure {
            origin: RestoreOrigin::Remote,
            message: "No server data saved".into(),
        };
        assert_eq!(
            failure.to_string(),
            "Failed to restore backup from server: No server data saved"
        );
    }

    #[test]
    fn idle_workflow_has_nothing_to_compare() {
        let workflow = RestoreWorkflow::new();
        assert_eq!(workflow.state(), RestoreState::Idle);
        assert!(workflow.comparison(&ScoreRecord::new()).is_none());
        workflow.reset();
        assert_eq!(workflow.state(), RestoreState::Idle);
    }
}
