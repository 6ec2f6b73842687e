//! Day-indexed score record.
//!
//! A [`ScoreRecord`] maps a [`DayOffset`] to the [`Outcome`] of that day's
//! puzzle. Days missing from the map were not played at all, which is a
//! different thing from a day that was played and failed.

use crate::error::OutcomeError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use std::str::FromStr;

/// Calendar day counted from the game's first puzzle.
pub type DayOffset = u32;

/// Wire form of [`Outcome::Failed`].
pub const FAIL_SENTINEL: &str = "X";

/// Number of guesses needed to solve a puzzle, always within `1..=6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Attempts(u8);

impl Attempts {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 6;

    #[must_use]
    pub const fn new(count: u8) -> Option<Self> {
        if count >= Self::MIN && count <= Self::MAX {
            Some(Self(count))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

/// Result of a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawOutcome", into = "RawOutcome")]
pub enum Outcome {
    Attempts(Attempts),
    Failed,
}

impl Outcome {
    /// Every selectable outcome, in display order.
    pub const ALL: [Self; 7] = [
        Self::Attempts(Attempts(1)),
        Self::Attempts(Attempts(2)),
        Self::Attempts(Attempts(3)),
        Self::Attempts(Attempts(4)),
        Self::Attempts(Attempts(5)),
        Self::Attempts(Attempts(6)),
        Self::Failed,
    ];

    /// Shorthand for a solved day. Returns `None` outside `1..=6`.
    #[must_use]
    pub const fn solved(count: u8) -> Option<Self> {
        match Attempts::new(count) {
            Some(attempts) => Some(Self::Attempts(attempts)),
            None => None,
        }
    }

    #[must_use]
    pub const fn is_failed(self) -> bool {
        matches!(self, Self::Failed)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attempts(attempts) => write!(f, "{}", attempts.get()),
            Self::Failed => f.write_str(FAIL_SENTINEL),
        }
    }
}

impl FromStr for Outcome {
    type Err = OutcomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case(FAIL_SENTINEL) {
            return Ok(Self::Failed);
        }
        trimmed
            .parse::<u8>()
            .ok()
            .and_then(Self::solved)
            .ok_or_else(|| OutcomeError(s.to_string()))
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawOutcome {
    Count(i64),
    Sentinel(String),
}

impl TryFrom<RawOutcome> for Outcome {
    type Error = OutcomeError;

    fn try_from(raw: RawOutcome) -> Result<Self, Self::Error> {
        match raw {
            RawOutcome::Count(count) => u8::try_from(count)
                .ok()
                .and_then(Self::solved)
                .ok_or_else(|| OutcomeError(count.to_string())),
            RawOutcome::Sentinel(text) if text == FAIL_SENTINEL => Ok(Self::Failed),
            RawOutcome::Sentinel(text) => Err(OutcomeError(format!("\"{text}\""))),
        }
    }
}

impl From<Outcome> for RawOutcome {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Attempts(attempts) => Self::Count(i64::from(attempts.get())),
            Outcome::Failed => Self::Sentinel(FAIL_SENTINEL.to_string()),
        }
    }
}

/// Sparse mapping of played days to their outcomes.
///
/// Backed by a `BTreeMap`, so iteration and serialization are always in
/// ascending day order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreRecord(BTreeMap<DayOffset, Outcome>);

impl ScoreRecord {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    #[must_use]
    pub fn get(&self, day: DayOffset) -> Option<Outcome> {
        self.0.get(&day).copied()
    }

    #[must_use]
    pub fn contains(&self, day: DayOffset) -> bool {
        self.0.contains_key(&day)
    }

    /// Upserts a day, returning the outcome it replaced.
    pub fn insert(&mut self, day: DayOffset, outcome: Outcome) -> Option<Outcome> {
        self.0.insert(day, outcome)
    }

    pub fn remove(&mut self, day: DayOffset) -> Option<Outcome> {
        self.0.remove(&day)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries sorted ascending by day.
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = (DayOffset, Outcome)> + '_ {
        self.0.iter().map(|(day, outcome)| (*day, *outcome))
    }

    /// First and last played day, if any.
    #[must_use]
    pub fn span(&self) -> Option<(DayOffset, DayOffset)> {
        let first = self.0.keys().next()?;
        let last = self.0.keys().next_back()?;
        Some((*first, *last))
    }
}

impl FromIterator<(DayOffset, Outcome)> for ScoreRecord {
    fn from_iter<I: IntoIterator<Item = (DayOffset, Outcome)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[(DayOffset, Outcome); N]> for ScoreRecord {
    fn from(entries: [(DayOffset, Outcome); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a ScoreRecord {
    type Item = (&'a DayOffset, &'a Outcome);
    type IntoIter = btree_map::Iter<'a, DayOffset, Outcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
