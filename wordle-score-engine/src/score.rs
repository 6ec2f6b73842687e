//! Cumulative score calculation.
//!
//! Covers every day between the first and last played day. A fail defers its
//! penalty: the next solved day is multiplied by `3` for each fail before it.
//! A gap (a day that was not played at all) triples everything accumulated so
//! far, immediately and permanently. Fails still open after the last played
//! day add nothing to the total but are reported as `uncounted_fails`.
use crate::numbers::{count_to_f64, pow3, round2};
use crate::record::{DayOffset, Outcome, ScoreRecord};
use serde::{Deserialize, Serialize};

/// Aggregate score derived from a [`ScoreRecord`]. Lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonScore {
    pub total_score: f64,
    pub days_played: usize,
    pub uncounted_fails: u32,
}

/// [`PersonScore`] plus the per-day average shown next to it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRenderData {
    pub total_score: f64,
    pub days_played: usize,
    pub uncounted_fails: u32,
    pub score_per_day: f64,
}

#[must_use]
pub fn compute_score(record: &ScoreRecord) -> PersonScore {
    let mut total_score = 0.0;
    let mut uncounted_fails: u32 = 0;
    let mut previous: Option<DayOffset> = None;
    // Work per recorded day; a run of `g` missed days is one `3^g` factor.
    for (day, outcome) in record.entries() {
        if let Some(previous) = previous {
            let gap = day - previous - 1;
            if gap > 0 && total_score > 0.0 {
                total_score *= pow3(gap);
            }
        }
        previous = Some(day);
        match outcome {
            Outcome::Attempts(attempts) => {
                total_score += pow3(uncounted_fails) * f64::from(attempts.get());
                uncounted_fails = 0;
            }
            Outcome::Failed => uncounted_fails = uncounted_fails.saturating_add(1),
        }
    }

    PersonScore {
        total_score,
        days_played: record.len(),
        uncounted_fails,
    }
}

impl PersonScore {
    /// Days that contributed to the total: played days minus the open fail streak.
    #[must_use]
    pub fn counted_days(&self) -> usize {
        let open = usize::try_from(self.uncounted_fails).unwrap_or(usize::MAX);
        self.days_played.saturating_sub(open)
    }

    #[must_use]
    pub fn score_per_day(&self) -> f64 {
        round2(self.total_score / count_to_f64(self.counted_days().max(1)))
    }

    #[must_use]
    pub fn to_render_data(&self) -> ScoreRenderData {
        ScoreRenderData {
            total_score: self.total_score,
            days_played: self.days_played,
            uncounted_fails: self.uncounted_fails,
            score_per_day: self.score_per_day(),
        }
    }
}
