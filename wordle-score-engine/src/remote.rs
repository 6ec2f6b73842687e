//! Data exchanged with the remote score service.
use crate::backup::record_from_value;
use crate::error::RemoteError;
use crate::record::ScoreRecord;
use crate::score::{PersonScore, compute_score};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Credentials forwarded verbatim to the remote service.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncDetails {
    pub user: String,
    pub password: String,
}

impl SyncDetails {
    #[must_use]
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    /// Both fields are filled in; pushes and remote restore need this.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.user.trim().is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for SyncDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncDetails")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of a push request.
#[derive(Debug, Serialize)]
pub struct PushBody<'a> {
    pub user: &'a str,
    pub record: &'a ScoreRecord,
}

/// One user's entry in the `GET /scores` response. The record is kept as raw
/// JSON and only validated when it is used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteEntry {
    #[serde(default)]
    pub record: Value,
}

/// Every user's record as returned by the remote service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllScores(BTreeMap<String, RemoteEntry>);

/// A user's standing on the leaderboard.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardRow {
    pub user: String,
    pub score: PersonScore,
    pub score_per_day: f64,
}

impl AllScores {
    /// Parse a `GET /scores` response body.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::MalformedResponse`] when the body is not an
    /// object of user entries.
    pub fn from_json(text: &str) -> Result<Self, RemoteError> {
        serde_json::from_str(text).map_err(|err| RemoteError::MalformedResponse(err.to_string()))
    }

    pub fn users(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn insert(&mut self, user: impl Into<String>, record: Value) {
        self.0.insert(user.into(), RemoteEntry { record });
    }

    /// The validated record stored for `user`.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::NoSavedData`] when nothing usable is stored for
    /// the user.
    pub fn record_for(&self, user: &str) -> Result<ScoreRecord, RemoteError> {
        let no_data = || RemoteError::NoSavedData {
            user: user.to_string(),
        };
        let entry = self.0.get(user).ok_or_else(no_data)?;
        if entry.record.is_null() {
            return Err(no_data());
        }
        record_from_value(&entry.record).map_err(|err| {
            log::warn!("server record for {user} failed validation: {err}");
            no_data()
        })
    }

    /// Users with a valid record, best (lowest) average first. Ties are
    /// broken by user name.
    #[must_use]
    pub fn leaderboard(&self) -> Vec<LeaderboardRow> {
        let mut rows: Vec<LeaderboardRow> = self
            .0
            .iter()
            .filter_map(|(user, entry)| {
                let record = record_from_value(&entry.record).ok()?;
                if record.is_empty() {
                    return None;
                }
                let score = compute_score(&record);
                Some(LeaderboardRow {
                    user: user.clone(),
                    score_per_day: score.score_per_day(),
                    score,
                })
            })
            .collect();
        rows.sort_by(|a, b| {
            a.score_per_day
                .total_cmp(&b.score_per_day)
                .then_with(|| a.user.cmp(&b.user))
        });
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Outcome;
    use serde_json::json;

    fn sample() -> AllScores {
        AllScores::from_json(
            &json!({
                "ann": {"record": {"1": 2, "2": 2}},
                "bob": {"record": {"1": 1, "3": 2}},
                "cat": {"record": {"1": 9}},
                "dan": {},
                "eve": {"record": {"5": 1, "6": 1}}
            })
            .to_string(),
        )
        .unwrap()
    }

    #[test]
    fn record_for_validates_entries() {
        let all = sample();
        assert_eq!(
            all.record_for("eve").unwrap(),
            ScoreRecord::from([(5, Outcome::solved(1).unwrap()), (6, Outcome::solved(1).unwrap())])
        );
        assert_eq!(
            all.record_for("cat"),
            Err(RemoteError::NoSavedData { user: "cat".into() })
        );
        assert!(matches!(all.record_for("dan"), Err(RemoteError::NoSavedData { .. })));
        assert!(matches!(all.record_for("zed"), Err(RemoteError::NoSavedData { .. })));
    }

    #[test]
    fn leaderboard_ranks_by_average_and_skips_invalid() {
        let users: Vec<_> = sample()
            .leaderboard()
            .into_iter()
            .map(|row| row.user)
            .collect();
        assert_eq!(users, vec!["eve", "ann", "bob"]);
    }

    #[test]
    fn equal_averages_are_ordered_by_name() {
        let mut all = AllScores::default();
        all.insert("zoe", json!({"1": 2}));
        all.insert("amy", json!({"1": 2, "2": 2}));
        all.insert("max", json!({"1": 1}));
        let users: Vec<_> = all.leaderboard().into_iter().map(|row| row.user).collect();
        assert_eq!(users, vec!["max", "amy", "zoe"]);
    }

    #[test]
    fn malformed_body_is_reported() {
        assert!(matches!(
            AllScores::from_json("[]"),
            Err(RemoteError::MalformedResponse(_))
        ));
    }

    #[test]
    fn sync_details_hide_password_and_require_both_fields() {
        let details = SyncDetails::new("ann", "hunter2");
        assert!(details.is_configured());
        assert!(!format!("{details:?}").contains("hunter2"));
        assert!(!SyncDetails::new("ann", "").is_configured());
        assert!(!SyncDetails::new("  ", "pw").is_configured());
    }
}
