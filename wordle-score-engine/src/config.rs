//! Engine configuration.
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Explicitly constructed configuration handed to the engine's components.
/// Every field has a default, so a partial JSON document is enough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Durable storage key holding the score record.
    pub record_key: String,
    /// Durable storage key holding [`Settings`](crate::Settings).
    pub settings_key: String,
    /// Suggested filename for downloaded backups.
    pub backup_filename: String,
    pub backup_mime: String,
    /// How long `success`/`failed` sync statuses stay visible.
    pub sync_display_window_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            record_key: String::from("wordle-score"),
            settings_key: String::from("wordle-score-settings"),
            backup_filename: String::from("wordle-score-backup.json"),
            backup_mime: String::from("application/json"),
            sync_display_window_ms: 2_000,
        }
    }
}

impl EngineConfig {
    /// Parse configuration from JSON, filling missing fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a field has the wrong type.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub const fn sync_display_window(&self) -> Duration {
        Duration::from_millis(self.sync_display_window_ms)
    }
}
