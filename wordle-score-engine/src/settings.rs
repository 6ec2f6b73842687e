//! User preferences persisted next to the score record.
use crate::DurableStorage;
use crate::config::EngineConfig;
use crate::error::StoreError;
use crate::observe::{Observers, SubscriptionId};
use crate::remote::SyncDetails;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

/// Missing fields fall back to their defaults, so payloads written by older
/// versions still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub animated_counts: bool,
    pub show_sync_indicators: bool,
    pub dev_stuff: bool,
    pub theme: Theme,
    pub color_scores: bool,
    pub shorten_big_numbers: bool,
    pub glowy_numbers: bool,
    pub show_done_checkmark: bool,
    pub sync_details: SyncDetails,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            animated_counts: true,
            show_sync_indicators: true,
            dev_stuff: false,
            theme: Theme::Dark,
            color_scores: true,
            shorten_big_numbers: true,
            glowy_numbers: true,
            show_done_checkmark: true,
            sync_details: SyncDetails::default(),
        }
    }
}

pub struct SettingsStore<S: DurableStorage> {
    storage: Rc<S>,
    key: String,
    settings: RefCell<Settings>,
    observers: Observers<Settings>,
}

impl<S: DurableStorage> SettingsStore<S> {
    /// Load settings, falling back to defaults when nothing (or something
    /// unreadable) is stored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] if the storage cannot be read.
    pub fn open(storage: Rc<S>, config: &EngineConfig) -> Result<Self, StoreError> {
        let key = config.settings_key.clone();
        let raw = storage.read(&key).map_err(|err| StoreError::Persistence {
            key: key.clone(),
            source: Box::new(err),
        })?;
        let settings = raw
            .and_then(|text| match serde_json::from_str::<Settings>(&text) {
                Ok(settings) => Some(settings),
                Err(err) => {
                    log::warn!("ignoring unreadable settings under {key}: {err}");
                    None
                }
            })
            .unwrap_or_default();
        Ok(Self {
            storage,
            key,
            settings: RefCell::new(settings),
            observers: Observers::default(),
        })
    }

    #[must_use]
    pub fn get(&self) -> Settings {
        self.settings.borrow().clone()
    }

    /// Apply `change` and persist the result. Nothing changes in memory if
    /// the write fails.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the updated settings cannot be persisted.
    pub fn update(&self, change: impl FnOnce(&mut Settings)) -> Result<Settings, StoreError> {
        let mut next = self.get();
        change(&mut next);
        let payload = serde_json::to_string(&next).map_err(|source| StoreError::Serialize {
            key: self.key.clone(),
            source,
        })?;
        self.storage
            .write(&self.key, &payload)
            .map_err(|err| StoreError::Persistence {
                key: self.key.clone(),
                source: Box::new(err),
            })?;
        *self.settings.borrow_mut() = next.clone();
        self.observers.notify(&next);
        Ok(next)
    }

    pub fn subscribe(&self, listener: impl Fn(&Settings) + 'static) -> SubscriptionId {
        self.observers.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::convert::Infallible;

    #[derive(Default)]
    struct MemoryStorage {
        entries: RefCell<HashMap<String, String>>,
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

    #[test]
    fn older_payload_loads_with_defaults() {
        let storage = Rc::new(MemoryStorage::default());
        storage
            .write("wordle-score-settings", r#"{"theme":"light","devStuff":true}"#)
            .unwrap();
        let store = SettingsStore::open(Rc::clone(&storage), &EngineConfig::default()).unwrap();
        let settings = store.get();
        assert_eq!(settings.theme, Theme::Light);
        assert!(settings.dev_stuff);
        assert!(settings.animated_counts);
        assert_eq!(settings.sync_details, SyncDetails::default());
    }

    #[test]
    fn display_toggles_survive_an_update() {
        let storage = Rc::new(MemoryStorage::default());
        storage
            .write(
                "wordle-score-settings",
                r#"{"glowyNumbers":false,"showDoneCheckmark":false}"#,
            )
            .unwrap();
        let store = SettingsStore::open(Rc::clone(&storage), &EngineConfig::default()).unwrap();
        store.update(|s| s.theme = Theme::Light).unwrap();

        let reopened = SettingsStore::open(storage, &EngineConfig::default()).unwrap();
        let settings = reopened.get();
        assert!(!settings.glowy_numbers);
        assert!(!settings.show_done_checkmark);
        assert_eq!(settings.theme, Theme::Light);
        assert!(Settings::default().glowy_numbers);
    }

    #[test]
    fn corrupt_payload_falls_back_to_defaults() {
        let storage = Rc::new(MemoryStorage::default());
        storage.write("wordle-score-settings", "not json").unwrap();
        let store = SettingsStore::open(storage, &EngineConfig::default()).unwrap();
        assert_eq!(store.get(), Settings::default());
    }

    #[test]
    fn update_persists_and_notifies() {
        let storage = Rc::new(MemoryStorage::default());
        let store = SettingsStore::open(Rc::clone(&storage), &EngineConfig::default()).unwrap();
        let seen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);
        store.subscribe(move |s: &Settings| *sink.borrow_mut() = Some(s.theme));

        store
            .update(|s| {
                s.theme = Theme::Light;
                s.sync_details = SyncDetails::new("ann", "pw");
            })
            .unwrap();

        assert_eq!(*seen.borrow(), Some(Theme::Light));
        let reopened = SettingsStore::open(storage, &EngineConfig::default()).unwrap();
        assert_eq!(reopened.get().sync_details.user, "ann");
    }
}
