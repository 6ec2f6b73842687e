//! `localStorage` backed [`DurableStorage`].
use crate::dom::{js_error_message, local_storage};
use web_sys::Storage;
use wordle_score_engine::DurableStorage;

#[derive(Debug, thiserror::Error)]
pub enum WebStorageError {
    #[error("localStorage unavailable: {0}")]
    Unavailable(String),
    #[error("could not access {key}: {message}")]
    Access { key: String, message: String },
}

/// Writes go straight to `localStorage`, which is synchronous, so a value is
/// durable once [`DurableStorage::write`] returns.
pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    /// # Errors
    ///
    /// Returns [`WebStorageError::Unavailable`] when the browser denies access,
    /// e.g. with storage disabled.
    pub fn open() -> Result<Self, WebStorageError> {
        let storage =
            local_storage().map_err(|err| WebStorageError::Unavailable(js_error_message(&err)))?;
        Ok(Self { storage })
    }
}

impl DurableStorage for LocalStorage {
    type Error = WebStorageError;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        self.storage
            .get_item(key)
            .map_err(|err| WebStorageError::Access {
                key: key.to_string(),
                message: js_error_message(&err),
            })
    }

    fn write(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.storage
            .set_item(key, value)
            .map_err(|err| WebStorageError::Access {
                key: key.to_string(),
                message: js_error_message(&err),
            })
    }
}
