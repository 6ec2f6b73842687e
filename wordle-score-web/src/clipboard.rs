//! Navigator clipboard access.
use crate::dom::{js_error_message, window};
use async_trait::async_trait;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use wordle_score_engine::{BackupPayload, SourceError, TextSource};

/// Reads backups pasted by the user. Browsers ask for permission on first use.
#[derive(Debug, Clone, Copy, Default)]
pub struct NavigatorClipboard;

#[async_trait(?Send)]
impl TextSource for NavigatorClipboard {
    async fn read_text(&self) -> Result<String, SourceError> {
        let promise = window()
            .map_err(|err| SourceError(js_error_message(&err)))?
            .navigator()
            .clipboard()
            .read_text();
        let value = JsFuture::from(promise)
            .await
            .map_err(|err| SourceError(js_error_message(&err)))?;
        value
            .as_string()
            .ok_or_else(|| SourceError("clipboard did not contain text".into()))
    }
}

/// Copy `text` to the clipboard.
///
/// # Errors
/// Returns the browser's rejection, e.g. when the page is not focused.
#[allow(clippy::future_not_send)]
pub async fn write_text(text: &str) -> Result<(), JsValue> {
    let promise = window()?.navigator().clipboard().write_text(text);
    JsFuture::from(promise).await?;
    Ok(())
}

/// Copy a backup to the clipboard.
///
/// # Errors
/// See [`write_text`].
#[allow(clippy::future_not_send)]
pub async fn copy_backup(payload: &BackupPayload) -> Result<(), JsValue> {
    write_text(payload.as_str()).await?;
    log::info!("backup copied to clipboard");
    Ok(())
}
