//! Backup files: reading a user-chosen file and downloading a backup.
use crate::dom::{document, js_error_message};
use async_trait::async_trait;
use js_sys::Array;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, File, HtmlAnchorElement, Url};
use wordle_score_engine::{BackupPayload, EngineConfig, SourceError, TextSource};

/// A file picked through an `<input type="file">`.
pub struct FileSource {
    file: File,
}

impl FileSource {
    #[must_use]
    pub const fn new(file: File) -> Self {
        Self { file }
    }

    #[must_use]
    pub fn name(&self) -> String {
        self.file.name()
    }
}

#[async_trait(?Send)]
impl TextSource for FileSource {
    async fn read_text(&self) -> Result<String, SourceError> {
        let value = JsFuture::from(self.file.text())
            .await
            .map_err(|err| SourceError(js_error_message(&err)))?;
        value
            .as_string()
            .ok_or_else(|| SourceError(format!("{} is not a text file", self.file.name())))
    }
}

/// Offer `payload` as a download named after `config.backup_filename`.
///
/// # Errors
/// Returns an error if the blob, object URL or anchor cannot be created.
pub fn download_backup(payload: &BackupPayload, config: &EngineConfig) -> Result<(), JsValue> {
    let parts = Array::of1(&JsValue::from_str(payload.as_str()));
    let options = BlobPropertyBag::new();
    options.set_type(&config.backup_mime);
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let anchor: HtmlAnchorElement = document()?.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(&config.backup_filename);
    anchor.click();

    Url::revoke_object_url(&url)?;
    log::info!("backup downloaded as {}", config.backup_filename);
    Ok(())
}
