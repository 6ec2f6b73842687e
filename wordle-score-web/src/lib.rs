//! Browser adapters for the Wordle score engine.
//!
//! Every port of `wordle-score-engine` gets a web implementation here, and
//! [`open_browser_engine`] wires them into a ready [`ScoreEngine`].
#![forbid(unsafe_code)]
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod clipboard;
pub mod dom;
pub mod file;
pub mod remote;
pub mod runtime;
pub mod storage;

use anyhow::Context;
use remote::{HttpRemote, RemoteConfig};
use runtime::{BrowserClock, BrowserSpawner};
use std::rc::Rc;
use storage::LocalStorage;
use wordle_score_engine::{EngineConfig, ScoreEngine};

pub type BrowserEngine = ScoreEngine<LocalStorage>;

/// Open the engine on `localStorage`, syncing with the service at `remote`.
///
/// # Errors
///
/// Fails when `localStorage` is unavailable or cannot be read.
pub fn open_browser_engine(config: EngineConfig, remote: RemoteConfig) -> anyhow::Result<BrowserEngine> {
    let storage = LocalStorage::open().context("opening localStorage")?;
    let engine = ScoreEngine::open(storage, Rc::new(BrowserClock), config)
        .map_err(|err| anyhow::anyhow!("loading stored scores: {err}"))?
        .with_remote(Rc::new(HttpRemote::new(remote)), Rc::new(BrowserSpawner));
    log::info!(
        "opened score engine with {} recorded days",
        engine.scores().get().len()
    );
    Ok(engine)
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}
