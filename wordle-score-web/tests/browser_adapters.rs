#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;
use wordle_score_engine::{DurableStorage, EngineConfig, Outcome};
use wordle_score_web::remote::RemoteConfig;
use wordle_score_web::storage::LocalStorage;
use wordle_score_web::{dom, open_browser_engine};

wasm_bindgen_test_configure!(run_in_browser);

fn clear_storage() {
    dom::local_storage().expect("localStorage").clear().expect("clear");
}

#[wasm_bindgen_test]
fn dom_helpers_are_available() {
    assert!(dom::window().is_ok());
    assert!(dom::document().is_ok());
}

#[wasm_bindgen_test]
fn local_storage_round_trips_values() {
    clear_storage();
    let storage = LocalStorage::open().expect("open");
    assert_eq!(storage.read("missing").unwrap(), None);
    storage.write("key", "value").unwrap();
    assert_eq!(storage.read("key").unwrap().as_deref(), Some("value"));
}

#[wasm_bindgen_test]
fn browser_engine_persists_across_opens() {
    clear_storage();
    let engine = open_browser_engine(EngineConfig::default(), RemoteConfig::default()).unwrap();
    let day = engine.set_today(Outcome::Failed).unwrap();
    drop(engine);

    let engine = open_browser_engine(EngineConfig::default(), RemoteConfig::default()).unwrap();
    assert_eq!(engine.scores().outcome(day), Some(Outcome::Failed));
    assert!(!engine.can_sync());
}
