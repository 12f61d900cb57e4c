use serde::{Deserialize, Serialize};
use tauri::AppHandle;
use tauri_plugin_store::StoreExt;

use crate::stt::{ModelKind, ModelPathConfig, PathSource};

#[derive(Serialize, Deserialize, Default)]
pub struct Settings {
    pub model_path: Option<String>,
    pub prefer_int8: Option<bool>,
    pub model_kind: Option<ModelKind>,
}

const STORE_PATH: &str = "settings.json";

pub fn get_settings(app: &AppHandle) -> Settings {
    match app.store(STORE_PATH) {
        Ok(store) => Settings {
            model_path: store
                .get("model_path")
                .and_then(|v| v.as_str().map(|s| s.to_string())),
            prefer_int8: store.get("prefer_int8").and_then(|v| v.as_bool()),
            model_kind: store
                .get("model_kind")
                .and_then(|v| serde_json::from_value(v).ok()),
        },
        Err(e) => {
            log::warn!("Failed to load settings store: {e}");
            Settings::default()
        }
    }
}

pub fn save_settings(app: &AppHandle, settings: &Settings) -> Result<(), String> {
    let store = app
        .store(STORE_PATH)
        .map_err(|e| format!("Failed to open settings store: {e}"))?;

    if let Some(path) = &settings.model_path {
        store.set("model_path", serde_json::json!(path));
    } else {
        store.delete("model_path");
    }

    if let Some(prefer_int8) = settings.prefer_int8 {
        store.set("prefer_int8", serde_json::json!(prefer_int8));
    } else {
        store.delete("prefer_int8");
    }

    if let Some(kind) = settings.model_kind {
        store.set("model_kind", serde_json::json!(kind));
    } else {
        store.delete("model_kind");
    }

    store.save().map_err(|e| e.to_string())
}

/// Model configuration to use when the caller does not pass one: the stored
/// path if the user picked one, resolved in auto mode.
pub fn default_model_config(app: &AppHandle) -> Option<ModelPathConfig> {
    get_settings(app)
        .model_path
        .map(|path| ModelPathConfig::new(PathSource::Auto, path))
}
