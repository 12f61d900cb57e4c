use std::path::PathBuf;

use tauri::{AppHandle, Manager};

use crate::engine::SttEngine;
use crate::error::AppError;
use crate::stt::{self, AssetStore, ModelKind, ModelPathConfig};

/// Read-only namespace of bundled resources.
fn asset_store(app: &AppHandle) -> Result<AssetStore, AppError> {
    let root = app
        .path()
        .resource_dir()
        .map_err(|e| AppError::Runtime(format!("resource directory unavailable: {e}")))?;
    Ok(AssetStore::new(root))
}

/// Writable root that extracted assets are mirrored into.
fn extraction_root(app: &AppHandle) -> Result<PathBuf, AppError> {
    match app.path().app_data_dir() {
        Ok(dir) => Ok(dir),
        Err(e) => {
            log::warn!("app data directory unavailable ({e}); falling back to local data dir");
            dirs_next::data_local_dir()
                .map(|dir| dir.join("sherpa-onnx-stt"))
                .ok_or_else(|| {
                    AppError::Runtime("no writable data directory available".to_string())
                })
        }
    }
}

#[tauri::command]
pub async fn resolve_model_path(
    app: AppHandle,
    config: ModelPathConfig,
) -> Result<String, AppError> {
    let store = asset_store(&app)?;
    let root = extraction_root(&app)?;

    let resolved =
        tauri::async_runtime::spawn_blocking(move || stt::resolve_model_dir(&store, &root, &config))
            .await
            .map_err(|e| AppError::Runtime(format!("resolution task failed: {e}")))??;

    Ok(resolved.to_string_lossy().into_owned())
}

#[tauri::command]
pub async fn resolve_audio_path(
    app: AppHandle,
    config: ModelPathConfig,
) -> Result<String, AppError> {
    let store = asset_store(&app)?;
    let root = extraction_root(&app)?;

    let resolved =
        tauri::async_runtime::spawn_blocking(move || stt::resolve_audio_file(&store, &root, &config))
            .await
            .map_err(|e| AppError::Runtime(format!("resolution task failed: {e}")))??;

    Ok(resolved.to_string_lossy().into_owned())
}

#[tauri::command]
pub async fn initialize_stt(
    app: AppHandle,
    config: ModelPathConfig,
    prefer_int8: Option<bool>,
    model_kind: Option<ModelKind>,
) -> Result<(), AppError> {
    log::info!(
        "Tauri command initialize_stt invoked: path={}, prefer_int8={prefer_int8:?}, model_kind={model_kind:?}",
        config.path
    );

    let store = asset_store(&app)?;
    let root = extraction_root(&app)?;
    let handle = app.clone();

    tauri::async_runtime::spawn_blocking(move || -> Result<(), AppError> {
        let model_dir = stt::resolve_model_dir(&store, &root, &config)?;
        log::info!("resolved model directory: {}", model_dir.display());

        let engine = handle.state::<SttEngine>();
        engine.initialize(&model_dir, prefer_int8, model_kind.unwrap_or_default())?;
        Ok(())
    })
    .await
    .map_err(|e| AppError::Runtime(format!("initialization task failed: {e}")))?
}

#[tauri::command]
pub async fn transcribe_file(
    app: AppHandle,
    config: ModelPathConfig,
) -> Result<String, AppError> {
    let store = asset_store(&app)?;
    let root = extraction_root(&app)?;
    let handle = app.clone();

    tauri::async_runtime::spawn_blocking(move || -> Result<String, AppError> {
        let audio_path = stt::resolve_audio_file(&store, &root, &config)?;
        let engine = handle.state::<SttEngine>();
        Ok(engine.transcribe_file(&audio_path)?)
    })
    .await
    .map_err(|e| AppError::Runtime(format!("transcription task failed: {e}")))?
}

#[tauri::command]
pub fn unload_stt(state: tauri::State<'_, SttEngine>) {
    state.release();
}

#[tauri::command]
pub fn is_engine_ready(state: tauri::State<'_, SttEngine>) -> bool {
    state.is_ready()
}

#[tauri::command]
pub fn get_model_path(app: AppHandle) -> Option<String> {
    crate::settings::get_settings(&app).model_path
}

#[tauri::command]
pub fn set_model_path(app: AppHandle, path: String) -> Result<(), AppError> {
    let p = std::path::PathBuf::from(&path);
    if !p.exists() || !p.is_dir() {
        return Err(AppError::Settings(
            "Path does not exist or is not a directory".to_string(),
        ));
    }

    let settings = crate::settings::Settings {
        model_path: Some(path),
        ..crate::settings::get_settings(&app)
    };
    crate::settings::save_settings(&app, &settings).map_err(AppError::Settings)
}

#[tauri::command]
pub async fn pick_model_folder(app: AppHandle) -> Result<Option<String>, AppError> {
    use tauri_plugin_dialog::DialogExt;

    let result =
        tauri::async_runtime::spawn_blocking(move || app.dialog().file().blocking_pick_folder())
            .await
            .map_err(|e| AppError::Runtime(format!("Dialog task failed: {e}")))?;

    Ok(result.map(|p| p.to_string()))
}

#[tauri::command]
pub fn reset_settings(app: AppHandle) -> Result<(), AppError> {
    let settings = crate::settings::Settings::default();
    crate::settings::save_settings(&app, &settings).map_err(AppError::Settings)
}
