use tauri::{App, AppHandle, Builder, Manager};

use crate::commands;
use crate::engine::SttEngine;
use crate::stt::ModelKind;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let context = tauri::generate_context!();

    let app = Builder::default()
        .plugin(
            tauri_plugin_log::Builder::new()
                .targets([
                    tauri_plugin_log::Target::new(tauri_plugin_log::TargetKind::Stdout),
                    tauri_plugin_log::Target::new(tauri_plugin_log::TargetKind::LogDir {
                        file_name: None,
                    }),
                ])
                .rotation_strategy(tauri_plugin_log::RotationStrategy::KeepAll)
                .max_file_size(2_000_000)
                .timezone_strategy(tauri_plugin_log::TimezoneStrategy::UseLocal)
                .level(log::LevelFilter::Info)
                .build(),
        )
        .plugin(tauri_plugin_store::Builder::default().build())
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            app.manage(SttEngine::new());
            setup(app)
        })
        .invoke_handler(tauri::generate_handler![
            commands::resolve_model_path,
            commands::resolve_audio_path,
            commands::initialize_stt,
            commands::transcribe_file,
            commands::unload_stt,
            commands::is_engine_ready,
            commands::get_model_path,
            commands::set_model_path,
            commands::pick_model_folder,
            commands::reset_settings
        ])
        .build(context)
        .expect("error while running tauri application");

    app.run(|_app_handle, _event| {});
}

fn setup(app: &mut App) -> Result<(), Box<dyn std::error::Error>> {
    prewarm_engine(app.handle().clone());
    Ok(())
}

/// Initialize the engine in the background when the user has already picked
/// a model, so the first transcription does not pay the load cost.
fn prewarm_engine(app_handle: AppHandle) {
    std::thread::spawn(move || {
        let Some(config) = crate::settings::default_model_config(&app_handle) else {
            log::info!("no stored model path; skipping engine pre-warm");
            return;
        };

        let settings = crate::settings::get_settings(&app_handle);
        let result = tauri::async_runtime::block_on(commands::initialize_stt(
            app_handle.clone(),
            config,
            settings.prefer_int8,
            settings.model_kind.or(Some(ModelKind::Auto)),
        ));

        match result {
            Ok(()) => log::info!("engine pre-warmed successfully"),
            Err(err) => log::warn!("engine pre-warm failed: {err}"),
        }
    });
}
