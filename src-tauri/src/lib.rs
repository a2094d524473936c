pub mod auto_fit;
pub mod commands;
pub mod config;
pub mod controller;
pub mod cursor;
pub mod display;
pub mod error;
pub mod geometry;
pub mod hover;
pub mod input_routing;
pub mod settings;
pub mod tray;
pub mod window_manager;

#[cfg(test)]
pub(crate) mod testing;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tauri::webview::WebviewWindowBuilder;
use tauri::{Emitter, Manager, WebviewUrl, WebviewWindow, WindowEvent};
use tauri_plugin_sql::DbInstances;
use tokio::sync::mpsc;

use crate::auto_fit::BoundsController;
use crate::commands::OverlayChannel;
use crate::config::OverlayConfig;
use crate::controller::{OverlayController, OverlayMessage, OverlaySender};
use crate::cursor::{BroadcastHandle, CursorBroadcaster, CURSOR_SAMPLE_EVENT};
use crate::window_manager::{TauriOverlay, OVERLAY_LABEL};

/// Placeholder size; the auto-fit controller shrinks the window to its
/// content once the first bounds report arrives.
const INITIAL_SIZE: (f64, f64) = (1280.0, 720.0);

/// Stop handle of the cursor loop bound to the overlay window.
pub struct CursorLoop(pub Mutex<Option<BroadcastHandle>>);

/// Create the single widget overlay window.
///
/// Created hidden and transparent; it is shown once platform styling and
/// the initial click-through state have been applied.
fn create_overlay_window(app: &tauri::AppHandle) -> Result<WebviewWindow, Box<dyn std::error::Error>> {
    let url = WebviewUrl::App(PathBuf::from("index.html"));
    let (w, h) = INITIAL_SIZE;

    let window = WebviewWindowBuilder::new(app, OVERLAY_LABEL, url)
        .title("")
        .transparent(true)
        .decorations(false)
        .shadow(false)
        .skip_taskbar(true)
        .resizable(false)
        .focused(false)
        .visible(false)
        .inner_size(w, h)
        .center()
        .always_on_bottom(true)
        .build()?;

    #[cfg(target_os = "windows")]
    if let Err(e) = window_manager::windows::prepare_overlay(&window) {
        log::warn!("Failed to apply Win32 overlay styles: {e}");
    }

    #[cfg(target_os = "macos")]
    if let Err(e) = window_manager::macos::prepare_overlay(&window) {
        log::warn!("Failed to configure NSWindow: {e}");
    }

    Ok(window)
}

fn load_config(app: &tauri::AppHandle) -> OverlayConfig {
    let db_instances = app.state::<DbInstances>();
    match tauri::async_runtime::block_on(settings::load_overlay_config(&db_instances)) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Falling back to default overlay config: {e}");
            OverlayConfig::default()
        }
    }
}

/// Start the controller task and the cursor loop for `window`.
fn start_overlay(
    app: &tauri::AppHandle,
    window: &WebviewWindow,
    config: &OverlayConfig,
) -> (OverlaySender, BroadcastHandle) {
    let overlay = Arc::new(TauriOverlay::new(window.clone()));
    let strategy = config.strategy();
    log::info!("Input routing strategy: {strategy:?}");

    let (tx, rx) = mpsc::unbounded_channel();
    let mut controller = OverlayController::new(
        overlay.clone(),
        overlay.clone(),
        strategy.router(),
        BoundsController::new(config.fit_padding, config.jitter_threshold),
    );
    // Click-through before the window is ever shown.
    controller.initialize();
    tauri::async_runtime::spawn(controller.run(rx));

    let emitter = app.clone();
    let samples = tx.clone();
    let broadcaster = CursorBroadcaster::new(overlay, config.cursor_poll_interval(), move |sample| {
        let _ = emitter.emit_to(OVERLAY_LABEL, CURSOR_SAMPLE_EVENT, sample);
        let _ = samples.send(OverlayMessage::Cursor(sample));
    });
    let (handle, task) = broadcaster.start();
    tauri::async_runtime::spawn(task);

    (tx, handle)
}

/// Tear down everything tied to the overlay window. Safe to call twice.
fn on_overlay_destroyed(app: &tauri::AppHandle) {
    if let Ok(mut guard) = app.state::<CursorLoop>().0.lock() {
        if let Some(handle) = guard.as_mut() {
            handle.stop();
        }
    }
    let _ = app.state::<OverlayChannel>().send(OverlayMessage::Shutdown);
    log::info!("Overlay window destroyed");
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    tauri::Builder::default()
        .plugin(
            tauri_plugin_sql::Builder::default()
                .add_migrations(settings::DB_URL, settings::migrations())
                .build(),
        )
        .invoke_handler(tauri::generate_handler![
            commands::report_hover,
            commands::report_content_bounds,
            commands::report_hit_regions,
            commands::request_interactive,
            commands::request_focus,
            settings::get_setting,
            settings::set_setting,
            settings::get_all_settings,
        ])
        .setup(|app| {
            let config = load_config(app.handle());
            let window = create_overlay_window(app.handle())?;

            let (tx, handle) = start_overlay(app.handle(), &window, &config);
            app.manage(OverlayChannel(tx));
            app.manage(CursorLoop(Mutex::new(Some(handle))));

            let app_handle = app.handle().clone();
            window.on_window_event(move |event| {
                if let WindowEvent::Destroyed = event {
                    on_overlay_destroyed(&app_handle);
                }
            });

            if let Err(e) = tray::setup_tray(app) {
                log::warn!("Failed to create tray icon: {e}");
            }

            window.show()?;
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
