use tauri::menu::{Menu, MenuItem, PredefinedMenuItem};
use tauri::tray::TrayIconBuilder;
use tauri::{AppHandle, Emitter, Manager};

use crate::commands::OverlayChannel;
use crate::controller::OverlayMessage;
use crate::window_manager::OVERLAY_LABEL;

/// Event telling content to show its settings panel.
pub const OPEN_SETTINGS_EVENT: &str = "open-settings-requested";

/// Holds the tray icon handle so it lives as long as the app.
pub struct TrayState {
    pub tray: tauri::tray::TrayIcon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayAction {
    OpenSettings,
    Quit,
}

/// Map a menu item id to its action.
pub fn action_for(id: &str) -> Option<TrayAction> {
    match id {
        "open_settings" => Some(TrayAction::OpenSettings),
        "quit" => Some(TrayAction::Quit),
        _ => None,
    }
}

fn build_menu(app: &AppHandle) -> Result<Menu<tauri::Wry>, Box<dyn std::error::Error>> {
    let menu = Menu::with_items(
        app,
        &[
            &MenuItem::with_id(app, "open_settings", "Open Settings", true, None::<&str>)?,
            &PredefinedMenuItem::separator(app)?,
            &MenuItem::with_id(app, "quit", "Quit Deskpin", true, None::<&str>)?,
        ],
    )?;
    Ok(menu)
}

fn handle_menu_event(app: &AppHandle, event: tauri::menu::MenuEvent) {
    match action_for(event.id.as_ref()) {
        Some(TrayAction::OpenSettings) => {
            // Interactive first, so the panel is clickable the moment it shows.
            if let Err(e) = app.state::<OverlayChannel>().send(OverlayMessage::OpenSettings) {
                log::warn!("[tray] {e}");
            }
            if let Err(e) = app.emit_to(OVERLAY_LABEL, OPEN_SETTINGS_EVENT, ()) {
                log::warn!("[tray] failed to notify overlay: {e}");
            }
        }
        Some(TrayAction::Quit) => app.exit(0),
        None => {}
    }
}

/// Create the system tray.
pub fn setup_tray(app: &tauri::App) -> Result<(), Box<dyn std::error::Error>> {
    let menu = build_menu(app.handle())?;
    let icon = app
        .default_window_icon()
        .cloned()
        .ok_or("no default window icon configured")?;

    let tray = TrayIconBuilder::new()
        .icon(icon)
        .tooltip("Deskpin")
        .menu(&menu)
        .show_menu_on_left_click(true)
        .on_menu_event(|app, event| {
            handle_menu_event(app, event);
        })
        .build(app)?;

    app.manage(TrayState { tray });

    Ok(())
}
