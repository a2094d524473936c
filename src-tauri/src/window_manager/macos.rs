use objc2_app_kit::{NSWindow, NSWindowCollectionBehavior};
use objc2_foundation::MainThreadMarker;
use tauri::WebviewWindow;

/// Configure the NSWindow behind the widget overlay:
/// - present on every Space, stationary in Mission Control
/// - skipped by Cmd+` window cycling
/// - no shadow around the transparent frame
///
/// Must run on the main thread (Tauri's `setup` hook does).
pub fn prepare_overlay(window: &WebviewWindow) -> Result<(), Box<dyn std::error::Error>> {
    if MainThreadMarker::new().is_none() {
        return Err("overlay must be prepared on the main thread".into());
    }

    let ns_window_ptr = window.ns_window()?;
    let ns_window: &NSWindow = unsafe { &*(ns_window_ptr as *const NSWindow) };

    ns_window.setCollectionBehavior(
        NSWindowCollectionBehavior::CanJoinAllSpaces
            | NSWindowCollectionBehavior::Stationary
            | NSWindowCollectionBehavior::IgnoresCycle,
    );
    ns_window.setHasShadow(false);

    Ok(())
}
