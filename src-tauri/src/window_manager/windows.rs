use tauri::WebviewWindow;
use windows::Win32::Foundation::{HWND, POINT};
use windows::Win32::Graphics::Dwm::DwmExtendFrameIntoClientArea;
use windows::Win32::Graphics::Gdi::{
    GetMonitorInfoW, MonitorFromPoint, MONITORINFO, MONITOR_DEFAULTTONEAREST,
};
use windows::Win32::UI::Controls::MARGINS;
use windows::Win32::UI::WindowsAndMessaging::{
    GetWindowLongW, SetWindowLongW, SetWindowPos, GWL_EXSTYLE, HWND_BOTTOM, SWP_FRAMECHANGED,
    SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOSIZE, WS_EX_LAYERED, WS_EX_NOACTIVATE, WS_EX_TOOLWINDOW,
};

use crate::geometry::{DisplayWorkArea, ScreenPoint};

/// Get the HWND from a Tauri WebviewWindow.
fn get_hwnd(window: &WebviewWindow) -> Result<HWND, Box<dyn std::error::Error>> {
    let hwnd_raw = window.hwnd()?;
    Ok(HWND(hwnd_raw.0))
}

/// Set the `set` bits and clear the `clear` bits of the extended style.
///
/// `SWP_FRAMECHANGED` commits the change; the window is pushed to the
/// bottom of the z-order so widgets sit just above the wallpaper.
fn update_ex_style(hwnd: HWND, set: u32, clear: u32) -> Result<(), Box<dyn std::error::Error>> {
    unsafe {
        let current = GetWindowLongW(hwnd, GWL_EXSTYLE) as u32;
        let next = (current | set) & !clear;
        if next == current {
            return Ok(());
        }
        SetWindowLongW(hwnd, GWL_EXSTYLE, next as i32);
        SetWindowPos(
            hwnd,
            HWND_BOTTOM,
            0,
            0,
            0,
            0,
            SWP_NOMOVE | SWP_NOSIZE | SWP_FRAMECHANGED | SWP_NOACTIVATE,
        )?;
    }
    Ok(())
}

/// Extend the DWM glass frame across the entire client area so that
/// CSS transparent backgrounds composite correctly with per-pixel alpha.
fn extend_dwm_frame(hwnd: HWND) -> Result<(), Box<dyn std::error::Error>> {
    unsafe {
        let margins = MARGINS {
            cxLeftWidth: -1,
            cxRightWidth: -1,
            cyTopHeight: -1,
            cyBottomHeight: -1,
        };
        DwmExtendFrameIntoClientArea(hwnd, &margins)?;
    }
    Ok(())
}

/// Apply the native styles the widget overlay needs: hidden from Alt+Tab,
/// layered for per-pixel alpha, and never activated on click.
///
/// Click-through itself is not set here; the input router owns it.
pub fn prepare_overlay(window: &WebviewWindow) -> Result<(), Box<dyn std::error::Error>> {
    let hwnd = get_hwnd(window)?;
    update_ex_style(
        hwnd,
        WS_EX_TOOLWINDOW.0 | WS_EX_LAYERED.0 | WS_EX_NOACTIVATE.0,
        0,
    )?;
    extend_dwm_frame(hwnd)?;
    Ok(())
}

/// Toggle `WS_EX_NOACTIVATE`. Tauri's focusable flag alone still lets a
/// click activate the window on Windows.
pub fn set_no_activate(
    window: &WebviewWindow,
    no_activate: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let hwnd = get_hwnd(window)?;
    if no_activate {
        update_ex_style(hwnd, WS_EX_NOACTIVATE.0, 0)
    } else {
        update_ex_style(hwnd, 0, WS_EX_NOACTIVATE.0)
    }
}

/// Work area (`rcWork`, taskbar excluded) of the monitor nearest to `point`.
pub fn work_area_near(point: ScreenPoint) -> Option<DisplayWorkArea> {
    unsafe {
        let monitor = MonitorFromPoint(
            POINT {
                x: point.x,
                y: point.y,
            },
            MONITOR_DEFAULTTONEAREST,
        );
        if monitor.is_invalid() {
            return None;
        }

        let mut info = MONITORINFO {
            cbSize: std::mem::size_of::<MONITORINFO>() as u32,
            ..Default::default()
        };
        if !GetMonitorInfoW(monitor, &mut info).as_bool() {
            return None;
        }

        let rect = info.rcWork;
        Some(DisplayWorkArea::new(
            rect.left,
            rect.top,
            (rect.right - rect.left).max(0) as u32,
            (rect.bottom - rect.top).max(0) as u32,
        ))
    }
}
