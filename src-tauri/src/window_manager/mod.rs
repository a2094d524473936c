#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(target_os = "windows")]
pub mod windows;

mod tauri_overlay;

pub use tauri_overlay::TauriOverlay;

use crate::error::OverlayError;
use crate::geometry::{ScreenPoint, WindowRect};

/// Label of the single widget overlay window.
pub const OVERLAY_LABEL: &str = "overlay";

/// How the native window treats mouse input.
///
/// Windows that report [`OverlayWindow::forwards_moves`] honour `forward`
/// while `ignore` is set (clicks pass through, moves still reach content).
/// Elsewhere only `ignore` has an effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseRouting {
    pub ignore: bool,
    pub forward: bool,
}

impl MouseRouting {
    pub const INTERACTIVE: MouseRouting = MouseRouting {
        ignore: false,
        forward: false,
    };
}

/// Platform seam around the overlay window.
///
/// Every controller receives the window through this trait instead of
/// reaching for a global handle. Any method may fail with
/// [`OverlayError::PlatformCallFailed`] once the window has been destroyed.
///
/// Rects and points are physical pixels; see [`crate::geometry`].
pub trait OverlayWindow: Send + Sync {
    /// Current outer geometry in screen coordinates.
    fn outer_rect(&self) -> Result<WindowRect, OverlayError>;

    /// Move and resize the window.
    fn set_rect(&self, rect: WindowRect) -> Result<(), OverlayError>;

    /// Global cursor position in screen coordinates.
    fn cursor_position(&self) -> Result<ScreenPoint, OverlayError>;

    /// Physical pixels per content (CSS) pixel on the window's display.
    fn scale_factor(&self) -> Result<f64, OverlayError>;

    /// Whether pointer moves still reach content while clicks are ignored.
    /// When `false`, hover has to be derived from cursor samples.
    fn forwards_moves(&self) -> bool;

    fn set_mouse_routing(&self, routing: MouseRouting) -> Result<(), OverlayError>;

    /// Allow or forbid the window to take keyboard focus.
    fn set_focusable(&self, focusable: bool) -> Result<(), OverlayError>;

    /// Tell content whether clicks on non-widget regions must be swallowed.
    /// Only used when the window never ignores input at the OS level.
    fn set_click_suppression(&self, suppress: bool) -> Result<(), OverlayError>;
}
