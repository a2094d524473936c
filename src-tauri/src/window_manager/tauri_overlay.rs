use tauri::{Emitter, PhysicalPosition, PhysicalSize, WebviewWindow};

use super::{MouseRouting, OverlayWindow};
#[cfg(not(target_os = "windows"))]
use crate::display::nearest_work_area;
use crate::display::DisplayGeometry;
use crate::error::OverlayError;
use crate::geometry::{DisplayWorkArea, ScreenPoint, WindowRect};

/// Event telling content whether to swallow clicks outside widgets.
pub const PASSTHROUGH_EVENT: &str = "overlay-passthrough";

/// `set_ignore_cursor_events` drops every pointer event, moves included.
pub const NATIVE_MOVE_FORWARDING: bool = false;

/// [`OverlayWindow`] and [`DisplayGeometry`] backed by a Tauri webview window.
#[derive(Clone)]
pub struct TauriOverlay {
    window: WebviewWindow,
}

impl TauriOverlay {
    pub fn new(window: WebviewWindow) -> Self {
        Self { window }
    }

    #[cfg(not(target_os = "windows"))]
    fn monitor_work_areas(&self) -> Result<Vec<DisplayWorkArea>, OverlayError> {
        let monitors = self.window.available_monitors()?;
        Ok(monitors.iter().map(work_area_of).collect())
    }
}

#[cfg(not(target_os = "windows"))]
fn work_area_of(monitor: &tauri::Monitor) -> DisplayWorkArea {
    let area = monitor.work_area();
    DisplayWorkArea::new(
        area.position.x,
        area.position.y,
        area.size.width,
        area.size.height,
    )
}

impl OverlayWindow for TauriOverlay {
    fn outer_rect(&self) -> Result<WindowRect, OverlayError> {
        let position = self.window.outer_position()?;
        let size = self.window.outer_size()?;
        Ok(WindowRect::new(
            position.x,
            position.y,
            size.width,
            size.height,
        ))
    }

    fn set_rect(&self, rect: WindowRect) -> Result<(), OverlayError> {
        // Size first so the content relayout sees the final extent before the move.
        self.window
            .set_size(PhysicalSize::new(rect.width, rect.height))?;
        self.window
            .set_position(PhysicalPosition::new(rect.x, rect.y))?;
        Ok(())
    }

    fn cursor_position(&self) -> Result<ScreenPoint, OverlayError> {
        let position = self.window.cursor_position()?;
        Ok(ScreenPoint::new(
            position.x.round() as i32,
            position.y.round() as i32,
        ))
    }

    fn scale_factor(&self) -> Result<f64, OverlayError> {
        Ok(self.window.scale_factor()?)
    }

    fn forwards_moves(&self) -> bool {
        NATIVE_MOVE_FORWARDING
    }

    fn set_mouse_routing(&self, routing: MouseRouting) -> Result<(), OverlayError> {
        // `forward` has no native switch here; hover comes from the cursor
        // broadcast loop instead.
        self.window.set_ignore_cursor_events(routing.ignore)?;
        Ok(())
    }

    fn set_focusable(&self, focusable: bool) -> Result<(), OverlayError> {
        self.window.set_focusable(focusable)?;

        #[cfg(target_os = "windows")]
        super::windows::set_no_activate(&self.window, !focusable)
            .map_err(|e| OverlayError::PlatformCallFailed(e.to_string()))?;

        Ok(())
    }

    fn set_click_suppression(&self, suppress: bool) -> Result<(), OverlayError> {
        self.window.emit(PASSTHROUGH_EVENT, suppress)?;
        Ok(())
    }
}

impl DisplayGeometry for TauriOverlay {
    #[cfg(target_os = "windows")]
    fn work_area_near(&self, point: ScreenPoint) -> Result<Option<DisplayWorkArea>, OverlayError> {
        Ok(super::windows::work_area_near(point))
    }

    #[cfg(not(target_os = "windows"))]
    fn work_area_near(&self, point: ScreenPoint) -> Result<Option<DisplayWorkArea>, OverlayError> {
        if let Some(monitor) = self
            .window
            .monitor_from_point(f64::from(point.x), f64::from(point.y))?
        {
            return Ok(Some(work_area_of(&monitor)));
        }
        // Point is off every display: fall back to the closest one.
        let areas = self.monitor_work_areas()?;
        Ok(nearest_work_area(point, &areas))
    }
}
