//! In-memory stand-ins for the platform traits, used by unit tests.

use std::sync::Mutex;

use crate::display::{nearest_work_area, DisplayGeometry};
use crate::error::OverlayError;
use crate::geometry::{DisplayWorkArea, ScreenPoint, WindowRect};
use crate::window_manager::{MouseRouting, OverlayWindow};

/// A platform call observed by [`FakeWindow`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SetRect(WindowRect),
    Routing(MouseRouting),
    Focusable(bool),
    ClickSuppression(bool),
}

struct FakeState {
    rect: WindowRect,
    cursor: ScreenPoint,
    destroyed: bool,
    calls: Vec<Call>,
}

/// Recording window. Defaults to scale 1 with working move forwarding.
pub struct FakeWindow {
    state: Mutex<FakeState>,
    scale: f64,
    forwards_moves: bool,
}

impl FakeWindow {
    pub fn new(rect: WindowRect) -> Self {
        Self {
            state: Mutex::new(FakeState {
                rect,
                cursor: ScreenPoint::new(0, 0),
                destroyed: false,
                calls: Vec::new(),
            }),
            scale: 1.0,
            forwards_moves: true,
        }
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Model a window whose click-through swallows moves too.
    pub fn without_forwarding(mut self) -> Self {
        self.forwards_moves = false;
        self
    }

    pub fn rect(&self) -> WindowRect {
        self.state.lock().unwrap().rect
    }

    pub fn move_cursor(&self, x: i32, y: i32) {
        self.state.lock().unwrap().cursor = ScreenPoint::new(x, y);
    }

    pub fn destroy(&self) {
        self.state.lock().unwrap().destroyed = true;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn last_routing(&self) -> Option<MouseRouting> {
        self.calls().into_iter().rev().find_map(|c| match c {
            Call::Routing(r) => Some(r),
            _ => None,
        })
    }

    pub fn last_focusable(&self) -> Option<bool> {
        self.calls().into_iter().rev().find_map(|c| match c {
            Call::Focusable(f) => Some(f),
            _ => None,
        })
    }

    fn record(&self, call: Call) -> Result<(), OverlayError> {
        let mut state = self.state.lock().unwrap();
        if state.destroyed {
            return Err(OverlayError::PlatformCallFailed("window destroyed".into()));
        }
        if let Call::SetRect(rect) = call {
            state.rect = rect;
        }
        state.calls.push(call);
        Ok(())
    }
}

impl OverlayWindow for FakeWindow {
    fn outer_rect(&self) -> Result<WindowRect, OverlayError> {
        let state = self.state.lock().unwrap();
        if state.destroyed {
            return Err(OverlayError::PlatformCallFailed("window destroyed".into()));
        }
        Ok(state.rect)
    }

    fn set_rect(&self, rect: WindowRect) -> Result<(), OverlayError> {
        self.record(Call::SetRect(rect))
    }

    fn cursor_position(&self) -> Result<ScreenPoint, OverlayError> {
        let state = self.state.lock().unwrap();
        if state.destroyed {
            return Err(OverlayError::PlatformCallFailed("window destroyed".into()));
        }
        Ok(state.cursor)
    }

    fn scale_factor(&self) -> Result<f64, OverlayError> {
        let state = self.state.lock().unwrap();
        if state.destroyed {
            return Err(OverlayError::PlatformCallFailed("window destroyed".into()));
        }
        Ok(self.scale)
    }

    fn forwards_moves(&self) -> bool {
        self.forwards_moves
    }

    fn set_mouse_routing(&self, routing: MouseRouting) -> Result<(), OverlayError> {
        self.record(Call::Routing(routing))
    }

    fn set_focusable(&self, focusable: bool) -> Result<(), OverlayError> {
        self.record(Call::Focusable(focusable))
    }

    fn set_click_suppression(&self, suppress: bool) -> Result<(), OverlayError> {
        self.record(Call::ClickSuppression(suppress))
    }
}

/// Fixed set of work areas.
pub struct FakeDisplays {
    pub areas: Vec<DisplayWorkArea>,
}

impl FakeDisplays {
    pub fn single(width: u32, height: u32) -> Self {
        Self {
            areas: vec![DisplayWorkArea::new(0, 0, width, height)],
        }
    }

    pub fn none() -> Self {
        Self { areas: Vec::new() }
    }
}

impl DisplayGeometry for FakeDisplays {
    fn work_area_near(&self, point: ScreenPoint) -> Result<Option<DisplayWorkArea>, OverlayError> {
        Ok(nearest_work_area(point, &self.areas))
    }
}
