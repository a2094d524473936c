//! Overlay geometry.
//!
//! Two unit systems meet here. Window, cursor and display rects
//! ([`ScreenPoint`], [`WindowRect`], [`DisplayWorkArea`]) are physical
//! screen pixels, as the platform reports them. Everything content reports
//! or receives ([`WidgetBounds`], hit regions, cursor samples) is in CSS
//! pixels relative to the window origin. Conversion uses the window's scale
//! factor and happens at two places only: auto-fit scales content extents up
//! before sizing the window, and the cursor loop scales pointer offsets down
//! before building a sample.

use serde::{Deserialize, Serialize};

use crate::error::OverlayError;

/// A point in screen (physical pixel) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Authoritative screen geometry of the overlay window, in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl WindowRect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(
            self.x + (self.width / 2) as i32,
            self.y + (self.height / 2) as i32,
        )
    }

    /// Summed absolute per-field difference between two rects.
    pub fn delta(&self, other: &WindowRect) -> u64 {
        let dx = (i64::from(self.x) - i64::from(other.x)).unsigned_abs();
        let dy = (i64::from(self.y) - i64::from(other.y)).unsigned_abs();
        let dw = (i64::from(self.width) - i64::from(other.width)).unsigned_abs();
        let dh = (i64::from(self.height) - i64::from(other.height)).unsigned_abs();
        dx + dy + dw + dh
    }
}

/// Bounding box of visible widgets, in window-local CSS pixels, as reported
/// by the content layer. Values may be fractional.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WidgetBounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl WidgetBounds {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Reject non-finite fields and empty extents.
    pub fn validate(&self) -> Result<(), OverlayError> {
        let fields = [self.left, self.top, self.width, self.height];
        if fields.iter().any(|v| !v.is_finite()) {
            return Err(OverlayError::MalformedGeometry(format!(
                "non-finite bounds {self:?}"
            )));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(OverlayError::MalformedGeometry(format!(
                "empty bounds {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Half-open containment test for a window-local CSS-pixel point.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x < self.left + self.width && y >= self.top && y < self.top + self.height
    }
}

/// Usable rectangle of one display, excluding taskbars and menu bars.
/// Physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayWorkArea {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl DisplayWorkArea {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, point: ScreenPoint) -> bool {
        let right = i64::from(self.x) + i64::from(self.width);
        let bottom = i64::from(self.y) + i64::from(self.height);
        i64::from(point.x) >= i64::from(self.x)
            && i64::from(point.x) < right
            && i64::from(point.y) >= i64::from(self.y)
            && i64::from(point.y) < bottom
    }

    /// Squared distance from `point` to the closest point of this area.
    /// Zero when the point lies inside.
    pub fn distance_sq(&self, point: ScreenPoint) -> i64 {
        let left = i64::from(self.x);
        let top = i64::from(self.y);
        let right = left + i64::from(self.width);
        let bottom = top + i64::from(self.height);
        let px = i64::from(point.x);
        let py = i64::from(point.y);

        let dx = if px < left {
            left - px
        } else if px >= right {
            px - right + 1
        } else {
            0
        };
        let dy = if py < top {
            top - py
        } else if py >= bottom {
            py - bottom + 1
        } else {
            0
        };
        dx * dx + dy * dy
    }
}
