use crate::display::DisplayGeometry;
use crate::error::OverlayError;
use crate::geometry::{DisplayWorkArea, WidgetBounds, WindowRect};
use crate::window_manager::OverlayWindow;

/// Margin added on every side of the reported content, in CSS pixels.
pub const DEFAULT_FIT_PADDING: f64 = 28.0;

/// Candidates closer than this (summed per-field delta, physical pixels)
/// are not applied.
pub const DEFAULT_JITTER_THRESHOLD: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitOutcome {
    Applied(WindowRect),
    /// Candidate within the jitter threshold of the current rect.
    Suppressed { delta: u64 },
}

/// Auto-Fit Bounds Controller.
///
/// Resizes the overlay to hug its content plus padding, centered in the work
/// area of the display nearest the window's center. Only the reported
/// width/height are used: content position inside the window depends on
/// the window size, so feeding it back would loop.
#[derive(Debug, Clone)]
pub struct BoundsController {
    padding: f64,
    jitter_threshold: u64,
}

impl Default for BoundsController {
    fn default() -> Self {
        Self::new(DEFAULT_FIT_PADDING, DEFAULT_JITTER_THRESHOLD)
    }
}

impl BoundsController {
    pub fn new(padding: f64, jitter_threshold: u32) -> Self {
        Self {
            padding,
            jitter_threshold: u64::from(jitter_threshold),
        }
    }

    pub fn apply_content_bounds(
        &self,
        window: &dyn OverlayWindow,
        displays: &dyn DisplayGeometry,
        bounds: &WidgetBounds,
    ) -> Result<FitOutcome, OverlayError> {
        bounds.validate()?;

        let current = window.outer_rect()?;
        let center = current.center();
        let area = displays
            .work_area_near(center)?
            .ok_or(OverlayError::DisplayResolutionFailed {
                x: center.x,
                y: center.y,
            })?;

        let scale = window.scale_factor()?;
        let candidate = fit_rect(bounds, &area, self.padding, scale);
        let delta = current.delta(&candidate);
        if delta < self.jitter_threshold {
            log::trace!("[auto-fit] suppressed {candidate:?} (delta {delta})");
            return Ok(FitOutcome::Suppressed { delta });
        }

        window.set_rect(candidate)?;
        Ok(FitOutcome::Applied(candidate))
    }
}

/// Padded content size, clamped to the work area and centered in it.
///
/// `bounds` and `padding` are CSS pixels; `scale` converts them to the
/// physical pixels of `area` and the returned rect.
pub fn fit_rect(
    bounds: &WidgetBounds,
    area: &DisplayWorkArea,
    padding: f64,
    scale: f64,
) -> WindowRect {
    let scale = if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    };
    let width = padded_extent(bounds.width, padding, scale, area.width);
    let height = padded_extent(bounds.height, padding, scale, area.height);

    let x = i64::from(area.x) + (i64::from(area.width) - i64::from(width)) / 2;
    let y = i64::from(area.y) + (i64::from(area.height) - i64::from(height)) / 2;

    WindowRect::new(x as i32, y as i32, width, height)
}

fn padded_extent(extent: f64, padding: f64, scale: f64, available: u32) -> u32 {
    let max = f64::from(available.max(1));
    ((extent + 2.0 * padding) * scale).round().clamp(1.0, max) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeDisplays, FakeWindow};

    fn full_hd_window() -> FakeWindow {
        FakeWindow::new(WindowRect::new(0, 0, 1920, 1080))
    }

    #[test]
    fn centers_padded_content_on_work_area() {
        let win = full_hd_window();
        let displays = FakeDisplays::single(1920, 1080);
        let bounds = WidgetBounds::new(860.0, 480.0, 200.0, 120.0);

        let outcome = BoundsController::default()
            .apply_content_bounds(&win, &displays, &bounds)
            .unwrap();

        let expected = WindowRect::new(832, 452, 256, 176);
        assert_eq!(outcome, FitOutcome::Applied(expected));
        assert_eq!(win.rect(), expected);
    }

    #[test]
    fn reported_position_is_ignored() {
        let displays = FakeDisplays::single(1920, 1080);
        let controller = BoundsController::default();

        let a = full_hd_window();
        controller
            .apply_content_bounds(&a, &displays, &WidgetBounds::new(0.0, 0.0, 200.0, 120.0))
            .unwrap();
        let b = full_hd_window();
        controller
            .apply_content_bounds(&b, &displays, &WidgetBounds::new(500.0, 90.0, 200.0, 120.0))
            .unwrap();

        assert_eq!(a.rect(), b.rect());
    }

    #[test]
    fn one_unit_change_does_not_move_the_window() {
        // Odd work-area width: 256 and 257 wide both center at x=832.
        let win = FakeWindow::new(WindowRect::new(0, 0, 1921, 1080));
        let displays = FakeDisplays::single(1921, 1080);
        let controller = BoundsController::default();

        controller
            .apply_content_bounds(&win, &displays, &WidgetBounds::new(0.0, 0.0, 200.0, 120.0))
            .unwrap();
        let before = win.rect();
        win.clear_calls();

        let outcome = controller
            .apply_content_bounds(&win, &displays, &WidgetBounds::new(0.0, 0.0, 201.0, 120.0))
            .unwrap();

        assert_eq!(outcome, FitOutcome::Suppressed { delta: 1 });
        assert_eq!(win.rect(), before);
        assert!(win.calls().is_empty());
    }

    #[test]
    fn sub_unit_jitter_sequence_is_idempotent() {
        let win = full_hd_window();
        let displays = FakeDisplays::single(1920, 1080);
        let controller = BoundsController::default();
        controller
            .apply_content_bounds(&win, &displays, &WidgetBounds::new(0.0, 0.0, 200.0, 120.0))
            .unwrap();
        let before = win.rect();

        for wobble in [0.1, -0.2, 0.4, -0.4, 0.3, 0.0] {
            let bounds = WidgetBounds::new(0.0, 0.0, 200.0 + wobble, 120.0 - wobble);
            let outcome = controller
                .apply_content_bounds(&win, &displays, &bounds)
                .unwrap();
            assert!(matches!(outcome, FitOutcome::Suppressed { .. }));
        }
        assert_eq!(win.rect(), before);
    }

    #[test]
    fn never_exceeds_work_area() {
        let displays = FakeDisplays {
            areas: vec![DisplayWorkArea::new(0, 0, 1366, 728)],
        };
        let controller = BoundsController::default();

        for (w, h) in [
            (1.0, 1.0),
            (500.0, 300.0),
            (1366.0, 728.0),
            (1400.0, 10.0),
            (10.0, 9000.0),
            (1e9, 1e9),
        ] {
            let win = FakeWindow::new(WindowRect::new(100, 100, 400, 300));
            controller
                .apply_content_bounds(&win, &displays, &WidgetBounds::new(0.0, 0.0, w, h))
                .unwrap();
            let rect = win.rect();
            assert!(rect.width <= 1366 && rect.width >= 1, "{rect:?}");
            assert!(rect.height <= 728 && rect.height >= 1, "{rect:?}");
            assert!(rect.x >= 0 && rect.y >= 0, "{rect:?}");
        }
    }

    #[test]
    fn malformed_bounds_leave_window_untouched() {
        let win = full_hd_window();
        let displays = FakeDisplays::single(1920, 1080);
        let controller = BoundsController::default();

        for bounds in [
            WidgetBounds::new(0.0, 0.0, 0.0, 100.0),
            WidgetBounds::new(0.0, 0.0, 100.0, -5.0),
            WidgetBounds::new(f64::NAN, 0.0, 100.0, 100.0),
            WidgetBounds::new(0.0, 0.0, f64::INFINITY, 100.0),
        ] {
            let err = controller
                .apply_content_bounds(&win, &displays, &bounds)
                .unwrap_err();
            assert!(matches!(err, OverlayError::MalformedGeometry(_)));
        }
        assert!(win.calls().is_empty());
        assert_eq!(win.rect(), WindowRect::new(0, 0, 1920, 1080));
    }

    #[test]
    fn unresolvable_display_abandons_the_call() {
        let win = full_hd_window();
        let err = BoundsController::default()
            .apply_content_bounds(
                &win,
                &FakeDisplays::none(),
                &WidgetBounds::new(0.0, 0.0, 200.0, 120.0),
            )
            .unwrap_err();

        assert!(matches!(err, OverlayError::DisplayResolutionFailed { .. }));
        assert!(win.calls().is_empty());
    }

    #[test]
    fn destroyed_window_reports_platform_failure() {
        let win = full_hd_window();
        win.destroy();
        let err = BoundsController::default()
            .apply_content_bounds(
                &win,
                &FakeDisplays::single(1920, 1080),
                &WidgetBounds::new(0.0, 0.0, 200.0, 120.0),
            )
            .unwrap_err();
        assert!(matches!(err, OverlayError::PlatformCallFailed(_)));
    }

    #[test]
    fn follows_the_display_under_the_window_center() {
        let displays = FakeDisplays {
            areas: vec![
                DisplayWorkArea::new(0, 0, 1920, 1040),
                DisplayWorkArea::new(1920, 0, 2560, 1400),
            ],
        };
        let win = FakeWindow::new(WindowRect::new(2500, 300, 400, 300));

        BoundsController::default()
            .apply_content_bounds(&win, &displays, &WidgetBounds::new(0.0, 0.0, 200.0, 120.0))
            .unwrap();

        assert_eq!(win.rect(), WindowRect::new(1920 + 1152, 612, 256, 176));
    }

    #[test]
    fn fit_rect_rounds_padded_extent() {
        let area = DisplayWorkArea::new(0, 0, 1000, 1000);
        let rect = fit_rect(&WidgetBounds::new(0.0, 0.0, 99.4, 99.6), &area, 0.0, 1.0);
        assert_eq!((rect.width, rect.height), (99, 100));
    }

    #[test]
    fn scaled_display_sizes_window_in_physical_pixels() {
        // 1920x1080 CSS pixels at scale 2.
        let win = FakeWindow::new(WindowRect::new(0, 0, 3840, 2160)).with_scale(2.0);
        let displays = FakeDisplays::single(3840, 2160);
        let bounds = WidgetBounds::new(860.0, 480.0, 200.0, 120.0);

        let outcome = BoundsController::default()
            .apply_content_bounds(&win, &displays, &bounds)
            .unwrap();

        let expected = WindowRect::new(1664, 904, 512, 352);
        assert_eq!(outcome, FitOutcome::Applied(expected));
        assert_eq!(win.rect(), expected);
    }

    #[test]
    fn scaled_refit_of_same_content_is_stable() {
        let win = FakeWindow::new(WindowRect::new(0, 0, 2880, 1620)).with_scale(1.5);
        let displays = FakeDisplays::single(2880, 1620);
        let controller = BoundsController::default();
        let bounds = WidgetBounds::new(0.0, 0.0, 200.0, 120.0);

        controller
            .apply_content_bounds(&win, &displays, &bounds)
            .unwrap();
        assert_eq!(win.rect(), WindowRect::new(1248, 678, 384, 264));

        let again = controller
            .apply_content_bounds(&win, &displays, &bounds)
            .unwrap();
        assert_eq!(again, FitOutcome::Suppressed { delta: 0 });
    }
}
