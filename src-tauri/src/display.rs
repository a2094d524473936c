use crate::error::OverlayError;
use crate::geometry::{DisplayWorkArea, ScreenPoint};

/// Display Geometry Provider.
///
/// Answers "which work area is nearest to this screen point". Results are
/// never cached: displays can be hot-plugged between two queries.
pub trait DisplayGeometry: Send + Sync {
    /// Work area of the display nearest to `point`, or `None` when no display
    /// can be resolved at all.
    fn work_area_near(&self, point: ScreenPoint) -> Result<Option<DisplayWorkArea>, OverlayError>;
}

/// Pick the work area containing `point`, else the one closest to it.
///
/// Ties keep the first candidate, so callers that list the primary display
/// first get it as the fallback.
pub fn nearest_work_area(
    point: ScreenPoint,
    areas: &[DisplayWorkArea],
) -> Option<DisplayWorkArea> {
    areas
        .iter()
        .copied()
        .min_by_key(|area| area.distance_sq(point))
}
