use thiserror::Error;

/// Failures inside the overlay core. None of them is fatal: callers log and
/// keep the last known-good window state.
#[derive(Debug, Error)]
pub enum OverlayError {
    /// The native window call failed, usually because the window is gone.
    #[error("platform call failed: {0}")]
    PlatformCallFailed(String),

    #[error("malformed geometry: {0}")]
    MalformedGeometry(String),

    #[error("no display found near ({x}, {y})")]
    DisplayResolutionFailed { x: i32, y: i32 },
}

impl From<tauri::Error> for OverlayError {
    fn from(e: tauri::Error) -> Self {
        OverlayError::PlatformCallFailed(e.to_string())
    }
}
