use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::geometry::{ScreenPoint, WindowRect};
use crate::window_manager::OverlayWindow;

/// One display-refresh period.
pub const CURSOR_POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Event carrying a [`CursorSample`] to content.
pub const CURSOR_SAMPLE_EVENT: &str = "cursor-sample";

/// Pointer position relative to the overlay window's origin, in CSS pixels
/// so content can compare it with its own layout.
/// Serialized to camelCase for the content layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorSample {
    pub x: f64,
    pub y: f64,
    pub inside_window: bool,
}

impl CursorSample {
    /// Build a sample from a physical cursor position and window rect.
    /// Containment is decided in physical pixels, before scaling.
    pub fn relative_to(cursor: ScreenPoint, rect: &WindowRect, scale: f64) -> Self {
        let dx = i64::from(cursor.x) - i64::from(rect.x);
        let dy = i64::from(cursor.y) - i64::from(rect.y);
        let inside_window =
            dx >= 0 && dy >= 0 && dx < i64::from(rect.width) && dy < i64::from(rect.height);

        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        Self {
            x: dx as f64 / scale,
            y: dy as f64 / scale,
            inside_window,
        }
    }
}

/// Drops samples equal to the most recently emitted one.
#[derive(Debug, Default)]
pub struct SampleDeduper {
    last_emitted: Option<CursorSample>,
}

impl SampleDeduper {
    pub fn admit(&mut self, sample: CursorSample) -> Option<CursorSample> {
        if self.last_emitted == Some(sample) {
            return None;
        }
        self.last_emitted = Some(sample);
        Some(sample)
    }
}

/// Cursor Broadcast Loop.
///
/// Polls the global cursor at a fixed cadence and hands every changed
/// [`CursorSample`] to `sink`. Each tick is a few platform queries and a
/// comparison; failures (window already gone) skip the tick.
pub struct CursorBroadcaster<F> {
    window: Arc<dyn OverlayWindow>,
    interval: Duration,
    dedup: SampleDeduper,
    sink: F,
}

impl<F> CursorBroadcaster<F>
where
    F: FnMut(CursorSample) + Send + 'static,
{
    pub fn new(window: Arc<dyn OverlayWindow>, interval: Duration, sink: F) -> Self {
        Self {
            window,
            interval,
            dedup: SampleDeduper::default(),
            sink,
        }
    }

    /// Run a single poll. Returns the sample if one was emitted.
    pub fn tick(&mut self) -> Option<CursorSample> {
        let cursor = match self.window.cursor_position() {
            Ok(p) => p,
            Err(e) => {
                log::trace!("[cursor] cursor query failed: {e}");
                return None;
            }
        };
        let rect = match self.window.outer_rect() {
            Ok(r) => r,
            Err(e) => {
                log::trace!("[cursor] window rect query failed: {e}");
                return None;
            }
        };
        let scale = match self.window.scale_factor() {
            Ok(s) => s,
            Err(e) => {
                log::trace!("[cursor] scale factor query failed: {e}");
                return None;
            }
        };

        let sample = self
            .dedup
            .admit(CursorSample::relative_to(cursor, &rect, scale))?;
        (self.sink)(sample);
        Some(sample)
    }

    /// Split into a stop handle and the polling future. The caller spawns
    /// the future on whichever runtime owns the window.
    pub fn start(self) -> (BroadcastHandle, impl Future<Output = ()> + Send + 'static) {
        let (stop_tx, stop_rx) = watch::channel(false);
        (
            BroadcastHandle {
                stop: Some(stop_tx),
            },
            self.run(stop_rx),
        )
    }

    async fn run(mut self, mut stop: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        log::debug!("[cursor] broadcast loop started ({:?})", self.interval);

        loop {
            tokio::select! {
                biased;
                changed = stop.changed() => {
                    // A dropped handle counts as a stop request.
                    if changed.is_err() || *stop.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    self.tick();
                }
            }
        }

        log::debug!("[cursor] broadcast loop stopped");
    }
}

/// Owner-side handle of a running broadcast loop. Tied to one window.
#[derive(Debug)]
pub struct BroadcastHandle {
    stop: Option<watch::Sender<bool>>,
}

impl BroadcastHandle {
    /// Stop the loop. Returns `false` if it was already stopped.
    pub fn stop(&mut self) -> bool {
        match self.stop.take() {
            Some(tx) => {
                let _ = tx.send(true);
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.stop.is_some()
    }
}
