use std::sync::Arc;

use tokio::sync::mpsc;

use crate::auto_fit::{BoundsController, FitOutcome};
use crate::cursor::CursorSample;
use crate::display::DisplayGeometry;
use crate::error::OverlayError;
use crate::geometry::WidgetBounds;
use crate::hover::HoverAggregator;
use crate::input_routing::{InputRouter, InteractivityState};
use crate::window_manager::OverlayWindow;

/// Everything the controller reacts to. Producers fire and forget.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayMessage {
    /// Pointer entered or left a widget.
    Hover(bool),
    /// Union of visible widget geometry changed.
    ContentBounds(WidgetBounds),
    /// Per-widget hit regions, window-local.
    HitRegions(Vec<WidgetBounds>),
    /// Keep the window interactive regardless of the pointer.
    RequestInteractive(bool),
    /// A text input gained or lost keyboard focus.
    RequestFocus(bool),
    Cursor(CursorSample),
    /// The tray asked to open settings.
    OpenSettings,
    Shutdown,
}

/// Sending half handed to Tauri commands, the tray and the cursor loop.
pub type OverlaySender = mpsc::UnboundedSender<OverlayMessage>;

/// Single consumer of [`OverlayMessage`]s and the only writer of the
/// window's interactivity and geometry.
pub struct OverlayController {
    window: Arc<dyn OverlayWindow>,
    displays: Arc<dyn DisplayGeometry>,
    router: Box<dyn InputRouter>,
    hover: HoverAggregator,
    bounds: BoundsController,
}

impl OverlayController {
    pub fn new(
        window: Arc<dyn OverlayWindow>,
        displays: Arc<dyn DisplayGeometry>,
        router: Box<dyn InputRouter>,
        bounds: BoundsController,
    ) -> Self {
        let hover = HoverAggregator::new(router.strategy().hover_policy(window.forwards_moves()));
        Self {
            window,
            displays,
            router,
            hover,
            bounds,
        }
    }

    /// Apply the resting state: click-through, no keyboard focus.
    pub fn initialize(&mut self) {
        self.router.set_focusable(self.window.as_ref(), false);
        self.sync_interactivity();
    }

    pub fn state(&self) -> Option<InteractivityState> {
        self.router.state()
    }

    /// Handle one message. Returns `false` once the controller should stop.
    pub fn handle(&mut self, msg: OverlayMessage) -> bool {
        match msg {
            OverlayMessage::Hover(hovering) => {
                self.hover.report_hover(hovering);
                self.sync_interactivity();
            }
            OverlayMessage::ContentBounds(bounds) => self.fit(&bounds),
            OverlayMessage::HitRegions(regions) => {
                self.hover.set_hit_regions(regions);
            }
            OverlayMessage::RequestInteractive(active) => {
                self.hover.request_interactive(active);
                self.sync_interactivity();
            }
            OverlayMessage::RequestFocus(focused) => {
                self.hover.hold_focus(focused);
                self.sync_interactivity();
                self.router.set_focusable(self.window.as_ref(), focused);
            }
            OverlayMessage::Cursor(sample) => {
                self.hover.observe_sample(&sample);
                self.sync_interactivity();
            }
            OverlayMessage::OpenSettings => {
                log::info!("[controller] settings requested, forcing interactive");
                self.hover.request_interactive(true);
                self.sync_interactivity();
            }
            OverlayMessage::Shutdown => return false,
        }
        true
    }

    /// Drain `rx` until shutdown or until every sender is gone.
    pub async fn run(mut self, mut rx: mpsc::UnboundedReceiver<OverlayMessage>) {
        self.initialize();
        while let Some(msg) = rx.recv().await {
            if !self.handle(msg) {
                break;
            }
        }
        log::debug!("[controller] stopped");
    }

    fn sync_interactivity(&mut self) {
        let desired = self.hover.desired_state();
        self.router.set_interactivity(self.window.as_ref(), desired);
    }

    fn fit(&mut self, bounds: &WidgetBounds) {
        match self
            .bounds
            .apply_content_bounds(self.window.as_ref(), self.displays.as_ref(), bounds)
        {
            Ok(FitOutcome::Applied(rect)) => log::debug!("[auto-fit] window fitted to {rect:?}"),
            Ok(FitOutcome::Suppressed { .. }) => {}
            Err(OverlayError::MalformedGeometry(reason)) => {
                log::warn!("[controller] ignoring content bounds: {reason}");
            }
            Err(e) => log::debug!("[controller] auto-fit abandoned: {e}"),
        }
    }
}
