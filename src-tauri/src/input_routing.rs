use serde::{Deserialize, Serialize};

use crate::error::OverlayError;
use crate::hover::HoverPolicy;
use crate::window_manager::{MouseRouting, OverlayWindow};

/// Whether the overlay currently captures mouse input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InteractivityState {
    ClickThrough,
    Interactive,
}

/// How click-through is realised on this platform. Chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoutingStrategy {
    /// Ignore clicks while still forwarding pointer moves to content.
    Forwarding,
    /// Toggle the single OS-level ignore bit from the aggregated hover state.
    Toggle,
    /// Never ignore input; content swallows clicks outside widgets.
    AlwaysInteractive,
}

impl RoutingStrategy {
    /// Platform default: forwarding on Windows, toggling on macOS and Linux.
    pub fn detect() -> Self {
        if cfg!(target_os = "windows") {
            RoutingStrategy::Forwarding
        } else {
            RoutingStrategy::Toggle
        }
    }

    /// Content hover is only trusted on its own when the window really keeps
    /// delivering moves through click-through.
    pub fn hover_policy(self, forwards_moves: bool) -> HoverPolicy {
        match self {
            RoutingStrategy::Forwarding if forwards_moves => HoverPolicy::NativeHover,
            _ => HoverPolicy::BroadcastConfirmed,
        }
    }

    pub fn router(self) -> Box<dyn InputRouter> {
        match self {
            RoutingStrategy::Forwarding => Box::new(ForwardingRouter::default()),
            RoutingStrategy::Toggle => Box::new(ToggleRouter::default()),
            RoutingStrategy::AlwaysInteractive => Box::new(AlwaysInteractiveRouter::default()),
        }
    }
}

/// Input Routing Controller.
///
/// The only writer of [`InteractivityState`]. Both operations are
/// idempotent, and platform failures are swallowed: a destroyed window has
/// no interactivity left to manage.
pub trait InputRouter: Send {
    fn set_interactivity(&mut self, window: &dyn OverlayWindow, desired: InteractivityState);

    /// Allow keyboard focus while interactive. Focus is always withdrawn in
    /// click-through so the overlay never steals it.
    fn set_focusable(&mut self, window: &dyn OverlayWindow, allowed: bool);

    /// Last state that reached the window, if any.
    fn state(&self) -> Option<InteractivityState>;

    fn strategy(&self) -> RoutingStrategy;
}

fn swallow(op: &str, err: OverlayError) {
    log::debug!("[routing] {op} skipped: {err}");
}

/// Bookkeeping shared by every router: what was applied, and whether
/// content currently asks for keyboard focus.
#[derive(Debug, Default)]
struct Applied {
    state: Option<InteractivityState>,
    focus_requested: bool,
    focusable: Option<bool>,
}

impl Applied {
    fn sync_focus(&mut self, window: &dyn OverlayWindow) {
        let want = self.focus_requested && self.state == Some(InteractivityState::Interactive);
        if self.focusable == Some(want) {
            return;
        }
        match window.set_focusable(want) {
            Ok(()) => self.focusable = Some(want),
            Err(e) => swallow("set_focusable", e),
        }
    }

    fn apply_routing(
        &mut self,
        window: &dyn OverlayWindow,
        desired: InteractivityState,
        routing: MouseRouting,
    ) {
        if self.state == Some(desired) {
            return;
        }
        match window.set_mouse_routing(routing) {
            Ok(()) => {
                log::debug!("[routing] {:?} -> {:?} ({:?})", self.state, desired, routing);
                self.state = Some(desired);
            }
            Err(e) => swallow("set_mouse_routing", e),
        }
    }
}

/// Router for platforms that can ignore clicks but keep forwarding moves.
#[derive(Debug, Default)]
pub struct ForwardingRouter {
    applied: Applied,
}

impl InputRouter for ForwardingRouter {
    fn set_interactivity(&mut self, window: &dyn OverlayWindow, desired: InteractivityState) {
        let routing = match desired {
            InteractivityState::ClickThrough => MouseRouting {
                ignore: true,
                forward: true,
            },
            InteractivityState::Interactive => MouseRouting::INTERACTIVE,
        };
        self.applied.apply_routing(window, desired, routing);
        self.applied.sync_focus(window);
    }

    fn set_focusable(&mut self, window: &dyn OverlayWindow, allowed: bool) {
        self.applied.focus_requested = allowed;
        self.applied.sync_focus(window);
    }

    fn state(&self) -> Option<InteractivityState> {
        self.applied.state
    }

    fn strategy(&self) -> RoutingStrategy {
        RoutingStrategy::Forwarding
    }
}

/// Router for platforms without move forwarding: the ignore bit is a plain
/// boolean, flipped at the granularity of the aggregated hover decision.
#[derive(Debug, Default)]
pub struct ToggleRouter {
    applied: Applied,
}

impl InputRouter for ToggleRouter {
    fn set_interactivity(&mut self, window: &dyn OverlayWindow, desired: InteractivityState) {
        let routing = MouseRouting {
            ignore: desired == InteractivityState::ClickThrough,
            forward: false,
        };
        self.applied.apply_routing(window, desired, routing);
        self.applied.sync_focus(window);
    }

    fn set_focusable(&mut self, window: &dyn OverlayWindow, allowed: bool) {
        self.applied.focus_requested = allowed;
        self.applied.sync_focus(window);
    }

    fn state(&self) -> Option<InteractivityState> {
        self.applied.state
    }

    fn strategy(&self) -> RoutingStrategy {
        RoutingStrategy::Toggle
    }
}

/// Router that keeps the window hit-testable at all times. Click-through is
/// emulated by content, which drops clicks outside widgets while told to.
#[derive(Debug, Default)]
pub struct AlwaysInteractiveRouter {
    applied: Applied,
    routing_applied: bool,
}

impl InputRouter for AlwaysInteractiveRouter {
    fn set_interactivity(&mut self, window: &dyn OverlayWindow, desired: InteractivityState) {
        if !self.routing_applied {
            match window.set_mouse_routing(MouseRouting::INTERACTIVE) {
                Ok(()) => self.routing_applied = true,
                Err(e) => {
                    swallow("set_mouse_routing", e);
                    return;
                }
            }
        }

        if self.applied.state != Some(desired) {
            let suppress = desired == InteractivityState::ClickThrough;
            match window.set_click_suppression(suppress) {
                Ok(()) => {
                    log::debug!("[routing] {:?} -> {:?} (suppress={suppress})", self.applied.state, desired);
                    self.applied.state = Some(desired);
                }
                Err(e) => swallow("set_click_suppression", e),
            }
        }
        self.applied.sync_focus(window);
    }

    fn set_focusable(&mut self, window: &dyn OverlayWindow, allowed: bool) {
        self.applied.focus_requested = allowed;
        self.applied.sync_focus(window);
    }

    fn state(&self) -> Option<InteractivityState> {
        self.applied.state
    }

    fn strategy(&self) -> RoutingStrategy {
        RoutingStrategy::AlwaysInteractive
    }
}
