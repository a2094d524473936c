//! Content -> core entry points. Every command only enqueues a message for
//! the overlay controller and returns.

use tauri::{command, State};

use crate::controller::{OverlayMessage, OverlaySender};
use crate::geometry::WidgetBounds;

/// Managed state holding the controller's inbox.
pub struct OverlayChannel(pub OverlaySender);

impl OverlayChannel {
    pub fn send(&self, msg: OverlayMessage) -> Result<(), String> {
        self.0
            .send(msg)
            .map_err(|_| "overlay controller is not running".to_string())
    }
}

#[command]
pub fn report_hover(channel: State<'_, OverlayChannel>, is_hovering: bool) -> Result<(), String> {
    channel.send(OverlayMessage::Hover(is_hovering))
}

#[command]
pub fn report_content_bounds(
    channel: State<'_, OverlayChannel>,
    bounds: WidgetBounds,
) -> Result<(), String> {
    channel.send(OverlayMessage::ContentBounds(bounds))
}

#[command]
pub fn report_hit_regions(
    channel: State<'_, OverlayChannel>,
    regions: Vec<WidgetBounds>,
) -> Result<(), String> {
    channel.send(OverlayMessage::HitRegions(regions))
}

/// Keep the overlay interactive (e.g. while a settings panel is open).
#[command]
pub fn request_interactive(
    channel: State<'_, OverlayChannel>,
    active: bool,
) -> Result<(), String> {
    channel.send(OverlayMessage::RequestInteractive(active))
}

/// A text field gained or released keyboard focus.
#[command]
pub fn request_focus(channel: State<'_, OverlayChannel>, focused: bool) -> Result<(), String> {
    channel.send(OverlayMessage::RequestFocus(focused))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn send_forwards_to_controller_inbox() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let channel = OverlayChannel(tx);
        channel.send(OverlayMessage::Hover(true)).unwrap();
        assert_eq!(rx.try_recv().unwrap(), OverlayMessage::Hover(true));
    }

    #[test]
    fn send_fails_once_controller_is_gone() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let channel = OverlayChannel(tx);
        let err = channel.send(OverlayMessage::Shutdown).unwrap_err();
        assert!(err.contains("not running"));
    }
}
