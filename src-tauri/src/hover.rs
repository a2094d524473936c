use crate::cursor::CursorSample;
use crate::geometry::WidgetBounds;
use crate::input_routing::InteractivityState;

/// Where hover information comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverPolicy {
    /// Content hover events are trustworthy on their own.
    NativeHover,
    /// Content hover events are backed by cursor samples tested against
    /// the reported hit regions; leaving needs a sample to confirm it.
    BroadcastConfirmed,
}

/// Hover Aggregator.
///
/// Folds content hover signals, explicit requests and cursor samples into
/// the single interactivity decision consumed by the input router:
/// `interactive = hovered || explicit request || focus held`.
#[derive(Debug)]
pub struct HoverAggregator {
    policy: HoverPolicy,
    widget_hovered: bool,
    explicit_request: bool,
    focus_held: bool,
    /// Last broadcast-derived containment verdict.
    pointer_in_region: bool,
    hit_regions: Vec<WidgetBounds>,
}

impl HoverAggregator {
    pub fn new(policy: HoverPolicy) -> Self {
        Self {
            policy,
            widget_hovered: false,
            explicit_request: false,
            focus_held: false,
            pointer_in_region: false,
            hit_regions: Vec::new(),
        }
    }

    /// Pointer entered (`true`) or left (`false`) a widget's hit region.
    pub fn report_hover(&mut self, hovering: bool) {
        self.widget_hovered = hovering;
        if hovering {
            // Held until a cursor sample shows the pointer outside every region.
            self.pointer_in_region = true;
        }
    }

    pub fn request_interactive(&mut self, active: bool) {
        self.explicit_request = active;
    }

    pub fn hold_focus(&mut self, held: bool) {
        self.focus_held = held;
    }

    /// Replace the known widget hit regions (window-local). Invalid entries
    /// are dropped.
    pub fn set_hit_regions(&mut self, regions: Vec<WidgetBounds>) {
        self.hit_regions = regions
            .into_iter()
            .filter(|r| r.validate().is_ok())
            .collect();
    }

    /// Fold in a cursor sample. While content still reports hover, a sample
    /// may have been taken before that report and is only trusted to say the
    /// pointer is inside; exit is confirmed by samples arriving after the
    /// hover ended.
    pub fn observe_sample(&mut self, sample: &CursorSample) {
        if self.policy == HoverPolicy::NativeHover {
            return;
        }
        let inside = self.contains(sample);
        if self.widget_hovered {
            self.pointer_in_region |= inside;
        } else {
            self.pointer_in_region = inside;
        }
    }

    /// Containment of a sample against the known regions. With no regions
    /// reported yet the window itself is the region.
    fn contains(&self, sample: &CursorSample) -> bool {
        if !sample.inside_window {
            return false;
        }
        if self.hit_regions.is_empty() {
            return true;
        }
        self.hit_regions
            .iter()
            .any(|r| r.contains(sample.x, sample.y))
    }

    fn hovered(&self) -> bool {
        match self.policy {
            HoverPolicy::NativeHover => self.widget_hovered,
            HoverPolicy::BroadcastConfirmed => self.widget_hovered || self.pointer_in_region,
        }
    }

    pub fn desired_state(&self) -> InteractivityState {
        if self.hovered() || self.explicit_request || self.focus_held {
            InteractivityState::Interactive
        } else {
            InteractivityState::ClickThrough
        }
    }
}
