use minimap_render::{Point, ViewportMetrics};

/// Pointer-drag bookkeeping for drag-to-scroll.
///
/// Created on a press inside the track while center-on-click is on;
/// cleared on release, and immediately when center-on-click is switched
/// off mid-drag.
#[derive(Debug, Clone, Copy, Default)]
pub struct DragState {
    active: bool,
    last_position: Point,
}

impl DragState {
    pub fn begin(&mut self, position: Point) {
        self.active = true;
        self.last_position = position;
    }

    pub fn update(&mut self, position: Point) {
        self.last_position = position;
    }

    pub fn clear(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn last_position(&self) -> Point {
        self.last_position
    }
}

/// 1-based first/last document lines currently on screen, shown in the
/// interaction tooltip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub first: usize,
    pub last: usize,
}

/// What the host should do after a routed mouse event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MouseResponse {
    /// The event was consumed; do not run default scrollbar handling.
    pub handled: bool,
    /// Set the scrollbar to this value.
    pub scroll_to: Option<i32>,
    /// Show (or refresh) the line-range tooltip at the pointer.
    pub tooltip: Option<LineRange>,
    /// Hide the tooltip if one is showing.
    pub hide_tooltip: bool,
}

/// Visible line range for the tooltip, clamped to the document.
pub fn visible_line_range(viewport: &ViewportMetrics, line_count: usize) -> LineRange {
    let first = viewport.first_visible_line + 1;
    let first = first.max(1);
    let last = first + viewport.lines_per_page() as usize - 1;
    let last = last.max(first).min(line_count);
    LineRange { first, last }
}
