//! Integer geometry shared by the strategies and the hit-test adapter.

/// A pointer position in scrollbar-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle. A rect with non-positive width or height is
/// invalid: it contains no points and stands in for "no such control".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn empty() -> Self {
        Self::new(0, 0, 0, 0)
    }

    pub const fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn contains(&self, point: Point) -> bool {
        self.is_valid()
            && point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }

    /// First row below the rect.
    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }
}

/// Scroll state and track dimensions of the host scrollbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollbarState {
    pub value: i32,
    pub minimum: i32,
    pub maximum: i32,
    /// Track width in px, including the minimap strip.
    pub width: i32,
    /// Track height in px.
    pub height: i32,
}

impl ScrollbarState {
    pub fn range(&self) -> i32 {
        self.maximum - self.minimum
    }

    /// Current value normalized to `[0, 1]`, or 0 for an empty range.
    pub fn percent(&self) -> f64 {
        if self.range() > 0 {
            (self.value - self.minimum) as f64 / self.range() as f64
        } else {
            0.0
        }
    }

    pub fn clamp_value(&self, value: i32) -> i32 {
        value.clamp(self.minimum, self.maximum)
    }
}

/// Layout facts the host editor reports alongside its scrollbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportMetrics {
    /// Full editor widget width in px.
    pub editor_width: i32,
    /// Width of the line-number gutter in px.
    pub gutter_width: i32,
    /// Text viewport height in px.
    pub viewport_height: i32,
    /// Height of one text line in px.
    pub line_height: i32,
    /// Index of the first document line currently on screen (0-based).
    pub first_visible_line: usize,
    /// Whether the editor wraps long lines.
    pub text_wrapping: bool,
    pub code_folding_visible: bool,
    pub revisions_visible: bool,
}

impl ViewportMetrics {
    /// Whole text lines that fit in the viewport, at least 1.
    pub fn lines_per_page(&self) -> i32 {
        (self.viewport_height / self.line_height.max(1)).max(1)
    }
}

impl Default for ViewportMetrics {
    fn default() -> Self {
        Self {
            editor_width: 0,
            gutter_width: 0,
            viewport_height: 0,
            line_height: 1,
            first_visible_line: 0,
            text_wrapping: false,
            code_folding_visible: true,
            revisions_visible: true,
        }
    }
}

/// Scrollbar sub-control rectangles plus the mapping parameters they
/// were derived from. Recomputed on every scroll-value, document-size,
/// or viewport change; never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollGeometry {
    pub groove: Rect,
    pub slider: Rect,
    pub add_page: Rect,
    pub sub_page: Rect,
    /// Content-rows-to-track-pixels scale. 1.0 unless the scaling
    /// strategy has to shrink.
    pub factor: f64,
    /// Rows the strategy can represent: line count times pixels-per-line
    /// for the scaling strategy, raw line count for the scrolling one.
    pub line_count: usize,
}

impl Default for ScrollGeometry {
    fn default() -> Self {
        Self {
            groove: Rect::empty(),
            slider: Rect::empty(),
            add_page: Rect::empty(),
            sub_page: Rect::empty(),
            factor: 1.0,
            line_count: 0,
        }
    }
}

impl ScrollGeometry {
    pub(crate) fn clear_sub_controls(&mut self) {
        self.slider = Rect::empty();
        self.add_page = Rect::empty();
        self.sub_page = Rect::empty();
    }
}
