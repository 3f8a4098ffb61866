//! Minimap rasterization and scroll geometry.
//!
//! The engine turns a [`minimap_text::DocumentSource`] into a pixel
//! thumbnail sized for a scrollbar strip and keeps the scrollbar
//! sub-control geometry in sync with the host's scroll state. Two
//! mutually exclusive strategies exist behind one contract:
//! [`scaling::ScalingStrategy`] shrinks the whole document to fit the
//! track, [`scrolling::ScrollingStrategy`] pans a fixed-row-height
//! window over it.

pub mod blend;
pub mod compositor;
pub mod engine;
pub mod geometry;
pub mod image;
pub mod scaling;
pub mod scrolling;

pub use compositor::{EXTRA_AREA_WIDTH, strip_width};
pub use engine::{MinimapEngine, Overlay, Palette, RenderContext, Renderer};
pub use geometry::{Point, Rect, ScrollGeometry, ScrollbarState, ViewportMetrics};
pub use image::MinimapImage;
pub use scaling::ScalingStrategy;
pub use scrolling::ScrollingStrategy;
