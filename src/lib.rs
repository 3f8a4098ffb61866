//! Minimap scrollbar engine.
//!
//! Renders a pixel thumbnail of a styled text document into the
//! scrollbar of a host editor and maps mouse interaction on it back to
//! scroll positions. The host supplies documents, scroll state, and
//! painting; this workspace supplies the raster and geometry engine.
//!
//! Typical wiring:
//!
//! ```
//! use minimap::{
//!     DocumentLine, MinimapStyle, Point, RenderContext, ScrollbarState, SettingsStore,
//!     TextDocument, ViewportMetrics,
//! };
//!
//! let settings = SettingsStore::new().into_shared();
//! let mut style = MinimapStyle::new(settings);
//! let handle = style.attach();
//!
//! let mut document = TextDocument::new();
//! document.push_line(DocumentLine::new("fn main() {"));
//! document.push_line(DocumentLine::new("}"));
//!
//! let ctx = RenderContext {
//!     document: &document,
//!     scrollbar: ScrollbarState {
//!         value: 0,
//!         minimum: 0,
//!         maximum: 0,
//!         width: 100,
//!         height: 400,
//!     },
//!     viewport: ViewportMetrics {
//!         editor_width: 800,
//!         gutter_width: 40,
//!         viewport_height: 400,
//!         line_height: 16,
//!         ..ViewportMetrics::default()
//!     },
//! };
//!
//! let engine = style.engine_mut(handle).unwrap();
//! engine.document_changed(&document);
//! engine.tick(&ctx);
//!
//! if let Some(paint) = style.draw(handle, &ctx) {
//!     // blit paint.image, fill paint.overlay_rect with paint.overlay
//! }
//! let _ = style.hit_test(handle, Point::new(10, 10));
//! ```

pub use minimap_render::{
    MinimapEngine, MinimapImage, Overlay, Palette, Point, Rect, RenderContext, Renderer,
    ScalingStrategy, ScrollGeometry, ScrollbarState, ScrollingStrategy, ViewportMetrics,
    strip_width,
};
pub use minimap_settings::{
    ConfigChange, DisplayStyle, MinimapConfig, SettingsError, SettingsMap, SettingsStore,
    SharedSettings,
};
pub use minimap_style::{
    DragState, HitTest, LineRange, MinimapPaint, MinimapStyle, MouseResponse, ScrollbarHandle,
    SubControl, visible_line_range,
};
pub use minimap_text::{
    DocumentLine, DocumentSource, FormatRange, Revision, Rgb, TextDocument, TextFragment,
};
