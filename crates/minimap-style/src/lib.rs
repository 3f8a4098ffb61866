//! Scrollbar integration: drawing gates, sub-control geometry queries,
//! hit testing, and mouse routing.
//!
//! [`MinimapStyle`] is the piece a host splices into its scrollbar
//! painting and event path. Each scrollbar is associated one-to-one
//! with a [`MinimapEngine`] through the handle returned by
//! [`MinimapStyle::attach`]; every query against an unknown handle, a
//! disabled minimap, or a document over the line-count threshold falls
//! back to "use the stock scrollbar".

pub mod interaction;

use crossbeam_channel::Receiver;
use slab::Slab;

use minimap_render::{
    MinimapEngine, MinimapImage, Overlay, Point, Rect, RenderContext, ViewportMetrics, strip_width,
};
use minimap_settings::{ConfigChange, SharedSettings};
use minimap_text::Rgb;

pub use interaction::{DragState, LineRange, MouseResponse, visible_line_range};

/// Scrollbar sub-controls the minimap owns the geometry of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubControl {
    AddPage,
    SubPage,
    Slider,
    Groove,
}

/// Hit-test outcome against the minimap's sub-control rects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTest {
    /// Minimap not active here; run the host's default hit test.
    Inactive,
    /// Active, but the position matched no sub-control.
    Miss,
    Hit(SubControl),
}

/// One frame's paint instructions: blit `image`, fill the slider rect
/// with the translucent overlay, draw the splitter along the strip's
/// left edge.
#[derive(Debug)]
pub struct MinimapPaint<'a> {
    pub image: &'a MinimapImage,
    pub background: Rgb,
    pub overlay: Overlay,
    pub overlay_rect: Rect,
    pub splitter: Rgb,
}

/// Identifies one scrollbar/engine association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScrollbarHandle(usize);

struct EditorSlot {
    engine: MinimapEngine,
    drag: DragState,
}

pub struct MinimapStyle {
    settings: SharedSettings,
    changes: Receiver<ConfigChange>,
    editors: Slab<EditorSlot>,
    splitter_color: Rgb,
}

impl MinimapStyle {
    pub fn new(settings: SharedSettings) -> Self {
        let changes = settings.write().subscribe();
        Self {
            settings,
            changes,
            editors: Slab::new(),
            splitter_color: Rgb::BLACK,
        }
    }

    pub fn splitter_color(&self) -> Rgb {
        self.splitter_color
    }

    pub fn set_splitter_color(&mut self, color: Rgb) {
        self.splitter_color = color;
    }

    /// Creates the engine for a newly opened editor's scrollbar.
    pub fn attach(&mut self) -> ScrollbarHandle {
        let engine = MinimapEngine::new(self.settings.clone());
        let key = self.editors.insert(EditorSlot {
            engine,
            drag: DragState::default(),
        });
        tracing::debug!(handle = key, "minimap attached to scrollbar");
        ScrollbarHandle(key)
    }

    pub fn detach(&mut self, handle: ScrollbarHandle) -> bool {
        self.editors.try_remove(handle.0).is_some()
    }

    pub fn engine(&self, handle: ScrollbarHandle) -> Option<&MinimapEngine> {
        self.editors.get(handle.0).map(|slot| &slot.engine)
    }

    pub fn engine_mut(&mut self, handle: ScrollbarHandle) -> Option<&mut MinimapEngine> {
        self.editors.get_mut(handle.0).map(|slot| &mut slot.engine)
    }

    /// Drains queued configuration changes that affect interaction
    /// state. Returns true when the host should hide a visible tooltip.
    pub fn pump(&mut self) -> bool {
        let mut hide_tooltip = false;
        while let Ok(change) = self.changes.try_recv() {
            match change {
                ConfigChange::CenterOnClick(false) => {
                    for (_, slot) in self.editors.iter_mut() {
                        slot.drag.clear();
                    }
                    if !self.settings.read().show_line_tooltip() {
                        hide_tooltip = true;
                    }
                }
                ConfigChange::ShowLineTooltip(false) => hide_tooltip = true,
                _ => {}
            }
        }
        hide_tooltip
    }

    /// Renders and describes one frame, or None to fall back to the
    /// stock scrollbar (disabled, unknown handle, dormant engine,
    /// document over the threshold, or degenerate geometry).
    pub fn draw(&mut self, handle: ScrollbarHandle, ctx: &RenderContext<'_>) -> Option<MinimapPaint<'_>> {
        let (enabled, threshold) = {
            let store = self.settings.read();
            (store.enabled(), store.line_count_threshold())
        };
        if !enabled {
            return None;
        }
        let slot = self.editors.get_mut(handle.0)?;
        let line_count = ctx.document.line_count();
        if line_count == 0 || line_count > threshold {
            tracing::debug!(line_count, threshold, "minimap suppressed for this document");
            return None;
        }
        if !slot.engine.draw(ctx) {
            return None;
        }
        Some(MinimapPaint {
            image: slot.engine.image(),
            background: slot.engine.palette().background,
            overlay: slot.engine.overlay(),
            overlay_rect: slot.engine.geometry().slider,
            splitter: self.splitter_color,
        })
    }

    /// Geometry of one sub-control, or None when the minimap is not
    /// active for this scrollbar.
    pub fn sub_control_rect(&self, handle: ScrollbarHandle, control: SubControl) -> Option<Rect> {
        let slot = self.editors.get(handle.0)?;
        if !self.is_active(&slot.engine) {
            return None;
        }
        let geometry = slot.engine.geometry();
        Some(match control {
            SubControl::Groove => geometry.groove,
            SubControl::AddPage => geometry.add_page,
            SubControl::SubPage => geometry.sub_page,
            SubControl::Slider => geometry.slider,
        })
    }

    /// Hit test in the host's sub-control resolution path. While
    /// center-on-click is on, every press lands on the groove so the
    /// drag handling owns the interaction.
    pub fn hit_test(&self, handle: ScrollbarHandle, position: Point) -> HitTest {
        let Some(slot) = self.editors.get(handle.0) else {
            return HitTest::Inactive;
        };
        if !self.is_active(&slot.engine) {
            return HitTest::Inactive;
        }
        if self.settings.read().center_on_click() {
            return HitTest::Hit(SubControl::Groove);
        }
        let geometry = slot.engine.geometry();
        let candidates = [
            (SubControl::AddPage, geometry.add_page),
            (SubControl::SubPage, geometry.sub_page),
            (SubControl::Slider, geometry.slider),
            (SubControl::Groove, geometry.groove),
        ];
        for (control, rect) in candidates {
            if rect.contains(position) {
                return HitTest::Hit(control);
            }
        }
        HitTest::Miss
    }

    /// Extra track width to reserve for the strip; 0 when inactive.
    pub fn pixel_metric_extra(&self, handle: ScrollbarHandle, viewport: &ViewportMetrics) -> i32 {
        let Some(slot) = self.editors.get(handle.0) else {
            return 0;
        };
        if !self.is_active(&slot.engine) {
            return 0;
        }
        strip_width(self.settings.read().width(), viewport)
    }

    /// Left-button press on the scrollbar.
    pub fn mouse_pressed(
        &mut self,
        handle: ScrollbarHandle,
        position: Point,
        ctx: &RenderContext<'_>,
    ) -> MouseResponse {
        let mut response = MouseResponse::default();
        let (center_on_click, show_tooltip) = {
            let store = self.settings.read();
            (store.center_on_click(), store.show_line_tooltip())
        };
        let line_count = ctx.document.line_count();
        let Some(slot) = self.active_slot(handle, line_count) else {
            return response;
        };

        if center_on_click {
            slot.drag.begin(position);
            response.scroll_to = slot.engine.map_pointer(position, ctx);
            response.handled = true;
        }
        if show_tooltip {
            response.tooltip = Some(visible_line_range(&ctx.viewport, line_count));
        }
        response
    }

    /// Pointer move; `left_button_down` mirrors the host event state.
    pub fn mouse_moved(
        &mut self,
        handle: ScrollbarHandle,
        position: Point,
        left_button_down: bool,
        ctx: &RenderContext<'_>,
    ) -> MouseResponse {
        let mut response = MouseResponse::default();
        let (center_on_click, show_tooltip) = {
            let store = self.settings.read();
            (store.center_on_click(), store.show_line_tooltip())
        };
        let line_count = ctx.document.line_count();
        let Some(slot) = self.active_slot(handle, line_count) else {
            return response;
        };

        let was_dragging = slot.drag.is_active();
        if was_dragging && center_on_click {
            slot.drag.update(position);
            response.scroll_to = slot.engine.map_pointer(position, ctx);
            response.handled = true;
        } else if was_dragging {
            // center-on-click went away mid-drag
            slot.drag.clear();
        }

        if show_tooltip && (was_dragging || left_button_down) {
            response.tooltip = Some(visible_line_range(&ctx.viewport, line_count));
        }
        response
    }

    /// Left-button release. Always ends a drag.
    pub fn mouse_released(&mut self, handle: ScrollbarHandle) -> MouseResponse {
        let mut response = MouseResponse::default();
        let (center_on_click, show_tooltip) = {
            let store = self.settings.read();
            (store.center_on_click(), store.show_line_tooltip())
        };
        let Some(slot) = self.editors.get_mut(handle.0) else {
            return response;
        };

        let was_dragging = slot.drag.is_active();
        slot.drag.clear();
        response.handled = was_dragging && center_on_click;
        response.hide_tooltip = show_tooltip;
        response
    }

    pub fn is_dragging(&self, handle: ScrollbarHandle) -> bool {
        self.editors
            .get(handle.0)
            .is_some_and(|slot| slot.drag.is_active())
    }

    fn is_active(&self, engine: &MinimapEngine) -> bool {
        let store = self.settings.read();
        let lines = engine.document_lines();
        store.enabled() && engine.is_initialized() && lines > 0 && lines <= store.line_count_threshold()
    }

    fn active_slot(&mut self, handle: ScrollbarHandle, line_count: usize) -> Option<&mut EditorSlot> {
        let (enabled, threshold) = {
            let store = self.settings.read();
            (store.enabled(), store.line_count_threshold())
        };
        if !enabled || line_count == 0 || line_count > threshold {
            return None;
        }
        let slot = self.editors.get_mut(handle.0)?;
        slot.engine.is_initialized().then_some(slot)
    }
}
