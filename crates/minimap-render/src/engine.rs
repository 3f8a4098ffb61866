//! Per-editor engine: strategy lifecycle, palette, deferred updates.
//!
//! One [`MinimapEngine`] exists per open editor. It stays dormant until
//! the document first has content, coalesces update triggers behind a
//! dirty flag drained on the host's idle tick, and swaps the strategy
//! instance wholesale when the configured display style changes.

use crossbeam_channel::Receiver;
use minimap_settings::{ConfigChange, DisplayStyle, MinimapConfig, SharedSettings};
use minimap_text::{DocumentSource, Rgb};

use crate::geometry::{Point, ScrollGeometry, ScrollbarState, ViewportMetrics};
use crate::image::MinimapImage;
use crate::scaling::ScalingStrategy;
use crate::scrolling::ScrollingStrategy;

/// Default text colors from the host theme / font settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb,
    pub foreground: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgb::WHITE,
            foreground: Rgb::BLACK,
        }
    }
}

/// Translucent highlight painted over the slider's part of the strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlay {
    pub color: Rgb,
    pub alpha: u8,
}

impl Overlay {
    /// White over dark backgrounds, black over light ones.
    fn for_palette(palette: Palette, alpha: u8) -> Self {
        let color = if palette.background.value() < 128 {
            Rgb::WHITE
        } else {
            Rgb::BLACK
        };
        Self { color, alpha }
    }
}

/// Everything a render or mapping call reads from the host.
pub struct RenderContext<'a> {
    pub document: &'a dyn DocumentSource,
    pub scrollbar: ScrollbarState,
    pub viewport: ViewportMetrics,
}

/// The two layout strategies behind one contract. Variants never share
/// state; switching styles replaces the whole value.
#[derive(Debug)]
pub enum Renderer {
    Scaling(ScalingStrategy),
    Scrolling(ScrollingStrategy),
}

impl Renderer {
    pub fn new(style: DisplayStyle) -> Self {
        match style {
            DisplayStyle::Scaling => Renderer::Scaling(ScalingStrategy::new()),
            DisplayStyle::Scrolling => Renderer::Scrolling(ScrollingStrategy::new()),
        }
    }

    pub fn style(&self) -> DisplayStyle {
        match self {
            Renderer::Scaling(_) => DisplayStyle::Scaling,
            Renderer::Scrolling(_) => DisplayStyle::Scrolling,
        }
    }

    pub fn geometry(&self) -> &ScrollGeometry {
        match self {
            Renderer::Scaling(strategy) => strategy.geometry(),
            Renderer::Scrolling(strategy) => strategy.geometry(),
        }
    }

    pub fn image(&self) -> &MinimapImage {
        match self {
            Renderer::Scaling(strategy) => strategy.image(),
            Renderer::Scrolling(strategy) => strategy.image(),
        }
    }

    pub fn recompute_geometry(&mut self, ctx: &RenderContext<'_>, config: &MinimapConfig) {
        match self {
            Renderer::Scaling(strategy) => strategy.recompute_geometry(ctx, config),
            Renderer::Scrolling(strategy) => strategy.recompute_geometry(ctx, config),
        }
    }

    pub fn update_sub_controls(&mut self, ctx: &RenderContext<'_>, config: &MinimapConfig) {
        match self {
            Renderer::Scaling(strategy) => {
                strategy.update_sub_controls(&ctx.scrollbar, &ctx.viewport, config)
            }
            Renderer::Scrolling(strategy) => strategy.update_sub_controls(ctx, config),
        }
    }

    pub fn render(&mut self, ctx: &RenderContext<'_>, config: &MinimapConfig, palette: Palette) -> bool {
        match self {
            Renderer::Scaling(strategy) => strategy.render(ctx, config, palette),
            Renderer::Scrolling(strategy) => strategy.render(ctx, config, palette),
        }
    }

    pub fn map_pointer_to_scroll(
        &self,
        position: Point,
        ctx: &RenderContext<'_>,
        config: &MinimapConfig,
    ) -> Option<i32> {
        match self {
            Renderer::Scaling(strategy) => strategy.map_pointer_to_scroll(position, ctx, config),
            Renderer::Scrolling(strategy) => strategy.map_pointer_to_scroll(position, ctx, config),
        }
    }
}

pub struct MinimapEngine {
    settings: SharedSettings,
    changes: Receiver<ConfigChange>,
    renderer: Renderer,
    palette: Palette,
    overlay: Overlay,
    initialized: bool,
    update_pending: bool,
    document_lines: usize,
}

impl MinimapEngine {
    pub fn new(settings: SharedSettings) -> Self {
        let (changes, style, alpha) = {
            let mut store = settings.write();
            (store.subscribe(), store.style(), store.alpha())
        };
        let palette = Palette::default();
        Self {
            settings,
            changes,
            renderer: Renderer::new(style),
            palette,
            overlay: Overlay::for_palette(palette, alpha),
            initialized: false,
            update_pending: false,
            document_lines: 0,
        }
    }

    pub fn config(&self) -> MinimapConfig {
        self.settings.read().config()
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    pub fn overlay(&self) -> Overlay {
        self.overlay
    }

    pub fn geometry(&self) -> &ScrollGeometry {
        self.renderer.geometry()
    }

    pub fn image(&self) -> &MinimapImage {
        self.renderer.image()
    }

    pub fn style(&self) -> DisplayStyle {
        self.renderer.style()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_update_pending(&self) -> bool {
        self.update_pending
    }

    /// Line count of the document as of the last recomputation; the
    /// adapter gates against the configured threshold with it.
    pub fn document_lines(&self) -> usize {
        self.document_lines
    }

    /// New theme / font-settings colors. Rederives the overlay and
    /// schedules a re-render.
    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
        self.overlay = Overlay::for_palette(palette, self.settings.read().alpha());
        self.request_update();
    }

    /// Document content or size changed. The first notification with a
    /// non-empty document arms the engine.
    pub fn document_changed(&mut self, document: &dyn DocumentSource) {
        if !self.initialized {
            if document.is_empty() {
                return;
            }
            self.initialized = true;
            tracing::debug!(lines = document.line_count(), "minimap engine initialized");
        }
        self.request_update();
    }

    pub fn viewport_resized(&mut self) {
        self.request_update();
    }

    /// Marks the engine dirty. Any number of calls collapse into the
    /// single recomputation done by the next [`MinimapEngine::tick`].
    pub fn request_update(&mut self) {
        self.update_pending = true;
    }

    /// Idle-tick drain: applies queued configuration changes, then
    /// recomputes geometry and reallocates the image if anything marked
    /// the engine dirty. Returns whether a recomputation ran.
    pub fn tick(&mut self, ctx: &RenderContext<'_>) -> bool {
        self.drain_config_changes();
        if !self.initialized || !self.update_pending {
            return false;
        }
        self.update_pending = false;
        self.document_lines = ctx.document.line_count();
        let config = self.config();
        self.renderer.recompute_geometry(ctx, &config);
        true
    }

    /// Scroll value moved: reposition the sub-controls only.
    pub fn scroll_value_changed(&mut self, ctx: &RenderContext<'_>) {
        if !self.initialized {
            return;
        }
        let config = self.config();
        self.renderer.update_sub_controls(ctx, &config);
    }

    /// Rasterizes the current document into the image. False means
    /// nothing was drawn and the host should paint its stock scrollbar.
    pub fn draw(&mut self, ctx: &RenderContext<'_>) -> bool {
        if !self.initialized {
            return false;
        }
        self.document_lines = ctx.document.line_count();
        let config = self.config();
        self.renderer.render(ctx, &config, self.palette)
    }

    pub fn map_pointer(&self, position: Point, ctx: &RenderContext<'_>) -> Option<i32> {
        if !self.initialized {
            return None;
        }
        let config = self.config();
        self.renderer.map_pointer_to_scroll(position, ctx, &config)
    }

    fn drain_config_changes(&mut self) {
        while let Ok(change) = self.changes.try_recv() {
            match change {
                ConfigChange::Style(style) => {
                    if self.renderer.style() != style {
                        tracing::debug!(?style, "recreating minimap strategy");
                        self.renderer = Renderer::new(style);
                        self.update_pending = true;
                    }
                }
                ConfigChange::Alpha(alpha) => {
                    self.overlay = Overlay::for_palette(self.palette, alpha);
                    self.update_pending = true;
                }
                ConfigChange::Enabled(_)
                | ConfigChange::Width(_)
                | ConfigChange::LineCountThreshold(_)
                | ConfigChange::PixelsPerLine(_) => {
                    self.update_pending = true;
                }
                // interaction toggles are the adapter's concern
                ConfigChange::CenterOnClick(_) | ConfigChange::ShowLineTooltip(_) => {}
            }
        }
    }
}
