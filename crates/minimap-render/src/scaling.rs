//! Scaling strategy: the whole document compressed to fit the track.
//!
//! When the document has more representable rows than the track has
//! pixels, a deterministic decimation picks one source line per strip
//! row; the rest contribute only their fold/revision markers.

use minimap_settings::MinimapConfig;
use minimap_text::DocumentSource;

use crate::compositor::{
    EXTRA_AREA_WIDTH, FormatCursor, LineMarks, merge_colors, sort_formats, strip_width, write_cell,
};
use crate::engine::{Palette, RenderContext};
use crate::geometry::{Point, Rect, ScrollGeometry, ScrollbarState, ViewportMetrics};
use crate::image::MinimapImage;

/// Decides which source lines survive decimation.
///
/// A fractional accumulator advances by `1 / factor` per kept line; the
/// n-th visible line is kept exactly when the accumulator rounds to n.
/// Pure function of (factor, visit order), so re-rendering unchanged
/// input keeps the identical set.
#[derive(Debug, Clone)]
pub(crate) struct RowPicker {
    step: f64,
    accumulator: f64,
    index: usize,
}

impl RowPicker {
    pub(crate) fn new(factor: f64) -> Self {
        Self {
            step: 1.0 / factor,
            accumulator: 0.0,
            index: 0,
        }
    }

    pub(crate) fn next(&mut self) -> bool {
        let kept = self.accumulator.round() as usize == self.index;
        self.index += 1;
        if kept {
            self.accumulator += self.step;
        }
        kept
    }
}

#[derive(Debug, Default)]
pub struct ScalingStrategy {
    geometry: ScrollGeometry,
    image: MinimapImage,
}

impl ScalingStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn geometry(&self) -> &ScrollGeometry {
        &self.geometry
    }

    pub fn image(&self) -> &MinimapImage {
        &self.image
    }

    /// Recomputes scale factor, groove and sub-control rects, and
    /// reallocates the image for the current track size.
    pub fn recompute_geometry(&mut self, ctx: &RenderContext<'_>, config: &MinimapConfig) {
        let pixels_per_line = config.pixels_per_line.max(1);
        let row_count = ctx.document.line_count().max(1) * pixels_per_line as usize;
        let track_height = ctx.scrollbar.height;

        self.geometry.line_count = row_count;
        self.geometry.factor = if track_height > 0 && row_count > track_height as usize {
            track_height as f64 / row_count as f64
        } else {
            1.0
        };

        let strip = strip_width(config.width, &ctx.viewport);
        self.geometry.groove = Rect::new(
            strip,
            0,
            ctx.scrollbar.width - strip,
            (row_count as i32).min(track_height),
        );
        self.update_sub_controls(&ctx.scrollbar, &ctx.viewport, config);

        self.image = MinimapImage::new(strip, track_height.max(0) * pixels_per_line);
    }

    /// Repositions slider/add-page/sub-page for the current scroll
    /// value without re-rendering.
    pub fn update_sub_controls(
        &mut self,
        scrollbar: &ScrollbarState,
        viewport: &ViewportMetrics,
        config: &MinimapConfig,
    ) {
        let row_count = self.geometry.line_count as i32;
        if row_count <= 0 {
            self.geometry.clear_sub_controls();
            return;
        }

        let pixels_per_line = config.pixels_per_line.max(1);
        let page_rows = viewport.lines_per_page() * pixels_per_line;
        let slider_height = ((self.geometry.factor * page_rows as f64).round() as i32)
            .min(self.geometry.groove.height)
            .max(1);

        let width = scrollbar.width;
        let track_height = scrollbar.height;

        // Content ends where the last decimated row was drawn, not at
        // the full track height.
        let content_height = if self.geometry.factor < 1.0 {
            ((row_count - 1) as f64 * self.geometry.factor).round() as i32 + 1
        } else {
            row_count
        }
        .min(track_height);

        let mut top = 0;
        if scrollbar.range() > 0 && content_height > slider_height {
            let max_top = content_height - slider_height;
            top = (scrollbar.percent() * max_top as f64).round() as i32;
            top = top.clamp(0, max_top);
        }
        if top + slider_height > content_height {
            top = content_height - slider_height;
        }
        top = top.max(0);

        self.geometry.slider = Rect::new(0, top, width, slider_height);
        self.geometry.sub_page = if top > 0 {
            Rect::new(0, 0, width, top)
        } else {
            Rect::empty()
        };
        self.geometry.add_page = if top + slider_height < track_height {
            Rect::new(0, top + slider_height, width, track_height - top - slider_height)
        } else {
            Rect::empty()
        };
    }

    /// Rasterizes the document into the image. Returns false without
    /// touching the image when the strip is degenerate or the host
    /// wraps lines (wrapped layouts have no stable line-per-row
    /// mapping to draw).
    pub fn render(
        &mut self,
        ctx: &RenderContext<'_>,
        config: &MinimapConfig,
        palette: Palette,
    ) -> bool {
        if ctx.viewport.text_wrapping {
            return false;
        }
        let row_count = self.geometry.line_count as i32;
        let height_limit = if self.geometry.factor < 1.0 {
            row_count
        } else {
            ctx.scrollbar.height
        };
        let text_width = self.image.width() - EXTRA_AREA_WIDTH;
        if text_width <= 0 || height_limit <= 0 {
            return false;
        }

        let pixels_per_line = config.pixels_per_line.max(1);
        let tab = ctx.document.tab_size() as i32;
        self.image.fill(palette.background);

        let mut picker = RowPicker::new(self.geometry.factor);
        let mut marks = LineMarks::default();
        let mut y = 0;

        for index in 0..ctx.document.line_count() {
            if y >= height_limit {
                break;
            }
            let Some(line) = ctx.document.line(index) else {
                break;
            };
            if !line.is_visible() {
                continue;
            }

            marks.observe(line, &ctx.viewport);
            if !picker.next() {
                continue;
            }

            let row = y * pixels_per_line;
            let mut formats = line.formats().to_vec();
            sort_formats(&mut formats);
            let mut cursor = FormatCursor::new(&formats);

            let mut line_background = palette.background;
            let mut line_foreground = palette.foreground;
            merge_colors(
                &mut line_background,
                &mut line_foreground,
                line.background(),
                line.foreground(),
            );

            let Some(scan) = self.image.scan_line_mut(row) else {
                break;
            };
            let mut x = 0;
            let mut column = 0usize;
            'line: for fragment in line.fragments() {
                let mut fragment_background = line_background;
                let mut fragment_foreground = line_foreground;
                merge_colors(
                    &mut fragment_background,
                    &mut fragment_foreground,
                    fragment.background,
                    fragment.foreground,
                );
                for ch in fragment.text.chars() {
                    let mut background = fragment_background;
                    let mut foreground = fragment_foreground;
                    if let Some(range) = cursor.format_at(column) {
                        merge_colors(
                            &mut background,
                            &mut foreground,
                            range.background,
                            range.foreground,
                        );
                    }
                    column += 1;
                    if !write_cell(
                        &mut scan[EXTRA_AREA_WIDTH as usize..],
                        false,
                        ch,
                        &mut x,
                        text_width,
                        tab,
                        background,
                        foreground,
                    ) {
                        break 'line;
                    }
                }
            }
            marks.paint(scan);
            marks.clear();

            for duplicate in 1..pixels_per_line - 1 {
                self.image.duplicate_scan_line(row, row + duplicate);
            }
            y += 1;
        }

        true
    }

    /// Maps a pointer position in the strip to the scrollbar value that
    /// centers the viewport there.
    pub fn map_pointer_to_scroll(
        &self,
        position: Point,
        ctx: &RenderContext<'_>,
        config: &MinimapConfig,
    ) -> Option<i32> {
        let row_count = self.geometry.line_count as i32;
        if row_count <= 0 {
            return None;
        }

        let content_height = if self.geometry.factor < 1.0 {
            (row_count as f64 * self.geometry.factor).round() as i32
        } else {
            row_count.min(ctx.scrollbar.height)
        };
        if content_height <= 0 {
            return None;
        }

        let target_row = if position.y <= content_height {
            let ratio = position.y as f64 / content_height as f64;
            ((ratio * row_count as f64).round() as i32).max(1)
        } else {
            // below the last drawn row: jump to the end
            row_count
        };

        // Page size in the same row units as row_count, so this map is
        // the exact inverse of the slider-position formula.
        let page_rows = ctx.viewport.lines_per_page() * config.pixels_per_line.max(1);
        let max_center = (row_count - page_rows + 1).max(1);
        let center = (target_row - page_rows / 2).clamp(1, max_center);

        if ctx.scrollbar.maximum <= 0 {
            return None;
        }
        if max_center <= 1 {
            return Some(0);
        }
        let ratio = (center - 1) as f64 / (max_center - 1) as f64;
        let value = (ratio * ctx.scrollbar.maximum as f64).round() as i32;
        Some(value.clamp(0, ctx.scrollbar.maximum))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minimap_text::{DocumentLine, Revision, Rgb, TextDocument};

    fn config() -> MinimapConfig {
        MinimapConfig {
            pixels_per_line: 2,
            ..MinimapConfig::default()
        }
    }

    fn viewport() -> ViewportMetrics {
        ViewportMetrics {
            editor_width: 800,
            gutter_width: 40,
            viewport_height: 400,
            line_height: 16,
            ..ViewportMetrics::default()
        }
    }

    fn scrollbar(maximum: i32) -> ScrollbarState {
        ScrollbarState {
            value: 0,
            minimum: 0,
            maximum,
            width: 100,
            height: 400,
        }
    }

    fn document(lines: usize) -> TextDocument {
        let mut doc = TextDocument::new();
        for _ in 0..lines {
            doc.push_line(DocumentLine::new("fn x() {}"));
        }
        doc
    }

    fn palette() -> Palette {
        Palette {
            background: Rgb::new(30, 30, 30),
            foreground: Rgb::new(220, 220, 220),
        }
    }

    #[test]
    fn row_picker_is_deterministic() {
        let first: Vec<bool> = {
            let mut picker = RowPicker::new(0.2);
            (0..100).map(|_| picker.next()).collect()
        };
        let second: Vec<bool> = {
            let mut picker = RowPicker::new(0.2);
            (0..100).map(|_| picker.next()).collect()
        };
        assert_eq!(first, second);
        assert_eq!(first.iter().filter(|kept| **kept).count(), 20);
    }

    #[test]
    fn row_picker_keeps_everything_at_unit_factor() {
        let mut picker = RowPicker::new(1.0);
        assert!((0..50).all(|_| picker.next()));
    }

    #[test]
    fn factor_is_one_when_content_fits() {
        let doc = document(100);
        let ctx = RenderContext {
            document: &doc,
            scrollbar: scrollbar(75),
            viewport: viewport(),
        };
        let mut strategy = ScalingStrategy::new();
        strategy.recompute_geometry(&ctx, &config());
        assert_eq!(strategy.geometry().factor, 1.0);
        assert_eq!(strategy.geometry().line_count, 200);
    }

    #[test]
    fn factor_shrinks_for_tall_documents() {
        let doc = document(1000);
        let ctx = RenderContext {
            document: &doc,
            scrollbar: scrollbar(975),
            viewport: viewport(),
        };
        let mut strategy = ScalingStrategy::new();
        strategy.recompute_geometry(&ctx, &config());
        assert_eq!(strategy.geometry().factor, 400.0 / 2000.0);
        assert!(strategy.geometry().factor < 1.0);
    }

    #[test]
    fn image_height_is_track_height_times_pixels_per_line() {
        let doc = document(100);
        let ctx = RenderContext {
            document: &doc,
            scrollbar: scrollbar(75),
            viewport: viewport(),
        };
        let mut strategy = ScalingStrategy::new();
        strategy.recompute_geometry(&ctx, &config());
        assert_eq!(strategy.image().height(), 800);
        assert_eq!(strategy.image().width(), 87);
    }

    #[test]
    fn render_is_idempotent() {
        let doc = document(1000);
        let ctx = RenderContext {
            document: &doc,
            scrollbar: scrollbar(975),
            viewport: viewport(),
        };
        let mut strategy = ScalingStrategy::new();
        strategy.recompute_geometry(&ctx, &config());
        assert!(strategy.render(&ctx, &config(), palette()));
        let first = strategy.image().pixels().to_vec();
        assert!(strategy.render(&ctx, &config(), palette()));
        assert_eq!(strategy.image().pixels(), first.as_slice());
    }

    #[test]
    fn refuses_to_render_wrapped_documents() {
        let doc = document(100);
        let ctx = RenderContext {
            document: &doc,
            scrollbar: scrollbar(75),
            viewport: ViewportMetrics {
                text_wrapping: true,
                ..viewport()
            },
        };
        let mut strategy = ScalingStrategy::new();
        strategy.recompute_geometry(&ctx, &config());
        assert!(!strategy.render(&ctx, &config(), palette()));
    }

    #[test]
    fn refuses_to_render_degenerate_strips() {
        let doc = document(100);
        let ctx = RenderContext {
            document: &doc,
            scrollbar: scrollbar(75),
            viewport: ViewportMetrics {
                editor_width: 10,
                ..viewport()
            },
        };
        let mut strategy = ScalingStrategy::new();
        strategy.recompute_geometry(&ctx, &config());
        assert!(!strategy.render(&ctx, &config(), palette()));
    }

    #[test]
    fn slider_stays_inside_the_track_for_all_values() {
        let doc = document(1000);
        let viewport = viewport();
        let mut strategy = ScalingStrategy::new();
        for value in (0..=975).step_by(25) {
            let mut state = scrollbar(975);
            state.value = value;
            let ctx = RenderContext {
                document: &doc,
                scrollbar: state,
                viewport,
            };
            strategy.recompute_geometry(&ctx, &config());
            let slider = strategy.geometry().slider;
            assert!(slider.y >= 0, "value {value}: top {}", slider.y);
            assert!(
                slider.bottom() <= state.height,
                "value {value}: bottom {}",
                slider.bottom()
            );
            assert!(slider.height >= 1);
        }
    }

    #[test]
    fn add_and_sub_page_bracket_the_slider() {
        let doc = document(1000);
        let mut state = scrollbar(975);
        state.value = 500;
        let ctx = RenderContext {
            document: &doc,
            scrollbar: state,
            viewport: viewport(),
        };
        let mut strategy = ScalingStrategy::new();
        strategy.recompute_geometry(&ctx, &config());
        let geometry = strategy.geometry();
        assert_eq!(geometry.sub_page.height, geometry.slider.y);
        assert_eq!(geometry.add_page.y, geometry.slider.bottom());
        assert!(geometry.add_page.is_valid());
        assert!(geometry.sub_page.is_valid());
    }

    #[test]
    fn click_maps_to_scroll_and_back_within_one_pixel() {
        let doc = document(1000);
        let viewport = viewport();
        let mut strategy = ScalingStrategy::new();
        let ctx = RenderContext {
            document: &doc,
            scrollbar: scrollbar(975),
            viewport,
        };
        strategy.recompute_geometry(&ctx, &config());

        for click_y in [40, 120, 200, 333] {
            let value = strategy
                .map_pointer_to_scroll(Point::new(50, click_y), &ctx, &config())
                .unwrap();
            let mut state = scrollbar(975);
            state.value = value;
            strategy.update_sub_controls(&state, &viewport, &config());
            let slider = strategy.geometry().slider;
            let slider_center = slider.y + slider.height / 2;
            assert!(
                (slider_center - click_y).abs() <= 1,
                "click {click_y} -> value {value} -> center {slider_center}"
            );
        }
    }

    #[test]
    fn click_below_content_scrolls_to_the_end() {
        let doc = document(50);
        let ctx = RenderContext {
            document: &doc,
            scrollbar: scrollbar(25),
            viewport: viewport(),
        };
        let mut strategy = ScalingStrategy::new();
        strategy.recompute_geometry(&ctx, &config());
        // 50 lines * 2 px = 100 px of content; click far below it
        let value = strategy
            .map_pointer_to_scroll(Point::new(50, 390), &ctx, &config())
            .unwrap();
        assert_eq!(value, 25);
    }

    #[test]
    fn skipped_lines_contribute_markers_to_the_next_kept_row() {
        let mut doc = TextDocument::new();
        for index in 0..1000 {
            let mut line = DocumentLine::new("text");
            if index == 7 {
                line = line.with_revision(Revision::Modified);
            }
            doc.push_line(line);
        }
        let ctx = RenderContext {
            document: &doc,
            scrollbar: scrollbar(975),
            viewport: viewport(),
        };
        let mut strategy = ScalingStrategy::new();
        strategy.recompute_geometry(&ctx, &config());
        assert!(strategy.render(&ctx, &config(), palette()));

        // factor 0.2 keeps every fifth line; the skipped line 7 leaves
        // its marker on the row of kept line 10 (third kept row, y = 2)
        assert_eq!(strategy.image().pixel(1, 4), Some(Rgb::RED));
        assert_eq!(strategy.image().pixel(2, 4), Some(Rgb::RED));
        // earlier rows stay unmarked
        assert_eq!(strategy.image().pixel(1, 0), Some(palette().background));
    }

    #[test]
    fn rows_replicate_with_a_one_pixel_gap() {
        let mut doc = TextDocument::new();
        for _ in 0..10 {
            doc.push_line(DocumentLine::new("X"));
        }
        let cfg = MinimapConfig {
            pixels_per_line: 3,
            ..MinimapConfig::default()
        };
        let ctx = RenderContext {
            document: &doc,
            scrollbar: scrollbar(5),
            viewport: viewport(),
        };
        let mut strategy = ScalingStrategy::new();
        strategy.recompute_geometry(&ctx, &cfg);
        assert!(strategy.render(&ctx, &cfg, palette()));

        let fg = palette().foreground;
        let bg = palette().background;
        let text_x = EXTRA_AREA_WIDTH;
        assert_eq!(strategy.image().pixel(text_x, 0), Some(fg));
        assert_eq!(strategy.image().pixel(text_x, 1), Some(fg));
        assert_eq!(strategy.image().pixel(text_x, 2), Some(bg));
        assert_eq!(strategy.image().pixel(text_x, 3), Some(fg));
    }

    #[test]
    fn invisible_lines_are_skipped_without_consuming_rows() {
        let mut doc = TextDocument::new();
        doc.push_line(DocumentLine::new("A"));
        doc.push_line(DocumentLine::new("B").with_visible(false));
        doc.push_line(
            DocumentLine::new("C").with_colors(None, Some(Rgb::RED)),
        );
        let ctx = RenderContext {
            document: &doc,
            scrollbar: scrollbar(0),
            viewport: viewport(),
        };
        let mut strategy = ScalingStrategy::new();
        strategy.recompute_geometry(&ctx, &config());
        assert!(strategy.render(&ctx, &config(), palette()));

        let text_x = EXTRA_AREA_WIDTH;
        assert_eq!(strategy.image().pixel(text_x, 0), Some(palette().foreground));
        // line C lands directly under A's rows; nothing from B between
        assert_eq!(strategy.image().pixel(text_x, 2), Some(Rgb::RED));
    }
}
