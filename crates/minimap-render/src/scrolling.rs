//! Scrolling strategy: fixed row height, panning window.
//!
//! Every line keeps `pixels_per_line` rows of height; the strip shows
//! the window of the document surrounding the current scroll position
//! and pans as the scrollbar moves.

use minimap_settings::MinimapConfig;
use minimap_text::DocumentSource;

use crate::compositor::{
    EXTRA_AREA_WIDTH, FormatCursor, LineMarks, merge_colors, sort_formats, strip_width, write_cell,
};
use crate::engine::{Palette, RenderContext};
use crate::geometry::{Point, Rect, ScrollGeometry, ViewportMetrics};
use crate::image::MinimapImage;

#[derive(Debug, Default)]
pub struct ScrollingStrategy {
    geometry: ScrollGeometry,
    image: MinimapImage,
}

impl ScrollingStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn geometry(&self) -> &ScrollGeometry {
        &self.geometry
    }

    pub fn image(&self) -> &MinimapImage {
        &self.image
    }

    pub fn recompute_geometry(&mut self, ctx: &RenderContext<'_>, config: &MinimapConfig) {
        let pixels_per_line = config.pixels_per_line.max(1);
        let line_count = ctx.document.line_count().max(1);
        let document_height = line_count as i32 * pixels_per_line;
        let track_height = ctx.scrollbar.height;

        self.geometry.line_count = line_count;
        self.geometry.factor = 1.0;

        let strip = strip_width(config.width, &ctx.viewport);
        self.geometry.groove = Rect::new(
            strip,
            0,
            ctx.scrollbar.width - strip,
            document_height.min(track_height),
        );
        self.update_sub_controls(ctx, config);

        self.image = MinimapImage::new(strip, track_height.max(0));
    }

    pub fn update_sub_controls(&mut self, ctx: &RenderContext<'_>, config: &MinimapConfig) {
        if self.geometry.line_count == 0 {
            self.geometry.clear_sub_controls();
            return;
        }

        let pixels_per_line = config.pixels_per_line.max(1);
        let slider_height = ctx.viewport.lines_per_page() * pixels_per_line;

        let width = ctx.scrollbar.width;
        let track_height = ctx.scrollbar.height;

        let content_height =
            (ctx.document.visible_line_units() * pixels_per_line as f64).round() as i32;
        let effective_height = content_height.min(track_height);

        let mut top = 0.0_f64;
        if ctx.scrollbar.range() > 0 && effective_height > slider_height {
            let max_top = (effective_height - slider_height) as f64;
            let raw = ctx.scrollbar.percent() * max_top;
            // Snap to a row boundary so small scroll deltas cannot park
            // the slider between lines; the clamp stays on a boundary
            // too, keeping top + height <= content height.
            let step = pixels_per_line as f64;
            let snapped = (raw / step).round() * step;
            let max_snapped = (max_top / step).floor() * step;
            top = snapped.clamp(0.0, max_snapped.max(0.0));
        }

        let top_px = top as i32;
        self.geometry.slider = Rect::new(0, top_px, width, slider_height);
        self.geometry.sub_page = if top_px > 0 {
            Rect::new(0, 0, width, top_px)
        } else {
            Rect::empty()
        };
        let add_page_top = (top + slider_height as f64).ceil() as i32;
        self.geometry.add_page = if add_page_top < track_height {
            Rect::new(0, add_page_top, width, track_height - add_page_top)
        } else {
            Rect::empty()
        };
    }

    pub fn render(
        &mut self,
        ctx: &RenderContext<'_>,
        config: &MinimapConfig,
        palette: Palette,
    ) -> bool {
        let track_height = ctx.scrollbar.height;
        let text_width = self.image.width() - EXTRA_AREA_WIDTH;
        if text_width <= 0 || track_height <= 0 {
            return false;
        }

        let pixels_per_line = config.pixels_per_line.max(1);
        let tab = ctx.document.tab_size() as i32;

        let content_height = ctx.document.visible_line_units() * pixels_per_line as f64;
        let pan_y = if content_height > track_height as f64 && ctx.scrollbar.range() > 0 {
            ctx.scrollbar.percent() * (content_height - track_height as f64)
        } else {
            0.0
        };

        let first_line = (pan_y / pixels_per_line as f64).floor() as usize;
        let sub_line_offset = pan_y - first_line as f64 * pixels_per_line as f64;

        self.image.fill(palette.background);

        let mut y = (-sub_line_offset).round() as i32;
        let mut index = first_line;
        while index < ctx.document.line_count() && y < track_height {
            let Some(line) = ctx.document.line(index) else {
                break;
            };
            index += 1;
            if !line.is_visible() {
                continue;
            }

            let mut marks = LineMarks::default();
            marks.observe(line, &ctx.viewport);

            let row = y.clamp(0, track_height - 1);
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

            for duplicate in 1..pixels_per_line - 1 {
                let target = y + duplicate;
                if target >= 0 && target < track_height {
                    self.image.duplicate_scan_line(row, target);
                }
            }
            y += pixels_per_line;
        }

        true
    }

    /// Maps a pointer position (treated as the desired slider center)
    /// to a scrollbar value.
    pub fn map_pointer_to_scroll(
        &self,
        position: Point,
        ctx: &RenderContext<'_>,
        config: &MinimapConfig,
    ) -> Option<i32> {
        let pixels_per_line = config.pixels_per_line.max(1);
        let content_height = ctx.document.visible_line_units() as i32 * pixels_per_line;
        let slider_height = self.geometry.slider.height;

        let mouse_y = (position.y - slider_height / 2).max(0);
        let range_px = ctx.scrollbar.height.min(content_height) - slider_height;
        if range_px <= 0 {
            return Some(ctx.scrollbar.minimum);
        }

        let relative = mouse_y as f64 / range_px as f64;
        let value = ctx.scrollbar.minimum
            + (ctx.scrollbar.range() as f64 * relative) as i32;
        Some(ctx.scrollbar.clamp_value(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ScrollbarState;
    use minimap_text::{DocumentLine, Rgb, TextDocument};

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

    fn scrollbar(value: i32, maximum: i32) -> ScrollbarState {
        ScrollbarState {
            value,
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
    fn slider_top_snaps_to_row_boundaries() {
        let doc = document(1000);
        let mut strategy = ScrollingStrategy::new();
        for value in (0..=975).step_by(13) {
            let ctx = RenderContext {
                document: &doc,
                scrollbar: scrollbar(value, 975),
                viewport: viewport(),
            };
            strategy.recompute_geometry(&ctx, &config());
            let slider = strategy.geometry().slider;
            assert_eq!(slider.y % 2, 0, "value {value}: top {}", slider.y);
            assert!(slider.y >= 0);
            assert!(slider.bottom() <= 400, "value {value}");
        }
    }

    #[test]
    fn image_height_matches_the_track() {
        let doc = document(1000);
        let ctx = RenderContext {
            document: &doc,
            scrollbar: scrollbar(0, 975),
            viewport: viewport(),
        };
        let mut strategy = ScrollingStrategy::new();
        strategy.recompute_geometry(&ctx, &config());
        assert_eq!(strategy.image().height(), 400);
        assert_eq!(strategy.image().width(), 87);
    }

    #[test]
    fn window_pans_with_the_scroll_position() {
        let mut doc = TextDocument::new();
        for index in 0..1000 {
            let line = if index == 999 {
                DocumentLine::new("end").with_colors(None, Some(Rgb::RED))
            } else {
                DocumentLine::new("mid")
            };
            doc.push_line(line);
        }

        let mut strategy = ScrollingStrategy::new();
        let text_x = EXTRA_AREA_WIDTH;

        // at the top the first line is in the first row
        let ctx = RenderContext {
            document: &doc,
            scrollbar: scrollbar(0, 975),
            viewport: viewport(),
        };
        strategy.recompute_geometry(&ctx, &config());
        assert!(strategy.render(&ctx, &config(), palette()));
        assert_eq!(strategy.image().pixel(text_x, 0), Some(palette().foreground));

        // at the bottom the last line sits at the last row pair
        let ctx = RenderContext {
            document: &doc,
            scrollbar: scrollbar(975, 975),
            viewport: viewport(),
        };
        strategy.recompute_geometry(&ctx, &config());
        assert!(strategy.render(&ctx, &config(), palette()));
        assert_eq!(strategy.image().pixel(text_x, 398), Some(Rgb::RED));
    }

    #[test]
    fn short_documents_do_not_pan() {
        let doc = document(50);
        let ctx = RenderContext {
            document: &doc,
            scrollbar: scrollbar(10, 25),
            viewport: viewport(),
        };
        let mut strategy = ScrollingStrategy::new();
        strategy.recompute_geometry(&ctx, &config());
        assert!(strategy.render(&ctx, &config(), palette()));
        // 100 px of content, rows below it stay background
        assert_eq!(
            strategy.image().pixel(EXTRA_AREA_WIDTH, 150),
            Some(palette().background)
        );
    }

    #[test]
    fn degenerate_track_refuses_to_render() {
        let doc = document(10);
        let mut state = scrollbar(0, 0);
        state.height = 0;
        let ctx = RenderContext {
            document: &doc,
            scrollbar: state,
            viewport: viewport(),
        };
        let mut strategy = ScrollingStrategy::new();
        strategy.recompute_geometry(&ctx, &config());
        assert!(!strategy.render(&ctx, &config(), palette()));
    }

    #[test]
    fn pointer_maps_linearly_over_the_pan_range() {
        let doc = document(1000);
        let ctx = RenderContext {
            document: &doc,
            scrollbar: scrollbar(0, 975),
            viewport: viewport(),
        };
        let mut strategy = ScrollingStrategy::new();
        strategy.recompute_geometry(&ctx, &config());

        // slider is 50 px tall; range is min(400, 2000) - 50 = 350
        let value = strategy
            .map_pointer_to_scroll(Point::new(50, 200), &ctx, &config())
            .unwrap();
        assert_eq!(value, 487);

        let top = strategy
            .map_pointer_to_scroll(Point::new(50, 0), &ctx, &config())
            .unwrap();
        assert_eq!(top, 0);

        let bottom = strategy
            .map_pointer_to_scroll(Point::new(50, 400), &ctx, &config())
            .unwrap();
        assert_eq!(bottom, 975);
    }

    #[test]
    fn pointer_mapping_degenerates_to_minimum() {
        let doc = document(5);
        let ctx = RenderContext {
            document: &doc,
            scrollbar: scrollbar(0, 0),
            viewport: viewport(),
        };
        let mut strategy = ScrollingStrategy::new();
        strategy.recompute_geometry(&ctx, &config());
        // content (10 px) is shorter than the slider; nothing to map
        assert_eq!(
            strategy.map_pointer_to_scroll(Point::new(50, 100), &ctx, &config()),
            Some(0)
        );
    }

    #[test]
    fn fractional_line_units_round_into_geometry() {
        let mut doc = document(199);
        doc.set_visible_line_units(199.5);
        let ctx = RenderContext {
            document: &doc,
            scrollbar: scrollbar(0, 150),
            viewport: viewport(),
        };
        let mut strategy = ScrollingStrategy::new();
        strategy.recompute_geometry(&ctx, &config());
        // 199 rows of 2 px cap the groove below the track height
        assert_eq!(strategy.geometry().groove.height, 398);
        assert!(strategy.render(&ctx, &config(), palette()));
    }
}
