//! Per-character scanline writing.
//!
//! Both strategies funnel every character through [`write_cell`]: one
//! pixel per character (tab stops excepted), background for whitespace,
//! foreground for ink, with an optional subtractive blend against the
//! pixel already in the scanline.

use minimap_text::{DocumentLine, FormatRange, Revision, Rgb};

use crate::blend::blend_ink;
use crate::geometry::ViewportMetrics;

/// Columns reserved at the left edge of the strip for fold and revision
/// markers.
pub const EXTRA_AREA_WIDTH: i32 = 7;

/// Marker columns inside the extra area.
const REVISION_MARK_COLUMNS: [usize; 2] = [1, 2];
const FOLD_MARK_COLUMNS: [usize; 2] = [4, 5];

/// Width of the minimap strip: the configured width plus the marker
/// area, capped by what the editor can spare next to its gutter.
pub fn strip_width(configured_width: i32, viewport: &ViewportMetrics) -> i32 {
    (viewport.editor_width - viewport.gutter_width).min(configured_width + EXTRA_AREA_WIDTH)
}

/// Writes the pixels for one character into `scan` at column `*x`.
///
/// `scan` starts at the first text column (past the extra area) and is
/// `width` pixels long. Tabs advance the cursor by `tab` columns,
/// painted as background unless `blend` is set, in which case the
/// columns are left untouched. Whitespace paints background;
/// anything else paints foreground, mixed with the existing pixel via
/// [`blend_ink`] when `blend` is set.
///
/// Returns false once the cursor reaches `width`, the expected stop
/// for lines wider than the strip rather than an error.
pub fn write_cell(
    scan: &mut [u32],
    blend: bool,
    ch: char,
    x: &mut i32,
    width: i32,
    tab: i32,
    background: Rgb,
    foreground: Rgb,
) -> bool {
    if ch == '\t' {
        for _ in 0..tab {
            if !blend {
                scan[*x as usize] = background.pack();
            }
            *x += 1;
            if *x >= width {
                return false;
            }
        }
        return true;
    }

    let is_space = ch.is_whitespace();
    let pixel = if blend && !is_space {
        blend_ink(foreground, Rgb::unpack(scan[*x as usize]))
    } else if is_space {
        background
    } else {
        foreground
    };
    scan[*x as usize] = pixel.pack();
    *x += 1;
    *x < width
}

/// Applies optional color overrides onto the inherited pair.
pub fn merge_colors(
    background: &mut Rgb,
    foreground: &mut Rgb,
    override_background: Option<Rgb>,
    override_foreground: Option<Rgb>,
) {
    if let Some(color) = override_background {
        *background = color;
    }
    if let Some(color) = override_foreground {
        *foreground = color;
    }
}

/// Orders format ranges for the monotone scan: by start, start ties by
/// ascending length.
pub fn sort_formats(formats: &mut [FormatRange]) {
    formats.sort_by(|a, b| a.start.cmp(&b.start).then(a.length.cmp(&b.length)));
}

/// Monotone cursor over sorted format ranges.
///
/// Columns must be queried in non-decreasing order; consumed ranges are
/// never revisited.
pub struct FormatCursor<'a> {
    ranges: &'a [FormatRange],
    index: usize,
}

impl<'a> FormatCursor<'a> {
    pub fn new(ranges: &'a [FormatRange]) -> Self {
        Self { ranges, index: 0 }
    }

    /// First remaining range containing `column`, if any.
    pub fn format_at(&mut self, column: usize) -> Option<&'a FormatRange> {
        while let Some(range) = self.ranges.get(self.index) {
            if range.end() <= column {
                self.index += 1;
            } else {
                break;
            }
        }
        let range = self.ranges.get(self.index)?;
        range.contains(column).then_some(range)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum RevisionMark {
    #[default]
    None,
    Added,
    Modified,
}

/// Fold/revision marker state carried across decimation-skipped lines:
/// the first line exhibiting a condition decides it, except that a
/// modification always wins over an addition.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineMarks {
    folded: bool,
    revision: RevisionMark,
}

impl LineMarks {
    pub fn observe(&mut self, line: &DocumentLine, viewport: &ViewportMetrics) {
        if viewport.code_folding_visible && !self.folded {
            self.folded = line.is_folded();
        }
        if viewport.revisions_visible {
            match line.revision() {
                Revision::Unchanged => {}
                Revision::Added => {
                    if self.revision == RevisionMark::None {
                        self.revision = RevisionMark::Added;
                    }
                }
                Revision::Modified => self.revision = RevisionMark::Modified,
            }
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Paints the markers into a full-width scanline (extra area
    /// included). Strips too narrow for the marker columns are skipped.
    pub fn paint(&self, scan: &mut [u32]) {
        if scan.len() <= FOLD_MARK_COLUMNS[1] {
            return;
        }
        let revision_color = match self.revision {
            RevisionMark::None => None,
            RevisionMark::Added => Some(Rgb::DARK_GREEN),
            RevisionMark::Modified => Some(Rgb::RED),
        };
        if let Some(color) = revision_color {
            for column in REVISION_MARK_COLUMNS {
                scan[column] = color.pack();
            }
        }
        if self.folded {
            for column in FOLD_MARK_COLUMNS {
                scan[column] = Rgb::BLACK.pack();
            }
        }
    }
}
