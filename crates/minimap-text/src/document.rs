use crate::line::DocumentLine;

const DEFAULT_TAB_SIZE: usize = 4;

/// Read-only view of a document as the minimap renderer consumes it.
///
/// Hosts with their own buffer implement this directly; tests and simple
/// hosts use [`TextDocument`]. Lines are addressed by index in document
/// order, including lines hidden inside collapsed folds (the renderer
/// checks [`DocumentLine::is_visible`] itself).
pub trait DocumentSource {
    fn line_count(&self) -> usize;

    fn line(&self, index: usize) -> Option<&DocumentLine>;

    /// Height of the document in layout line units. Hosts that wrap long
    /// lines report the wrapped total, which may be fractional; the
    /// default is the unwrapped line count.
    fn visible_line_units(&self) -> f64 {
        self.line_count() as f64
    }

    /// Columns a tab character advances by.
    fn tab_size(&self) -> usize {
        DEFAULT_TAB_SIZE
    }

    fn is_empty(&self) -> bool {
        self.line_count() == 0
    }
}

/// In-memory [`DocumentSource`] backed by a line vector.
#[derive(Debug, Clone, Default)]
pub struct TextDocument {
    lines: Vec<DocumentLine>,
    tab_size: usize,
    visible_line_units: Option<f64>,
}

impl TextDocument {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            tab_size: DEFAULT_TAB_SIZE,
            visible_line_units: None,
        }
    }

    /// Splits plain text into unstyled lines.
    pub fn from_text(text: &str) -> Self {
        let mut document = Self::new();
        for line in text.lines() {
            document.push_line(DocumentLine::new(line));
        }
        document
    }

    pub fn push_line(&mut self, line: DocumentLine) {
        self.lines.push(line);
    }

    pub fn set_line(&mut self, index: usize, line: DocumentLine) {
        if let Some(slot) = self.lines.get_mut(index) {
            *slot = line;
        }
    }

    pub fn set_tab_size(&mut self, tab_size: usize) {
        self.tab_size = tab_size.max(1);
    }

    /// Overrides the layout height, for hosts that wrap lines.
    pub fn set_visible_line_units(&mut self, units: f64) {
        self.visible_line_units = Some(units.max(0.0));
    }

    pub fn lines(&self) -> &[DocumentLine] {
        &self.lines
    }
}

impl DocumentSource for TextDocument {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line(&self, index: usize) -> Option<&DocumentLine> {
        self.lines.get(index)
    }

    fn visible_line_units(&self) -> f64 {
        self.visible_line_units
            .unwrap_or_else(|| self.lines.iter().filter(|line| line.is_visible()).count() as f64)
    }

    fn tab_size(&self) -> usize {
        self.tab_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::Revision;

    #[test]
    fn from_text_splits_lines() {
        let document = TextDocument::from_text("one\ntwo\nthree");
        assert_eq!(document.line_count(), 3);
        let text: String = document.line(1).unwrap().chars().collect();
        assert_eq!(text, "two");
    }

    #[test]
    fn visible_line_units_skips_hidden_lines() {
        let mut document = TextDocument::from_text("a\nb\nc");
        document.set_line(1, DocumentLine::new("b").with_visible(false));
        assert_eq!(document.visible_line_units(), 2.0);
    }

    #[test]
    fn visible_line_units_override_wins() {
        let mut document = TextDocument::from_text("a\nb");
        document.set_visible_line_units(3.5);
        assert_eq!(document.visible_line_units(), 3.5);
    }

    #[test]
    fn set_line_replaces_flags() {
        let mut document = TextDocument::from_text("a");
        document.set_line(0, DocumentLine::new("a").with_revision(Revision::Modified));
        assert_eq!(document.line(0).unwrap().revision(), Revision::Modified);
    }
}
