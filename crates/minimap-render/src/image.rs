use minimap_text::Rgb;

/// Row-major pixel buffer the strategies rasterize into.
///
/// One `u32` per pixel in `0x00RRGGBB` layout. The buffer is owned and
/// written exclusively by the strategy instance that allocated it; the
/// paint path only reads. Dimensions requested as non-positive collapse
/// to an empty image, which every accessor treats as "no scanlines".
#[derive(Debug, Clone, Default)]
pub struct MinimapImage {
    width: i32,
    height: i32,
    pixels: Vec<u32>,
}

impl MinimapImage {
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            pixels: vec![0; (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color.pack());
    }

    pub fn scan_line(&self, y: i32) -> Option<&[u32]> {
        self.row_bounds(y)
            .map(|(start, end)| &self.pixels[start..end])
    }

    pub fn scan_line_mut(&mut self, y: i32) -> Option<&mut [u32]> {
        self.row_bounds(y)
            .map(|(start, end)| &mut self.pixels[start..end])
    }

    /// Copies scanline `src` over scanline `dst`. Out-of-range rows are
    /// ignored.
    pub fn duplicate_scan_line(&mut self, src: i32, dst: i32) {
        let Some((src_start, _)) = self.row_bounds(src) else {
            return;
        };
        let Some((dst_start, _)) = self.row_bounds(dst) else {
            return;
        };
        let width = self.width as usize;
        self.pixels.copy_within(src_start..src_start + width, dst_start);
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb> {
        if x < 0 || x >= self.width {
            return None;
        }
        self.scan_line(y).map(|row| Rgb::unpack(row[x as usize]))
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    fn row_bounds(&self, y: i32) -> Option<(usize, usize)> {
        if y < 0 || y >= self.height || self.width == 0 {
            return None;
        }
        let start = (y as usize) * (self.width as usize);
        Some((start, start + self.width as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_dimensions_collapse_to_empty() {
        let image = MinimapImage::new(-4, 10);
        assert!(image.is_empty());
        assert_eq!(image.scan_line(0), None);
    }

    #[test]
    fn fill_and_read_back() {
        let mut image = MinimapImage::new(4, 2);
        image.fill(Rgb::new(1, 2, 3));
        assert_eq!(image.pixel(3, 1), Some(Rgb::new(1, 2, 3)));
        assert_eq!(image.pixel(4, 1), None);
        assert_eq!(image.pixel(3, 2), None);
    }

    #[test]
    fn duplicate_copies_whole_rows() {
        let mut image = MinimapImage::new(3, 3);
        if let Some(row) = image.scan_line_mut(0) {
            row.copy_from_slice(&[1, 2, 3]);
        }
        image.duplicate_scan_line(0, 2);
        assert_eq!(image.scan_line(2), Some([1, 2, 3].as_slice()));
        // out-of-range targets are a no-op
        image.duplicate_scan_line(0, 7);
        image.duplicate_scan_line(-1, 1);
        assert_eq!(image.scan_line(1), Some([0, 0, 0].as_slice()));
    }
}
