//! Subtractive ink mixing for the strip highlight.
//!
//! Mixing foreground pixels with what already sits in the scanline goes
//! through CMYK: per-channel saturating addition behaves like layering
//! ink, so dark-on-dark stays readable where a straight alpha blend
//! would wash out.

use minimap_text::Rgb;

/// CMYK with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cmyk {
    pub c: f64,
    pub m: f64,
    pub y: f64,
    pub k: f64,
}

impl From<Rgb> for Cmyk {
    fn from(rgb: Rgb) -> Self {
        let r = rgb.r as f64 / 255.0;
        let g = rgb.g as f64 / 255.0;
        let b = rgb.b as f64 / 255.0;

        let c = 1.0 - r;
        let m = 1.0 - g;
        let y = 1.0 - b;
        let k = c.min(m).min(y);
        if k >= 1.0 {
            return Self {
                c: 0.0,
                m: 0.0,
                y: 0.0,
                k,
            };
        }
        Self {
            c: (c - k) / (1.0 - k),
            m: (m - k) / (1.0 - k),
            y: (y - k) / (1.0 - k),
            k,
        }
    }
}

impl Cmyk {
    pub fn to_rgb(self) -> Rgb {
        let r = 1.0 - (self.c * (1.0 - self.k) + self.k).min(1.0);
        let g = 1.0 - (self.m * (1.0 - self.k) + self.k).min(1.0);
        let b = 1.0 - (self.y * (1.0 - self.k) + self.k).min(1.0);
        Rgb::new(
            (r * 255.0).round() as u8,
            (g * 255.0).round() as u8,
            (b * 255.0).round() as u8,
        )
    }
}

/// Mixes `ink` over `base` with saturating per-channel CMYK addition.
pub fn blend_ink(ink: Rgb, base: Rgb) -> Rgb {
    let a = Cmyk::from(ink);
    let b = Cmyk::from(base);
    Cmyk {
        c: (a.c + b.c).min(1.0),
        m: (a.m + b.m).min(1.0),
        y: (a.y + b.y).min(1.0),
        k: (a.k + b.k).min(1.0),
    }
    .to_rgb()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_cmyk_round_trip_on_primaries() {
        for color in [Rgb::WHITE, Rgb::BLACK, Rgb::RED, Rgb::new(0, 0, 255)] {
            assert_eq!(Cmyk::from(color).to_rgb(), color);
        }
    }

    #[test]
    fn white_ink_leaves_base_unchanged() {
        let base = Rgb::new(40, 120, 200);
        assert_eq!(blend_ink(Rgb::WHITE, base), base);
    }

    #[test]
    fn black_ink_saturates_to_black() {
        assert_eq!(blend_ink(Rgb::BLACK, Rgb::new(90, 90, 90)), Rgb::BLACK);
    }

    #[test]
    fn complementary_inks_darken() {
        // cyan ink over yellow paper picks up both pigments
        let blended = blend_ink(Rgb::new(0, 255, 255), Rgb::new(255, 255, 0));
        assert_eq!(blended, Rgb::new(0, 255, 0));
    }
}
