//! Palettes and glyph ramps: immutable per-scene color configuration.
//!
//! Every scene owns its palettes as `'static` data injected at
//! construction; nothing mutates them at runtime. Indexing is modular, and
//! an empty palette falls back to a hardcoded default rather than erroring,
//! so a degenerate configuration still animates.

use crate::buffer::Color;
use rand::rngs::StdRng;
use rand::Rng;

/// An ordered set of ANSI 256-color indices.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    colors: &'static [Color],
}

impl Palette {
    /// Wrap a static color slice.
    pub const fn new(colors: &'static [Color]) -> Self {
        Self { colors }
    }

    /// Number of entries.
    #[inline]
    pub const fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the palette has no entries.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Modular lookup; an empty palette yields the fallback white.
    #[inline]
    pub fn get(&self, index: usize) -> Color {
        if self.colors.is_empty() {
            return Color::WHITE;
        }
        self.colors[index % self.colors.len()]
    }

    /// Map a ratio in `[0, 1]` onto the palette, clamped at the ends.
    #[inline]
    pub fn ratio(&self, value: f64) -> Color {
        if self.colors.is_empty() {
            return Color::WHITE;
        }
        let scaled = value.clamp(0.0, 1.0) * self.colors.len() as f64;
        let index = (scaled as usize).min(self.colors.len() - 1);
        self.colors[index]
    }

    /// Uniformly pick one entry.
    #[inline]
    pub fn pick(&self, rng: &mut StdRng) -> Color {
        if self.colors.is_empty() {
            return Color::WHITE;
        }
        self.colors[rng.gen_range(0..self.colors.len())]
    }
}

/// An ordered set of ASCII glyphs graded by intensity.
#[derive(Debug, Clone, Copy)]
pub struct GlyphRamp {
    glyphs: &'static [u8],
}

impl GlyphRamp {
    /// Wrap a static glyph slice.
    pub const fn new(glyphs: &'static [u8]) -> Self {
        Self { glyphs }
    }

    /// Number of entries.
    #[inline]
    pub const fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Whether the ramp has no entries.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Modular lookup; an empty ramp yields the fallback `#`.
    #[inline]
    pub fn get(&self, index: usize) -> u8 {
        if self.glyphs.is_empty() {
            return b'#';
        }
        self.glyphs[index % self.glyphs.len()]
    }

    /// Map a ratio in `[0, 1]` onto the ramp, clamped at the ends.
    #[inline]
    pub fn ratio(&self, value: f64) -> u8 {
        if self.glyphs.is_empty() {
            return b'#';
        }
        let scaled = value.clamp(0.0, 1.0) * self.glyphs.len() as f64;
        let index = (scaled as usize).min(self.glyphs.len() - 1);
        self.glyphs[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static COLORS: [Color; 3] = [Color(45), Color(81), Color(123)];

    #[test]
    fn test_modular_lookup() {
        let palette = Palette::new(&COLORS);
        assert_eq!(palette.get(0), Color(45));
        assert_eq!(palette.get(4), Color(81));
    }

    #[test]
    fn test_ratio_clamps() {
        let palette = Palette::new(&COLORS);
        assert_eq!(palette.ratio(-1.0), Color(45));
        assert_eq!(palette.ratio(0.5), Color(81));
        assert_eq!(palette.ratio(2.0), Color(123));
    }

    #[test]
    fn test_empty_palette_falls_back() {
        let palette = Palette::new(&[]);
        assert_eq!(palette.get(7), Color::WHITE);
        assert_eq!(palette.ratio(0.5), Color::WHITE);
    }

    #[test]
    fn test_empty_ramp_falls_back() {
        let ramp = GlyphRamp::new(&[]);
        assert_eq!(ramp.ratio(0.5), b'#');
        assert_eq!(ramp.get(3), b'#');
    }

    #[test]
    fn test_ramp_grading() {
        let ramp = GlyphRamp::new(b" .:-=*#");
        assert_eq!(ramp.ratio(0.0), b' ');
        assert_eq!(ramp.ratio(1.0), b'#');
    }
}
