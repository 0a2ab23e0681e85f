//! Aurora scene: Sine-offset curtains over a mountain silhouette.
//!
//! Three curtain bands sway on phase-shifted sines and smear downward on
//! an arithmetic dither, so the whole frame stays a pure function of the
//! tick. Stars twinkle behind the curtains; the ridge claims the bottom.

use super::palette::Palette;
use super::{Scene, SceneConfig};
use crate::buffer::{Color, FrameBuffer};
use rand::rngs::StdRng;

const STAR_DEPTH: f32 = 2.0;
const CURTAIN_DEPTH: f32 = 1.0;

static SKY_PALETTE: Palette = Palette::new(&[
    Color(17),
    Color(18),
    Color(19),
    Color(54),
    Color(55),
]);
static AURORA_PALETTE: Palette = Palette::new(&[
    Color(35),
    Color(41),
    Color(47),
    Color(83),
    Color(119),
    Color(159),
]);
static STAR_PALETTE: Palette = Palette::new(&[Color(231), Color(195), Color(153)]);
static MOUNTAIN_PALETTE: Palette = Palette::new(&[Color(235), Color(236), Color(237)]);

/// The aurora scene.
pub struct Aurora;

impl Aurora {
    /// Build the scene; all motion derives from the tick.
    pub fn new(_cfg: &SceneConfig) -> Self {
        Self
    }

    fn draw_sky(frame: &mut FrameBuffer, tick: u64) {
        let t = tick as usize;
        let width = i32::from(frame.width());
        let height = i32::from(frame.height());
        for y in 0..height / 2 {
            let color = SKY_PALETTE.get(y as usize / 2 + t / 30);
            for x in 0..width {
                frame.set_if_empty(x, y, b' ', Some(color));
            }
        }
    }

    fn draw_stars(frame: &mut FrameBuffer, tick: u64) {
        let t = tick as usize;
        let width = usize::from(frame.width());
        let height = usize::from(frame.height());
        for i in 0..width / 4 {
            let x = (i * 17 + t) % width;
            let y = (i * 7 + t / 3) % (height / 2);
            let color = STAR_PALETTE.get(x + y + t / 5);
            if (x + y + t) % 13 == 0 {
                frame.set(x as i32, y as i32, b'*', Some(color), STAR_DEPTH);
            } else if (x * 3 + y + t) % 19 == 0 {
                frame.set(x as i32, y as i32, b'+', Some(color), STAR_DEPTH);
            }
        }
    }

    fn draw_curtains(frame: &mut FrameBuffer, tick: u64) {
        let t = tick as usize;
        let width = i32::from(frame.width());
        let height = i32::from(frame.height());
        let base = height / 3;
        for band in 0..3i32 {
            for x in 0..width {
                let fx = f64::from(x) / f64::from(width);
                let phase = tick as f64 * 0.02 + f64::from(band) * 1.1;
                let offset = (fx * 5.0 + phase).sin() * f64::from(6 - band * 2);
                let y = base + band * 3 + offset as i32;
                if y < 0 || y >= height {
                    continue;
                }
                let value = ((fx * 12.0 + phase * 1.5).sin() + 1.0) / 2.0;
                let idx = (value * AURORA_PALETTE.len() as f64) as usize + band as usize;
                let color = AURORA_PALETTE.get(idx);
                let glyph = curtain_glyph(value);
                frame.set(x, y, glyph, Some(color), CURTAIN_DEPTH);
                // Dithered downward smear thickens the band.
                if y + 1 < height && (x as usize * 31 + band as usize * 17 + t) % 3 == 0 {
                    frame.set(x, y + 1, glyph, Some(color), CURTAIN_DEPTH);
                }
            }
        }
    }

    fn draw_mountains(frame: &mut FrameBuffer, tick: u64) {
        let width = i32::from(frame.width());
        let height = i32::from(frame.height());
        let base = height - 6;
        for x in 0..width {
            let offset = ((f64::from(x) / 7.0 + tick as f64 * 0.005).sin() * 4.0) as i32;
            let y = base - offset;
            let color = MOUNTAIN_PALETTE.get(x as usize / 5);
            for dy in 0..(height - y).max(0) {
                if y + dy >= height {
                    break;
                }
                frame.set_if_empty(x, y + dy, b'#', Some(color));
            }
        }
    }
}

impl Scene for Aurora {
    fn draw(&self, frame: &mut FrameBuffer, tick: u64) {
        Self::draw_sky(frame, tick);
        Self::draw_stars(frame, tick);
        Self::draw_curtains(frame, tick);
        Self::draw_mountains(frame, tick);
    }

    fn advance(&mut self, _rng: &mut StdRng) {
        // All motion is derived from the tick; nothing to step.
    }
}

fn curtain_glyph(v: f64) -> u8 {
    if v < 0.2 {
        b'.'
    } else if v < 0.5 {
        b'|'
    } else if v < 0.7 {
        b'/'
    } else {
        b'\\'
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn build() -> Aurora {
        let cfg = SceneConfig::new(60, 24, Duration::from_millis(40));
        Aurora::new(&cfg)
    }

    #[test]
    fn test_curtain_glyph_bands() {
        assert_eq!(curtain_glyph(0.1), b'.');
        assert_eq!(curtain_glyph(0.4), b'|');
        assert_eq!(curtain_glyph(0.6), b'/');
        assert_eq!(curtain_glyph(0.9), b'\\');
    }

    #[test]
    fn test_draw_is_deterministic() {
        let scene = build();
        let mut a = FrameBuffer::new(60, 24);
        let mut b = FrameBuffer::new(60, 24);
        scene.draw(&mut a, 42);
        scene.draw(&mut b, 42);
        assert!(a == b);
    }

    #[test]
    fn test_mountains_fill_bottom_rows() {
        let scene = build();
        let mut frame = FrameBuffer::new(60, 24);
        scene.draw(&mut frame, 0);
        let last_row = &frame.cells()[23 * 60..];
        assert!(last_row.iter().filter(|c| c.glyph() == b'#').count() > 30);
    }

    #[test]
    fn test_curtains_paint_midfield() {
        let scene = build();
        let mut frame = FrameBuffer::new(60, 24);
        scene.draw(&mut frame, 10);
        let band_rows = &frame.cells()[6 * 60..14 * 60];
        let curtain_cells = band_rows
            .iter()
            .filter(|c| matches!(c.glyph(), b'.' | b'|' | b'/' | b'\\'))
            .count();
        assert!(curtain_cells > 20);
    }
}
