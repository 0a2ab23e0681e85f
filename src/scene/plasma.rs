//! Plasma scene: Full-field sine plasma with scanline and radial glow.
//!
//! Every cell's glyph and color are a pure function of position and tick,
//! so the whole frame is computed in one pass: field value, then the
//! scanline and glow recolorings, then a single write per cell.

use super::palette::{GlyphRamp, Palette};
use super::{Scene, SceneConfig};
use crate::buffer::{Color, FrameBuffer};
use rand::rngs::StdRng;

const GLOW_STRENGTH: f64 = 0.18;
const SCANLINE_COLOR: Color = Color(231);

static COLOR_PALETTE: Palette = Palette::new(&[
    Color(17),
    Color(18),
    Color(19),
    Color(20),
    Color(27),
    Color(33),
    Color(39),
    Color(51),
    Color(87),
    Color(123),
    Color(159),
    Color(195),
]);
static GLYPH_PALETTE: GlyphRamp =
    GlyphRamp::new(&[b' ', b'.', b',', b':', b'-', b'=', b'*', b'#', b'%', b'@']);

/// Tuning knobs beyond the shared dimensions.
#[derive(Debug, Clone, Copy)]
pub struct PlasmaParams {
    /// Palette scroll rate per tick; non-positive falls back to 0.05.
    pub palette_scroll: f64,
}

impl Default for PlasmaParams {
    fn default() -> Self {
        Self {
            palette_scroll: 0.08,
        }
    }
}

/// The plasma field scene.
pub struct Plasma {
    palette_scroll: f64,
}

impl Plasma {
    /// Build the scene.
    pub fn new(_cfg: &SceneConfig, params: PlasmaParams) -> Self {
        let palette_scroll = if params.palette_scroll <= 0.0 {
            0.05
        } else {
            params.palette_scroll
        };
        Self { palette_scroll }
    }
}

impl Scene for Plasma {
    fn draw(&self, frame: &mut FrameBuffer, tick: u64) {
        let width = i32::from(frame.width());
        let height = i32::from(frame.height());
        let t = tick as f64 * 0.03;
        let scroll = tick as f64 * self.palette_scroll;
        let scan_y = ((tick / 3) % u64::from(frame.height())) as i32;
        let pulse = 0.5 + 0.5 * (tick as f64 * 0.04).sin();
        let center_x = f64::from(width) / 2.0;
        let center_y = f64::from(height) / 2.0;

        for y in 0..height {
            let fy = f64::from(y) / f64::from(height);
            for x in 0..width {
                let fx = f64::from(x) / f64::from(width);
                let value = plasma_value(fx, fy, t);
                let mut glyph = GLYPH_PALETTE.ratio(value);
                let mut color = palette_for_value(value + scroll);

                if y == scan_y {
                    color = SCANLINE_COLOR;
                    if glyph == b' ' {
                        glyph = b'-';
                    }
                }

                let dist = (f64::from(x) - center_x).hypot((f64::from(y) - center_y) * 0.8);
                let falloff = (-dist * GLOW_STRENGTH).exp();
                if falloff >= 0.1 {
                    color = palette_for_value(pulse * falloff * COLOR_PALETTE.len() as f64);
                }

                frame.set_if_empty(x, y, glyph, Some(color));
            }
        }
    }

    fn advance(&mut self, _rng: &mut StdRng) {
        // The field is a function of the tick alone; nothing to step.
    }
}

fn plasma_value(fx: f64, fy: f64, t: f64) -> f64 {
    let v = (fx * 10.0 + t).sin()
        + (fy * 12.0 - t * 0.7).sin()
        + ((fx + fy) * 8.0 + t * 0.3).sin()
        + 0.5 * ((fx - 0.5).hypot(fy - 0.5) * 15.0 - t * 1.5).sin();

    let noise = simple_noise(fx, fy, t);
    (v / 3.5 + noise * 0.25 + 1.0) / 2.0
}

fn simple_noise(x: f64, y: f64, t: f64) -> f64 {
    let n = ((x * 13.0 + y * 17.0 + t) * 12.9898).sin() * 43758.5453;
    n.abs() % 1.0
}

fn palette_for_value(v: f64) -> Color {
    if COLOR_PALETTE.is_empty() {
        return Color::WHITE;
    }
    let len = COLOR_PALETTE.len() as f64;
    let mut v = v % len;
    if v < 0.0 {
        v += len;
    }
    COLOR_PALETTE.get(v as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn build() -> Plasma {
        let cfg = SceneConfig::new(60, 24, Duration::from_millis(35));
        Plasma::new(&cfg, PlasmaParams::default())
    }

    #[test]
    fn test_field_values_normalized() {
        for i in 0..50 {
            let fx = f64::from(i) / 50.0;
            let v = plasma_value(fx, fx * 0.7, 3.0);
            assert!((-0.2..=1.2).contains(&v), "value {v} out of expected band");
        }
    }

    #[test]
    fn test_noise_is_fractional() {
        for i in 0..20 {
            let n = simple_noise(f64::from(i) * 0.1, 0.3, 1.0);
            assert!((0.0..1.0).contains(&n));
        }
    }

    #[test]
    fn test_palette_wraps_negative_values() {
        // Must not panic or index out of bounds for any sign of input.
        let _ = palette_for_value(-37.5);
        let _ = palette_for_value(0.0);
        let _ = palette_for_value(1e6);
    }

    #[test]
    fn test_every_cell_colored() {
        let scene = build();
        let mut frame = FrameBuffer::new(60, 24);
        scene.draw(&mut frame, 12);
        assert!(frame.cells().iter().all(|c| c.color().is_some()));
    }

    #[test]
    fn test_scanline_row_is_white() {
        let scene = build();
        let mut frame = FrameBuffer::new(60, 24);
        // tick 0: the scanline sits on row 0, far from the glow center.
        scene.draw(&mut frame, 0);
        let first_row: Vec<_> = frame.cells().iter().take(60).collect();
        assert!(first_row
            .iter()
            .any(|c| c.color() == Some(SCANLINE_COLOR)));
    }

    #[test]
    fn test_nonpositive_scroll_falls_back() {
        let cfg = SceneConfig::new(60, 24, Duration::from_millis(35));
        let scene = Plasma::new(&cfg, PlasmaParams { palette_scroll: 0.0 });
        assert!(scene.palette_scroll > 0.0);
    }
}
