//! Tunnel scene: Radial neon tunnel with rays, debris and pulse rings.
//!
//! The base field mixes wave, spiral, flow and band terms per cell and
//! claims the frame last; the overlays (center glow, pulse rings, debris,
//! rays, background stars) write first at graded depths so their stacking
//! matches their distance from the viewer.

use super::palette::{GlyphRamp, Palette};
use super::{Scene, SceneConfig};
use crate::buffer::{Color, FrameBuffer};
use rand::rngs::StdRng;
use std::f64::consts::{PI, TAU};

const GLOW_DEPTH: f32 = 0.5;
const RING_DEPTH: f32 = 0.6;
const DEBRIS_DEPTH: f32 = 0.7;
const RAY_DEPTH: f32 = 0.8;
const STAR_DEPTH: f32 = 0.9;

static COLOR_PALETTE: Palette = Palette::new(&[
    Color(17),
    Color(18),
    Color(19),
    Color(20),
    Color(27),
    Color(33),
    Color(39),
    Color(45),
    Color(51),
    Color(87),
    Color(123),
    Color(159),
    Color(195),
]);
static GLYPH_PALETTE: GlyphRamp = GlyphRamp::new(&[
    b' ', b'.', b'.', b':', b'-', b'+', b'*', b'x', b'X', b'#', b'@',
]);
static STAR_PALETTE: Palette = Palette::new(&[
    Color(25),
    Color(31),
    Color(33),
    Color(39),
    Color(45),
    Color(51),
]);
static ACCENT_PALETTE: Palette = Palette::new(&[Color(51), Color(87), Color(123), Color(159)]);

/// The neon tunnel scene.
pub struct Tunnel;

impl Tunnel {
    /// Build the scene; all motion derives from the tick.
    pub fn new(_cfg: &SceneConfig) -> Self {
        Self
    }

    fn draw_center_glow(frame: &mut FrameBuffer, tick: u64) {
        let width = i32::from(frame.width());
        let height = i32::from(frame.height());
        let cx = width / 2;
        let cy = height / 2;

        let radius = 1 + (2.0 * (0.5 + 0.5 * (tick as f64 * 0.1 + 1.4).sin())) as i32;
        for y in (cy - radius)..=(cy + radius) {
            for x in (cx - radius)..=(cx + radius) {
                let dist = f64::from(x - cx).hypot(f64::from(y - cy));
                if dist <= f64::from(radius) {
                    frame.set(x, y, b'*', Some(Color(195)), GLOW_DEPTH);
                }
            }
        }
    }

    fn draw_pulse_rings(frame: &mut FrameBuffer, tick: u64) {
        let width = i32::from(frame.width());
        let height = i32::from(frame.height());
        let cx = width / 2;
        let cy = height / 2;
        let max_r = f64::from(width) / 2.0 - 1.0;
        if max_r < 2.0 {
            return;
        }

        let speed = 1.15;
        let thickness = 1.8;
        let gap = 10.0;
        let cycle = max_r + thickness * 2.0 + gap;
        let phase = (tick as f64 * speed) % cycle;
        if phase > max_r + thickness {
            return;
        }
        let radius = phase.max(1.0).min(max_r);
        let color = ACCENT_PALETTE.get(tick as usize / 7);

        for y in 0..height {
            for x in 0..width {
                let dist = f64::from(x - cx).hypot(f64::from(y - cy));
                let band = (dist - radius).abs();
                if band > thickness {
                    continue;
                }
                let intensity = (1.0 - band / thickness).clamp(0.0, 1.0);
                let glyph = if intensity > 0.65 { b'*' } else { b'.' };
                frame.set(x, y, glyph, Some(color), RING_DEPTH);
            }
        }
    }

    fn draw_background_stars(frame: &mut FrameBuffer, tick: u64) {
        let t = tick as usize;
        let width = usize::from(frame.width());
        let height = usize::from(frame.height());
        for y in (0..height).step_by(2) {
            let mut x = (y + t / 3) % 6;
            while x < width {
                let color = STAR_PALETTE.get(x / 3 + y + t / 11);
                if (x * 37 + y * 13 + t) % 57 < 3 {
                    frame.set(x as i32, y as i32, b'.', Some(color), STAR_DEPTH);
                } else if (x * 19 + y * 7 + t * 2) % 71 == 0 {
                    frame.set(x as i32, y as i32, b'+', Some(color), STAR_DEPTH);
                }
                x += 6;
            }
        }
    }

    fn draw_rays(frame: &mut FrameBuffer, tick: u64) {
        let width = i32::from(frame.width());
        let height = i32::from(frame.height());
        let cx = width / 2;
        let cy = height / 2;
        let count = 14;
        let max_r = f64::from(width) / 2.0;
        let t = tick as f64;
        for i in 0..count {
            let angle = f64::from(i) / f64::from(count) * TAU + (t * 0.012).sin() * 0.6;
            let phase = (t * 0.06 + f64::from(i)).sin() * 0.5;
            let length = max_r * (0.6 + 0.35 * phase);
            let color = ACCENT_PALETTE.get(i as usize + tick as usize / 6);
            let glyph = if i % 2 == 0 { b'/' } else { b'|' };
            let mut r = 1.0;
            while r < length {
                let x = cx + (angle.cos() * r) as i32;
                let y = cy + (angle.sin() * r * 0.6) as i32;
                frame.set(x, y, glyph, Some(color), RAY_DEPTH);
                r += 0.8;
            }
        }
    }

    fn draw_debris(frame: &mut FrameBuffer, tick: u64) {
        let width = i32::from(frame.width());
        let height = i32::from(frame.height());
        let cx = width / 2;
        let cy = height / 2;
        let count = width / 2;
        let t = tick as f64;
        for i in 0..count {
            let f = f64::from(i) + t * 0.9;
            let theta = (f * 0.03 + t * 0.001).sin() * PI + f64::from(i % 7) * 0.4;
            let r = (f * 0.18 % (f64::from(width) / 2.0)) * (0.7 + 0.3 * (t * 0.02).sin());
            let x = cx + (theta.cos() * r) as i32;
            let y = cy + (theta.sin() * r * 0.65) as i32;
            let color = COLOR_PALETTE.get(i as usize + tick as usize / 5);
            let glyph = GLYPH_PALETTE.get(i as usize + tick as usize);
            frame.set(x, y, glyph, Some(color), DEBRIS_DEPTH);
        }
    }

    fn draw_field(frame: &mut FrameBuffer, tick: u64) {
        let width = i32::from(frame.width());
        let height = i32::from(frame.height());
        let t = tick as f64 * 0.045;
        let swirl = tick as f64 * 0.02;
        let depth_pulse = 0.55 + 0.4 * (tick as f64 * 0.05).sin();

        for y in 0..height {
            let ny = (f64::from(y) / f64::from(height) - 0.5) * 2.0 * 0.72;
            for x in 0..width {
                let nx = (f64::from(x) / f64::from(width) - 0.5) * 2.0 * 1.1;

                let r = nx.hypot(ny) + 0.0001;
                let angle = ny.atan2(nx);

                let depth = 1.0 / (r * 2.2 + 0.5);
                let wave = (1.5 / r - t * 1.7 + (angle * 3.0 + swirl).cos() * 0.55).sin();
                let spiral = (angle * 6.0 + t * 2.1).sin();
                let flow = (r * 14.0 - t * 3.4 + angle * 1.3).cos();
                let band = ((r - depth_pulse) * 9.0 - t * 1.2).cos();

                let value =
                    wave * 0.62 + spiral * 0.24 + flow * 0.28 + band * 0.18 - r * 0.95;
                let intensity = value + depth * 0.9;

                frame.set_if_empty(
                    x,
                    y,
                    glyph_for_value(intensity),
                    Some(palette_for_value(intensity)),
                );
            }
        }
    }
}

impl Scene for Tunnel {
    fn draw(&self, frame: &mut FrameBuffer, tick: u64) {
        Self::draw_center_glow(frame, tick);
        Self::draw_pulse_rings(frame, tick);
        Self::draw_debris(frame, tick);
        Self::draw_rays(frame, tick);
        Self::draw_background_stars(frame, tick);
        Self::draw_field(frame, tick);
    }

    fn advance(&mut self, _rng: &mut StdRng) {
        // All motion is derived from the tick; nothing to step.
    }
}

fn palette_for_value(v: f64) -> Color {
    let norm = ((v + 1.3) / 2.6).clamp(0.0, 0.9999);
    COLOR_PALETTE.get((norm * COLOR_PALETTE.len() as f64) as usize)
}

fn glyph_for_value(v: f64) -> u8 {
    let norm = ((v + 1.0) / 2.0).clamp(0.0, 0.9999);
    GLYPH_PALETTE.get((norm * GLYPH_PALETTE.len() as f64) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn build() -> Tunnel {
        let cfg = SceneConfig::new(60, 24, Duration::from_millis(35));
        Tunnel::new(&cfg)
    }

    #[test]
    fn test_value_ramps_clamp_extremes() {
        assert_eq!(glyph_for_value(-10.0), b' ');
        assert_eq!(glyph_for_value(10.0), b'@');
        assert_eq!(palette_for_value(-10.0), Color(17));
        assert_eq!(palette_for_value(10.0), Color(195));
    }

    #[test]
    fn test_draw_is_deterministic() {
        let scene = build();
        let mut a = FrameBuffer::new(60, 24);
        let mut b = FrameBuffer::new(60, 24);
        scene.draw(&mut a, 33);
        scene.draw(&mut b, 33);
        assert!(a == b);
    }

    #[test]
    fn test_field_colors_every_cell() {
        let scene = build();
        let mut frame = FrameBuffer::new(60, 24);
        scene.draw(&mut frame, 8);
        assert!(frame.cells().iter().all(|c| c.color().is_some()));
    }

    #[test]
    fn test_center_glow_claims_center() {
        let scene = build();
        let mut frame = FrameBuffer::new(60, 24);
        scene.draw(&mut frame, 0);
        let center = frame.cells()[12 * 60 + 30];
        assert_eq!(center.glyph(), b'*');
    }
}
