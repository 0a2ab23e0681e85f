//! Ocean scene: Layered sine waves under a gradient sky.
//!
//! The water is a per-cell sum of three phase-shifted wave layers mapped
//! onto a glyph ramp. Foam, plankton and bubbles draw before the water
//! fill claims the rest, keeping them visible on top of the swell.

use super::palette::Palette;
use super::{Scene, SceneConfig};
use crate::buffer::{Color, FrameBuffer};
use rand::rngs::StdRng;
use rand::Rng;
use std::f64::consts::PI;

const BUBBLE_DEPTH: f32 = 0.5;
const PLANKTON_DEPTH: f32 = 0.6;

static SKY_PALETTE: Palette = Palette::new(&[
    Color(18),
    Color(19),
    Color(20),
    Color(26),
    Color(27),
    Color(33),
]);
static HORIZON_PALETTE: Palette = Palette::new(&[Color(54), Color(55), Color(90), Color(129)]);
static WAVE_PALETTE: Palette = Palette::new(&[
    Color(30),
    Color(31),
    Color(37),
    Color(44),
    Color(51),
]);
static FOAM_PALETTE: Palette = Palette::new(&[Color(189), Color(195), Color(231)]);
static PLANKTON_PALETTE: Palette = Palette::new(&[Color(45), Color(81), Color(117)]);

struct WaveLayer {
    scale: f64,
    speed: f64,
    amp: f64,
}

static WAVE_LAYERS: [WaveLayer; 3] = [
    WaveLayer {
        scale: 1.0,
        speed: 1.0,
        amp: 1.0,
    },
    WaveLayer {
        scale: 1.5,
        speed: 0.7,
        amp: 0.8,
    },
    WaveLayer {
        scale: 2.3,
        speed: 0.4,
        amp: 0.6,
    },
];

/// A drifting particle; bubbles and plankton share the shape.
struct Mote {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    life: i32,
    color: Color,
}

/// The ocean currents scene.
pub struct Ocean {
    width: i32,
    height: i32,
    bubbles: Vec<Mote>,
    plankton: Vec<Mote>,
}

impl Ocean {
    /// Build the scene; particle pools fill as the simulation runs.
    pub fn new(cfg: &SceneConfig) -> Self {
        Self {
            width: i32::from(cfg.width),
            height: i32::from(cfg.height),
            bubbles: Vec::with_capacity(128),
            plankton: Vec::with_capacity(128),
        }
    }

    fn draw_sky(frame: &mut FrameBuffer, tick: u64) {
        let t = tick as usize;
        let width = i32::from(frame.width());
        let height = i32::from(frame.height());
        let limit = height / 3;
        for y in 0..limit {
            let color = SKY_PALETTE.get(y as usize / 2 + t / 18);
            for x in 0..width {
                frame.set_if_empty(x, y, b' ', Some(color));
            }
        }
        Self::draw_clouds(frame, tick);
    }

    fn draw_clouds(frame: &mut FrameBuffer, tick: u64) {
        let t = tick as usize;
        let width = i32::from(frame.width());
        let height = i32::from(frame.height());
        let limit = height / 3;
        for i in 0..width / 6 {
            let x = ((i as usize * 9 + t / 2) % width as usize) as i32;
            let y = limit / 2
                + ((f64::from(x) / 10.0 + tick as f64 * 0.01).sin() * 3.0) as i32;
            if y < 1 || y >= limit {
                continue;
            }
            let color = SKY_PALETTE.get(i as usize + t / 12);
            frame.set_if_empty(x, y, b'~', Some(color));
            frame.set_if_empty((x + 1) % width, y, b'~', Some(color));
        }
    }

    fn draw_horizon_glow(frame: &mut FrameBuffer, tick: u64) {
        let t = tick as usize;
        let width = i32::from(frame.width());
        let height = i32::from(frame.height());
        let line = height / 3;
        for y in line..(line + 3).min(height) {
            let color = HORIZON_PALETTE.get(y as usize + t / 10);
            for x in 0..width {
                frame.set_if_empty(x, y, b' ', Some(color));
            }
        }
    }

    fn draw_foam(frame: &mut FrameBuffer, tick: u64) {
        let t = tick as usize;
        let width = i32::from(frame.width());
        let height = i32::from(frame.height());
        let base = height - 5;
        for x in 0..width {
            if (x as usize + t) % 7 == 0 {
                let color = FOAM_PALETTE.get(x as usize / 4 + t / 10);
                for dy in 0..2 {
                    if base - dy >= height / 3 {
                        frame.set_if_empty(x, base - dy, b'*', Some(color));
                    }
                }
            }
        }
    }

    fn draw_waves(frame: &mut FrameBuffer, tick: u64) {
        let t = tick as usize;
        let width = i32::from(frame.width());
        let height = i32::from(frame.height());
        let base = height / 3;
        for y in base..height {
            let py = f64::from(y - base) / f64::from(height - base);
            let idx = (py * WAVE_PALETTE.len() as f64) as usize + t / 15;
            let color = WAVE_PALETTE.get(idx);
            for x in 0..width {
                let fx = f64::from(x) / f64::from(width);
                let value: f64 = WAVE_LAYERS
                    .iter()
                    .map(|layer| {
                        layer.amp * wave_value(fx * layer.scale, py * layer.scale, tick, layer.speed)
                    })
                    .sum::<f64>()
                    / WAVE_LAYERS.len() as f64;
                frame.set_if_empty(x, y, wave_glyph(value), Some(color));
            }
        }
    }

    fn draw_motes(frame: &mut FrameBuffer, motes: &[Mote], glyph: u8, depth: f32) {
        for mote in motes {
            let x = mote.x.round() as i32;
            let y = mote.y.round() as i32;
            frame.set(x, y, glyph, Some(mote.color), depth);
        }
    }

    fn update_bubbles(&mut self, rng: &mut StdRng) {
        if rng.gen_range(0..3) == 0 {
            self.bubbles.push(Mote {
                x: rng.gen::<f64>() * f64::from(self.width),
                y: f64::from(self.height - 1),
                vx: rng.gen::<f64>() * 0.2 - 0.1,
                vy: -0.3 - rng.gen::<f64>() * 0.4,
                life: 40 + rng.gen_range(0..40),
                color: FOAM_PALETTE.pick(rng),
            });
        }
        let surface = f64::from(self.height / 3);
        self.bubbles.retain_mut(|m| {
            m.x += m.vx;
            m.y += m.vy;
            m.life -= 1;
            m.life > 0 && m.y >= surface
        });
    }

    fn update_plankton(&mut self, rng: &mut StdRng) {
        if rng.gen_range(0..4) == 0 {
            let half = self.height / 2;
            self.plankton.push(Mote {
                x: rng.gen::<f64>() * f64::from(self.width),
                y: f64::from(half + rng.gen_range(0..half)),
                vx: rng.gen::<f64>() * 0.3 - 0.15,
                vy: -rng.gen::<f64>() * 0.1,
                life: 80 + rng.gen_range(0..80),
                color: PLANKTON_PALETTE.pick(rng),
            });
        }
        let surface = f64::from(self.height / 3);
        self.plankton.retain_mut(|m| {
            m.x += m.vx;
            m.y += m.vy;
            m.life -= 1;
            m.life > 0 && m.y >= surface
        });
    }
}

impl Scene for Ocean {
    fn draw(&self, frame: &mut FrameBuffer, tick: u64) {
        Self::draw_sky(frame, tick);
        Self::draw_horizon_glow(frame, tick);
        Self::draw_foam(frame, tick);
        Self::draw_motes(frame, &self.plankton, b'.', PLANKTON_DEPTH);
        Self::draw_motes(frame, &self.bubbles, b'o', BUBBLE_DEPTH);
        Self::draw_waves(frame, tick);
    }

    fn advance(&mut self, rng: &mut StdRng) {
        self.update_plankton(rng);
        self.update_bubbles(rng);
    }
}

fn wave_value(fx: f64, fy: f64, tick: u64, speed: f64) -> f64 {
    let t = tick as f64 * 0.035 * speed;
    let value = ((fx * 8.0 + fy * 6.0) * PI + t).sin()
        + 0.7 * ((fx * 3.0 - fy * 5.0) * PI + t * 0.7).sin()
        + 0.5 * ((fx + fy) * 12.0 * PI + t * 1.4).sin();
    (value + 3.0) / 6.0
}

fn wave_glyph(v: f64) -> u8 {
    if v < 0.2 {
        b'`'
    } else if v < 0.4 {
        b'.'
    } else if v < 0.6 {
        b'-'
    } else if v < 0.8 {
        b'='
    } else {
        b'~'
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::time::Duration;

    fn build() -> Ocean {
        let cfg = SceneConfig::new(60, 24, Duration::from_millis(35));
        Ocean::new(&cfg)
    }

    #[test]
    fn test_wave_values_normalized() {
        for i in 0..40 {
            let v = wave_value(f64::from(i) / 40.0, 0.5, 17, 1.0);
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_wave_glyph_bands() {
        assert_eq!(wave_glyph(0.1), b'`');
        assert_eq!(wave_glyph(0.3), b'.');
        assert_eq!(wave_glyph(0.5), b'-');
        assert_eq!(wave_glyph(0.7), b'=');
        assert_eq!(wave_glyph(0.9), b'~');
    }

    #[test]
    fn test_water_fills_below_horizon() {
        let scene = build();
        let mut frame = FrameBuffer::new(60, 24);
        scene.draw(&mut frame, 5);
        let base = 24 / 3;
        for y in base..24 {
            for x in 0..60usize {
                let cell = frame.cells()[y * 60 + x];
                assert!(cell.is_painted() || cell.color().is_some());
            }
        }
    }

    #[test]
    fn test_motes_die_at_surface() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut scene = build();
        scene.bubbles.push(Mote {
            x: 10.0,
            y: f64::from(scene.height / 3),
            vx: 0.0,
            vy: -1.0,
            life: 100,
            color: Color(195),
        });
        scene.advance(&mut rng);
        assert!(scene
            .bubbles
            .iter()
            .all(|m| m.y >= f64::from(scene.height / 3)));
    }

    #[test]
    fn test_pools_grow_then_stabilize() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut scene = build();
        for _ in 0..400 {
            scene.advance(&mut rng);
        }
        // Lifetimes bound the pools: life <= 120 at one spawn per tick.
        assert!(scene.bubbles.len() < 200);
        assert!(scene.plankton.len() < 200);
    }
}
