//! Rain scene: Digital rain streams with splashes and drifting mist.
//!
//! Streams fall in three parallax layers. Layer index doubles as depth, so
//! a fast near stream passes in front of a slow far one; splashes sit on
//! top and mist dots claim whatever stays empty.

use super::palette::{GlyphRamp, Palette};
use super::{Scene, SceneConfig};
use crate::buffer::{Color, FrameBuffer};
use rand::rngs::StdRng;
use rand::Rng;
use std::f64::consts::TAU;

static STREAM_PALETTES: [Palette; 3] = [
    Palette::new(&[Color(159), Color(81), Color(42), Color(35)]),
    Palette::new(&[Color(120), Color(47), Color(40), Color(34)]),
    Palette::new(&[Color(123), Color(75), Color(43), Color(29)]),
];
static GLOW_PALETTE: Palette = Palette::new(&[Color(195), Color(229)]);
static MIST_PALETTE: Palette = Palette::new(&[Color(236), Color(237)]);
static GLYPH_POOL: GlyphRamp = GlyphRamp::new(&[b'0', b'1', b'|', b'/', b'\\', b'[', b']']);

/// Splash depth; splashes render above every stream layer.
const SPLASH_DEPTH: f32 = 0.5;

/// Tuning knobs beyond the shared dimensions.
#[derive(Debug, Clone, Copy)]
pub struct RainParams {
    /// Streams per column of width; non-positive falls back to 0.15.
    pub density: f64,
}

impl Default for RainParams {
    fn default() -> Self {
        Self { density: 0.18 }
    }
}

struct Stream {
    base_x: i32,
    head: f64,
    speed: f64,
    length: i32,
    palette_idx: usize,
    layer: i32,
    sway_phase: f64,
}

struct Splash {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    life: i32,
    color: Color,
}

/// The digital rain scene.
pub struct Rain {
    width: i32,
    height: i32,
    streams: Vec<Stream>,
    splashes: Vec<Splash>,
}

impl Rain {
    /// Build the scene with a constant stream population.
    pub fn new(cfg: &SceneConfig, params: RainParams, rng: &mut StdRng) -> Self {
        let density = if params.density <= 0.0 {
            0.15
        } else {
            params.density
        };
        let width = i32::from(cfg.width);
        let height = i32::from(cfg.height);
        let count = ((f64::from(cfg.width) * density) as usize).max(4);

        let mut streams = Vec::with_capacity(count);
        for _ in 0..count {
            let mut stream = Stream {
                base_x: 0,
                head: 0.0,
                speed: 0.0,
                length: 0,
                palette_idx: 0,
                layer: 0,
                sway_phase: 0.0,
            };
            reset_stream(&mut stream, width, height, true, rng);
            streams.push(stream);
        }

        Self {
            width,
            height,
            streams,
            splashes: Vec::with_capacity(128),
        }
    }

    fn draw_mist(frame: &mut FrameBuffer, tick: u64) {
        let t = tick as usize;
        let width = i32::from(frame.width());
        let height = i32::from(frame.height());
        for y in 0..height {
            if (y as usize + t / 3) % 3 != 0 {
                continue;
            }
            let color = MIST_PALETTE.get(y as usize / 2 + t / 10);
            let mut x = ((y as usize + t) % 6) as i32;
            while x < width {
                frame.set_if_empty(x, y, b'.', Some(color));
                x += 6;
            }
        }
    }

    fn draw_streams(&self, frame: &mut FrameBuffer, tick: u64) {
        let t = tick as usize;
        let height = i32::from(frame.height());
        for stream in &self.streams {
            let palette = STREAM_PALETTES[stream.palette_idx % STREAM_PALETTES.len()];
            let head = stream.head as i32;
            let column = stream_column(stream, tick, self.width);
            // Nearer layers carry smaller depth.
            let depth = (3 - stream.layer) as f32;
            for i in 0..stream.length {
                let y = head - i;
                if y < 0 || y >= height {
                    continue;
                }
                let color = if i == 0 {
                    GLOW_PALETTE.get(t + y as usize)
                } else {
                    let idx = (i / 2 + stream.layer) as usize;
                    palette.get(idx.min(palette.len().saturating_sub(1)))
                };
                let glyph = GLYPH_POOL.get(t + y as usize + i as usize);
                frame.set(column, y, glyph, Some(color), depth);
            }
        }
    }

    fn draw_splashes(&self, frame: &mut FrameBuffer) {
        for splash in &self.splashes {
            let x = splash.x.round() as i32;
            let y = splash.y.round() as i32;
            frame.set(x, y, b'\'', Some(splash.color), SPLASH_DEPTH);
        }
    }

    fn update_splashes(&mut self) {
        let width = f64::from(self.width);
        let floor = f64::from(self.height - 1);
        self.splashes.retain_mut(|s| {
            s.x += s.vx;
            s.y += s.vy;
            s.vy += 0.08;
            s.life -= 1;
            s.life > 0 && s.x >= 0.0 && s.x < width && s.y < floor
        });
    }

    fn update_streams(&mut self, rng: &mut StdRng) {
        for stream in &mut self.streams {
            stream.head += stream.speed;

            // A head resting in the bottom rows kicks up spray.
            let head_y = stream.head as i32;
            if head_y >= self.height - 2 && head_y < self.height {
                emit_splash(&mut self.splashes, f64::from(stream.base_x), self.height, rng);
            }

            if stream.head as i32 - stream.length > self.height {
                reset_stream(stream, self.width, self.height, false, rng);
            }
        }
    }
}

impl Scene for Rain {
    fn draw(&self, frame: &mut FrameBuffer, tick: u64) {
        Self::draw_mist(frame, tick);
        self.draw_streams(frame, tick);
        self.draw_splashes(frame);
    }

    fn advance(&mut self, rng: &mut StdRng) {
        self.update_splashes();
        self.update_streams(rng);
    }
}

fn stream_column(stream: &Stream, tick: u64, width: i32) -> i32 {
    let sway = (stream.sway_phase + tick as f64 * 0.02 * f64::from(stream.layer + 1)).sin();
    let offset = (sway * f64::from(stream.layer + 1)).round() as i32;
    (stream.base_x + offset).clamp(0, width - 1)
}

fn emit_splash(splashes: &mut Vec<Splash>, x: f64, height: i32, rng: &mut StdRng) {
    let count = 2 + rng.gen_range(0..3);
    let base_y = f64::from(height - 2);
    for _ in 0..count {
        splashes.push(Splash {
            x: x + rng.gen::<f64>() * 0.6 - 0.3,
            y: base_y,
            vx: rng.gen::<f64>() * 0.8 - 0.4,
            vy: -0.6 - rng.gen::<f64>() * 0.7,
            life: 10 + rng.gen_range(0..10),
            color: GLOW_PALETTE.pick(rng),
        });
    }
}

fn reset_stream(stream: &mut Stream, width: i32, height: i32, visible: bool, rng: &mut StdRng) {
    stream.base_x = rng.gen_range(0..width);
    stream.length = (6 + rng.gen_range(0..height / 2)).clamp(6, height);
    stream.layer = rng.gen_range(0..3);
    let base_speed = 0.35 + f64::from(stream.layer) * 0.25;
    stream.speed = base_speed + rng.gen::<f64>() * 0.6;
    stream.palette_idx = rng.gen_range(0..STREAM_PALETTES.len());
    stream.sway_phase = rng.gen::<f64>() * TAU;
    stream.head = if visible {
        rng.gen::<f64>() * f64::from(height)
    } else {
        -f64::from(rng.gen_range(0..height))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::time::Duration;

    fn build(rng: &mut StdRng) -> Rain {
        let cfg = SceneConfig::new(64, 24, Duration::from_millis(55));
        Rain::new(&cfg, RainParams::default(), rng)
    }

    #[test]
    fn test_stream_population_is_constant() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut scene = build(&mut rng);
        let count = scene.streams.len();
        assert!(count >= 4);
        for _ in 0..200 {
            scene.advance(&mut rng);
        }
        assert_eq!(scene.streams.len(), count);
    }

    #[test]
    fn test_nonpositive_density_falls_back() {
        let mut rng = StdRng::seed_from_u64(3);
        let cfg = SceneConfig::new(64, 24, Duration::from_millis(55));
        let scene = Rain::new(&cfg, RainParams { density: -1.0 }, &mut rng);
        assert!(!scene.streams.is_empty());
        let scene = Rain::new(&cfg, RainParams { density: 0.0 }, &mut rng);
        assert!(!scene.streams.is_empty());
    }

    #[test]
    fn test_stream_column_stays_in_bounds() {
        let stream = Stream {
            base_x: 0,
            head: 0.0,
            speed: 1.0,
            length: 8,
            palette_idx: 0,
            layer: 2,
            sway_phase: 4.0,
        };
        for tick in 0..100 {
            let col = stream_column(&stream, tick, 64);
            assert!((0..64).contains(&col));
        }
    }

    #[test]
    fn test_draw_paints_streams() {
        let mut rng = StdRng::seed_from_u64(9);
        let scene = build(&mut rng);
        let mut frame = FrameBuffer::new(64, 24);
        scene.draw(&mut frame, 0);
        let painted = frame.cells().iter().filter(|c| c.is_painted()).count();
        assert!(painted > 0);
    }

    #[test]
    fn test_splashes_expire() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut scene = build(&mut rng);
        scene.splashes.push(Splash {
            x: 10.0,
            y: 20.0,
            vx: 0.0,
            vy: -0.5,
            life: 1,
            color: Color(195),
        });
        scene.update_splashes();
        assert!(scene.splashes.is_empty());
    }
}
