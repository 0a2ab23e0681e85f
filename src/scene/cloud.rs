//! Cloud scene: Parametric cloud decks with occasional lightning.
//!
//! Each deck is a gaussian band around its altitude modulated by layered
//! sine noise. Lower decks draw first so they win the overlap claims, a
//! live bolt cuts through at finite depth, and the dotted sky gradient
//! claims whatever remains.

use super::palette::Palette;
use super::{Scene, SceneConfig};
use crate::buffer::{Color, FrameBuffer};
use rand::rngs::StdRng;
use rand::Rng;

const BOLT_DEPTH: f32 = 0.5;

static SKY_PALETTE: Palette = Palette::new(&[Color(111), Color(75), Color(45), Color(39)]);
static LIGHTNING_PALETTE: Palette = Palette::new(&[Color(231), Color(229), Color(227)]);

struct CloudLayer {
    altitude: f64,
    thickness: f64,
    density: f64,
    scale: f64,
    speed: f64,
    colors: Palette,
    glyphs: [u8; 2],
    parallax: f64,
}

static LAYERS: [CloudLayer; 3] = [
    CloudLayer {
        altitude: 0.22,
        thickness: 0.18,
        density: 0.75,
        scale: 0.11,
        speed: 0.022,
        colors: Palette::new(&[Color(255), Color(252)]),
        glyphs: [b'@', b'%'],
        parallax: 0.7,
    },
    CloudLayer {
        altitude: 0.38,
        thickness: 0.22,
        density: 0.62,
        scale: 0.07,
        speed: 0.015,
        colors: Palette::new(&[Color(250), Color(248), Color(246)]),
        glyphs: [b'#', b'*'],
        parallax: 0.9,
    },
    CloudLayer {
        altitude: 0.55,
        thickness: 0.28,
        density: 0.48,
        scale: 0.05,
        speed: 0.01,
        colors: Palette::new(&[Color(245), Color(243), Color(239)]),
        glyphs: [b'=', b'-'],
        parallax: 1.2,
    },
];

struct Bolt {
    points: Vec<(i32, i32)>,
    life: i32,
}

/// The drifting cloud scene.
pub struct Cloud {
    width: i32,
    height: i32,
    bolt: Option<Bolt>,
}

impl Cloud {
    /// Build the scene; bolts strike as the simulation runs.
    pub fn new(cfg: &SceneConfig) -> Self {
        Self {
            width: i32::from(cfg.width),
            height: i32::from(cfg.height),
            bolt: None,
        }
    }

    fn draw_layer(frame: &mut FrameBuffer, layer: &CloudLayer, tick: u64) {
        let width = i32::from(frame.width());
        let height = i32::from(frame.height());
        let base_phase = tick as f64 * layer.speed;

        for y in 0..height {
            let y_norm = f64::from(y) / f64::from(height - 1);
            let distance = (y_norm - layer.altitude).abs();
            let falloff = (-(distance / layer.thickness).powi(2) * 2.5).exp();
            if falloff < 0.05 {
                continue;
            }
            for x in 0..width {
                let noise = cloud_noise(f64::from(x), f64::from(y), base_phase, layer);
                let coverage = falloff * (0.55 + 0.45 * noise) - (1.0 - layer.density) * 0.4;
                if coverage < 0.35 {
                    continue;
                }
                let glyph = if coverage < 0.55 {
                    layer.glyphs[1]
                } else {
                    layer.glyphs[0]
                };
                let color = layer.colors.get((x + y) as usize);
                frame.set_if_empty(x, y, glyph, Some(color));
            }
        }
    }

    fn draw_bolt(frame: &mut FrameBuffer, bolt: &Bolt) {
        for (i, &(x, y)) in bolt.points.iter().enumerate() {
            let color = LIGHTNING_PALETTE.get(i);
            frame.set(x, y, bolt_glyph(i), Some(color), BOLT_DEPTH);
        }
    }

    fn draw_sky(frame: &mut FrameBuffer) {
        let width = i32::from(frame.width());
        let height = i32::from(frame.height());
        for y in 0..height {
            let idx = (y as usize * SKY_PALETTE.len() / height.max(1) as usize)
                .min(SKY_PALETTE.len().saturating_sub(1));
            let color = SKY_PALETTE.get(idx);
            for x in 0..width {
                frame.set_if_empty(x, y, b'.', Some(color));
            }
        }
    }
}

impl Scene for Cloud {
    fn draw(&self, frame: &mut FrameBuffer, tick: u64) {
        if let Some(bolt) = &self.bolt {
            Self::draw_bolt(frame, bolt);
        }
        // Low deck first: overlap claims resolve towards the viewer.
        for layer in LAYERS.iter().rev() {
            Self::draw_layer(frame, layer, tick);
        }
        Self::draw_sky(frame);
    }

    fn advance(&mut self, rng: &mut StdRng) {
        match &mut self.bolt {
            Some(bolt) => {
                bolt.life -= 1;
                if bolt.life <= 0 {
                    self.bolt = None;
                }
            }
            None => {
                if rng.gen::<f64>() < 0.02 {
                    self.bolt = Some(new_bolt(self.width, self.height, rng));
                }
            }
        }
    }
}

fn cloud_noise(x: f64, y: f64, phase: f64, layer: &CloudLayer) -> f64 {
    let s = layer.scale;
    let p = layer.parallax;
    let v = ((x * s + p * phase) * 0.9 + phase * 2.0).sin()
        + 0.6 * ((x * 0.35 + y * 0.25) * s * 1.4 - phase * 1.2).sin()
        + 0.4 * ((y * s * 0.6 - x * 0.22) * 0.8 + phase * 0.7).sin();
    v.tanh()
}

fn bolt_glyph(i: usize) -> u8 {
    match i % 3 {
        0 => b'|',
        1 => b'/',
        _ => b'\\',
    }
}

fn new_bolt(width: i32, height: i32, rng: &mut StdRng) -> Bolt {
    let mut points = Vec::with_capacity(height as usize);
    let mut x = rng.gen_range(0..width / 2) + width / 4;
    let mut y = rng.gen_range(0..height / 6) + 1;
    let length = height / 2 + rng.gen_range(0..height / 3);
    let mut i = 0;
    while i < length && y < height - 2 {
        points.push((x, y));
        x = (x + rng.gen_range(0..3) - 1).clamp(1, width - 2);
        y += 1 + rng.gen_range(0..2);
        i += 1;
    }
    Bolt {
        points,
        life: 4 + rng.gen_range(0..4),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::time::Duration;

    fn build() -> Cloud {
        let cfg = SceneConfig::new(60, 24, Duration::from_millis(70))
            .normalized(60, 24, Duration::from_millis(70));
        Cloud::new(&cfg)
    }

    #[test]
    fn test_noise_stays_in_tanh_band() {
        for i in 0..60 {
            let n = cloud_noise(f64::from(i), 10.0, 2.0, &LAYERS[0]);
            assert!((-1.0..=1.0).contains(&n));
        }
    }

    #[test]
    fn test_sky_fills_every_cell() {
        let scene = build();
        let mut frame = FrameBuffer::new(60, 24);
        scene.draw(&mut frame, 0);
        assert!(frame.cells().iter().all(|c| c.is_painted()));
    }

    #[test]
    fn test_bolt_points_descend_within_bounds() {
        let mut rng = StdRng::seed_from_u64(13);
        let bolt = new_bolt(60, 24, &mut rng);
        assert!(!bolt.points.is_empty());
        let mut last_y = -1;
        for &(x, y) in &bolt.points {
            assert!((1..59).contains(&x));
            assert!(y > last_y);
            last_y = y;
        }
    }

    #[test]
    fn test_bolt_expires() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut scene = build();
        scene.bolt = Some(Bolt {
            points: vec![(5, 5)],
            life: 2,
        });
        scene.advance(&mut rng);
        assert!(scene.bolt.is_some());
        scene.advance(&mut rng);
        assert!(scene.bolt.is_none());
    }

    #[test]
    fn test_clouds_present_at_deck_altitudes() {
        let scene = build();
        let mut frame = FrameBuffer::new(60, 24);
        scene.draw(&mut frame, 3);
        let cloud_cells = frame
            .cells()
            .iter()
            .filter(|c| matches!(c.glyph(), b'@' | b'%' | b'#' | b'*' | b'=' | b'-'))
            .count();
        assert!(cloud_cells > 40);
    }
}
