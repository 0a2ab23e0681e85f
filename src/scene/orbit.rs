//! Orbit scene: Particle HUD with rings, core, sensor sweeps and telemetry.
//!
//! Particles circle an elliptical track in three layers, each dragging a
//! short trail. The pulsing core and the HUD chrome write with finite
//! depth so they stay legible over the claimed ring and backdrop dots.

use super::geom::line_points;
use super::palette::Palette;
use super::{Scene, SceneConfig};
use crate::buffer::{Color, FrameBuffer};
use rand::rngs::StdRng;
use rand::Rng;
use std::f64::consts::{PI, TAU};

const MIN_PARTICLES: usize = 48;
const CORE_RADIUS_FACTOR: f64 = 0.12;
const TRAIL_LEN: usize = 5;

const CORE_DEPTH: f32 = 1.0;
const CORE_CENTER_DEPTH: f32 = 0.9;
const PARTICLE_DEPTH: f32 = 0.8;
const HUD_DEPTH: f32 = 0.5;

static BACKGROUND_PALETTE: Palette = Palette::new(&[Color(236), Color(237), Color(238)]);
static RING_PALETTE: Palette = Palette::new(&[Color(31), Color(33), Color(39), Color(45)]);
static PARTICLE_PALETTE: Palette = Palette::new(&[Color(195), Color(159), Color(123)]);
static CORE_PALETTE: Palette = Palette::new(&[Color(200), Color(207), Color(213), Color(219)]);
static TRAIL_PALETTE: Palette = Palette::new(&[Color(111), Color(81), Color(51)]);
static UI_PALETTE: Palette = Palette::new(&[Color(244), Color(246)]);
static HALO_PALETTE: Palette = Palette::new(&[Color(25), Color(27), Color(33), Color(39)]);
static BEAM_PALETTE: Palette = Palette::new(&[Color(45), Color(51)]);

/// Tuning knobs beyond the shared dimensions.
#[derive(Debug, Clone, Copy)]
pub struct OrbitParams {
    /// Orbiting particle population; raised to at least 48.
    pub particle_count: usize,
}

impl Default for OrbitParams {
    fn default() -> Self {
        Self {
            particle_count: 120,
        }
    }
}

struct Particle {
    radius: f64,
    angle: f64,
    angular_vel: f64,
    layer: usize,
    trail: Vec<(i32, i32)>,
}

struct Ring {
    radius: f64,
    speed: f64,
    phase: f64,
    thickness: f64,
}

/// The orbiting particle HUD scene.
pub struct Orbit {
    width: i32,
    height: i32,
    particles: Vec<Particle>,
    rings: Vec<Ring>,
}

impl Orbit {
    /// Build the scene with a constant particle population.
    pub fn new(cfg: &SceneConfig, params: OrbitParams, rng: &mut StdRng) -> Self {
        let count = params.particle_count.max(MIN_PARTICLES);
        let particles = (0..count)
            .map(|_| {
                let layer = rng.gen_range(0..3usize);
                let mut angular_vel =
                    0.006 + rng.gen::<f64>() * 0.018 + layer as f64 * 0.004;
                if rng.gen_range(0..2) == 0 {
                    angular_vel = -angular_vel;
                }
                Particle {
                    radius: 0.35 + rng.gen::<f64>() * 0.45 + layer as f64 * 0.18,
                    angle: rng.gen::<f64>() * TAU,
                    angular_vel,
                    layer,
                    trail: Vec::with_capacity(TRAIL_LEN + 1),
                }
            })
            .collect();

        let rings = vec![
            Ring {
                radius: 0.3,
                speed: 0.004,
                phase: 0.0,
                thickness: 0.018,
            },
            Ring {
                radius: 0.55,
                speed: -0.006,
                phase: 0.0,
                thickness: 0.022,
            },
            Ring {
                radius: 0.75,
                speed: 0.003,
                phase: 0.0,
                thickness: 0.026,
            },
        ];

        Self {
            width: i32::from(cfg.width),
            height: i32::from(cfg.height),
            particles,
            rings,
        }
    }

    fn particle_position(&self, particle: &Particle) -> (i32, i32) {
        let cx = self.width / 2;
        let cy = self.height / 2;
        let scale = f64::from(self.width.min(self.height)) * 0.45;
        let x = cx + (particle.angle.cos() * particle.radius * scale) as i32;
        let y = cy + (particle.angle.sin() * particle.radius * scale * 0.6) as i32;
        (x, y)
    }

    fn draw_background(frame: &mut FrameBuffer, tick: u64) {
        let t = tick as usize;
        let width = i32::from(frame.width());
        let height = i32::from(frame.height());
        for y in (0..height).step_by(2) {
            let color = BACKGROUND_PALETTE.get(y as usize / 2 + t / 16);
            let mut x = ((y as usize + t) % 6) as i32;
            while x < width {
                frame.set_if_empty(x, y, b'.', Some(color));
                x += 6;
            }
        }
    }

    fn draw_rings(&self, frame: &mut FrameBuffer, tick: u64) {
        let cx = self.width / 2;
        let cy = self.height / 2;
        let scale = f64::from(self.width.min(self.height)) * 0.9;

        for (idx, ring) in self.rings.iter().enumerate() {
            let color = RING_PALETTE.get(idx + tick as usize / 12);
            draw_ring(
                frame,
                cx,
                cy,
                ring.radius * scale,
                ring.thickness * scale,
                ring.phase,
                color,
            );
        }
    }

    fn draw_core(frame: &mut FrameBuffer, tick: u64) {
        let width = i32::from(frame.width());
        let height = i32::from(frame.height());
        let cx = width / 2;
        let cy = height / 2;
        let pulse = 1.0 + 0.08 * (tick as f64 * 0.1).sin();
        let radius = f64::from(width.min(height)) * CORE_RADIUS_FACTOR * pulse;

        let ry = radius as i32;
        let rx = (radius * 1.4) as i32;
        for y in -ry..=ry {
            for x in -rx..=rx {
                let dist = (f64::from(x * x) + f64::from(y * y) * 1.5).sqrt();
                if dist > radius {
                    continue;
                }
                let intensity = 1.0 - dist / radius;
                let color = CORE_PALETTE.ratio(intensity);
                frame.set(cx + x, cy + y, b'*', Some(color), CORE_DEPTH);
            }
        }
        frame.set(cx, cy, b'#', Some(Color(231)), CORE_CENTER_DEPTH);

        for i in 0..HALO_PALETTE.len() {
            let r = radius * 1.1 + i as f64 * 1.6;
            let color = HALO_PALETTE.get(i + tick as usize / 14);
            draw_ellipse(frame, cx, cy, r, r * 0.62, color);
        }
    }

    fn draw_sensors(&self, frame: &mut FrameBuffer, tick: u64) {
        let cx = self.width / 2;
        let cy = self.height / 2;
        let max_radius = f64::from(self.width.min(self.height)) * 0.8;

        for i in 0..2 {
            let angle = tick as f64 * 0.01 + f64::from(i) * PI;
            let color = BEAM_PALETTE.get(i as usize);
            draw_sensor_sweep(frame, cx, cy, angle, max_radius, color);
        }
    }

    fn draw_particles(&self, frame: &mut FrameBuffer, tick: u64) {
        for (i, particle) in self.particles.iter().enumerate() {
            draw_particle_trail(frame, particle);

            let (x, y) = self.particle_position(particle);
            let color = PARTICLE_PALETTE.get(particle.layer);
            let glyph = particle_glyph(tick, i);
            frame.set(x, y, glyph, Some(color), PARTICLE_DEPTH);
        }
    }

    fn draw_hud(&self, frame: &mut FrameBuffer, tick: u64) {
        let bar_y = self.height - 3;
        let color = UI_PALETTE.get(tick as usize / 20);

        let bar_width = self.width / 3;
        let fill = (f64::from(bar_width) * (0.5 + 0.5 * (tick as f64 * 0.03).sin())) as i32;
        let x0 = (self.width - bar_width) / 2;
        for x in 0..bar_width {
            let glyph = if x < fill { b'=' } else { b'-' };
            frame.set(x0 + x, bar_y, glyph, Some(color), HUD_DEPTH);
        }

        let text = format!(
            "particles:{:03}  rings:{}  frame:{:06}",
            self.particles.len(),
            self.rings.len(),
            tick
        );
        print_text(
            frame,
            2,
            1,
            &text,
            UI_PALETTE.get(tick as usize / 12 + 1),
        );
    }
}

impl Scene for Orbit {
    fn draw(&self, frame: &mut FrameBuffer, tick: u64) {
        Self::draw_background(frame, tick);
        self.draw_rings(frame, tick);
        Self::draw_core(frame, tick);
        self.draw_sensors(frame, tick);
        self.draw_particles(frame, tick);
        self.draw_hud(frame, tick);
    }

    fn advance(&mut self, rng: &mut StdRng) {
        for i in 0..self.particles.len() {
            let particle = &mut self.particles[i];
            particle.angle += particle.angular_vel;
            if particle.angle > TAU {
                particle.angle -= TAU;
            } else if particle.angle < 0.0 {
                particle.angle += TAU;
            }
            let noise = (rng.gen::<f64>() - 0.5) * 0.002;
            particle.radius = (particle.radius + noise).clamp(0.25, 0.95);

            let pos = self.particle_position(&self.particles[i]);
            let trail = &mut self.particles[i].trail;
            trail.push(pos);
            if trail.len() > TRAIL_LEN {
                trail.remove(0);
            }
        }

        for ring in &mut self.rings {
            ring.phase += ring.speed;
        }
    }
}

fn draw_ring(
    frame: &mut FrameBuffer,
    cx: i32,
    cy: i32,
    radius: f64,
    thickness: f64,
    phase: f64,
    color: Color,
) {
    let steps = ((radius * 8.0) as usize).max(32);
    for i in 0..steps {
        let angle = i as f64 / steps as f64 * TAU + phase;
        let x = cx + (angle.cos() * radius) as i32;
        let y = cy + (angle.sin() * radius * 0.6) as i32;
        frame.set_if_empty(x, y, b'-', Some(color));
        if thickness > 1.0 {
            frame.set_if_empty(x, y + 1, b'-', Some(color));
        }
    }
}

fn draw_ellipse(frame: &mut FrameBuffer, cx: i32, cy: i32, rx: f64, ry: f64, color: Color) {
    let steps = ((rx * 6.0) as usize).max(24);
    for i in 0..steps {
        let angle = i as f64 / steps as f64 * TAU;
        let x = cx + (angle.cos() * rx) as i32;
        let y = cy + (angle.sin() * ry) as i32;
        frame.set_if_empty(x, y, b'.', Some(color));
    }
}

fn draw_sensor_sweep(
    frame: &mut FrameBuffer,
    cx: i32,
    cy: i32,
    angle: f64,
    radius: f64,
    color: Color,
) {
    let mut r = radius * 0.6;
    while r < radius {
        let x = cx + (angle.cos() * r) as i32;
        let y = cy + (angle.sin() * r * 0.6) as i32;
        frame.set_if_empty(x, y, b'/', Some(color));
        r += 3.0;
    }
    let end_x = cx + (angle.cos() * radius) as i32;
    let end_y = cy + (angle.sin() * radius * 0.6) as i32;
    for (idx, &(x, y)) in line_points(cx, cy, end_x, end_y).iter().enumerate() {
        if idx % 3 != 0 {
            continue;
        }
        frame.set_if_empty(x, y, b'.', Some(color));
    }
}

fn draw_particle_trail(frame: &mut FrameBuffer, particle: &Particle) {
    if particle.trail.len() < 2 {
        return;
    }
    for i in 0..particle.trail.len() - 1 {
        let (x0, y0) = particle.trail[i];
        let (x1, y1) = particle.trail[i + 1];
        let color = TRAIL_PALETTE.get(i.min(TRAIL_PALETTE.len().saturating_sub(1)));
        for (x, y) in line_points(x0, y0, x1, y1) {
            frame.set_if_empty(x, y, b'.', Some(color));
        }
    }
}

fn particle_glyph(tick: u64, index: usize) -> u8 {
    match (tick as usize + index) % 3 {
        0 => b'o',
        1 => b'*',
        _ => b'+',
    }
}

fn print_text(frame: &mut FrameBuffer, x: i32, y: i32, text: &str, color: Color) {
    for (i, byte) in text.bytes().enumerate() {
        frame.set(x + i as i32, y, byte, Some(color), HUD_DEPTH);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::time::Duration;

    fn build(rng: &mut StdRng) -> Orbit {
        let cfg = SceneConfig::new(64, 24, Duration::from_millis(40));
        Orbit::new(&cfg, OrbitParams::default(), rng)
    }

    #[test]
    fn test_particle_floor() {
        let mut rng = StdRng::seed_from_u64(4);
        let cfg = SceneConfig::new(64, 24, Duration::from_millis(40));
        let scene = Orbit::new(&cfg, OrbitParams { particle_count: 3 }, &mut rng);
        assert_eq!(scene.particles.len(), MIN_PARTICLES);
    }

    #[test]
    fn test_trails_stay_bounded() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut scene = build(&mut rng);
        for _ in 0..50 {
            scene.advance(&mut rng);
        }
        for particle in &scene.particles {
            assert!(particle.trail.len() <= TRAIL_LEN);
        }
    }

    #[test]
    fn test_radius_stays_clamped() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut scene = build(&mut rng);
        for _ in 0..500 {
            scene.advance(&mut rng);
        }
        for particle in &scene.particles {
            assert!((0.25..=0.95).contains(&particle.radius));
        }
    }

    #[test]
    fn test_angles_stay_wrapped() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut scene = build(&mut rng);
        for _ in 0..1000 {
            scene.advance(&mut rng);
        }
        for particle in &scene.particles {
            assert!((-0.1..=TAU + 0.1).contains(&particle.angle));
        }
    }

    #[test]
    fn test_draw_includes_telemetry() {
        let mut rng = StdRng::seed_from_u64(4);
        let scene = build(&mut rng);
        let mut frame = FrameBuffer::new(64, 24);
        scene.draw(&mut frame, 7);
        // The HUD text row contains "particles:" starting at x=2, y=1.
        let row: Vec<u8> = frame.cells()[64..128].iter().map(|c| c.glyph()).collect();
        let text = String::from_utf8_lossy(&row);
        assert!(text.contains("particles:120"));
    }
}
