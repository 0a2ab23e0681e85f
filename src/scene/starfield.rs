//! Starfield scene: Perspective warp with trails, flares and a ring tunnel.
//!
//! Stars live in normalized space and rush toward the camera; their depth
//! value doubles as the compositing depth, so near stars pass over far
//! ones. A star leaving the screen or the depth floor respawns in place,
//! keeping the population constant.

use super::geom::{line_points, slope_glyph};
use super::palette::{GlyphRamp, Palette};
use super::{Scene, SceneConfig};
use crate::buffer::{Color, FrameBuffer};
use rand::rngs::StdRng;
use rand::Rng;
use std::f64::consts::TAU;

const MIN_DEPTH: f64 = 0.12;
const BACKDROP_STRIDE: usize = 4;
const RING_COUNT: i32 = 4;
const SPOKE_COUNT: usize = 12;

static STAR_PALETTE: Palette = Palette::new(&[Color(250), Color(252), Color(255)]);
static TRAIL_PALETTE: Palette = Palette::new(&[Color(240), Color(245)]);
static BACKDROP_PALETTE: Palette = Palette::new(&[Color(236), Color(235)]);
static WARP_RING_PALETTE: Palette = Palette::new(&[Color(24), Color(25), Color(31)]);
static SPOKE_PALETTE: Palette = Palette::new(&[Color(238), Color(244)]);
static FLARE_PALETTE: Palette = Palette::new(&[Color(45), Color(117), Color(195)]);
static GLYPH_PALETTE: GlyphRamp = GlyphRamp::new(&[b'.', b'+', b'*']);

/// Tuning knobs beyond the shared dimensions.
#[derive(Debug, Clone, Copy)]
pub struct StarfieldParams {
    /// Stars per cell of grid area; non-positive falls back to 0.02.
    pub density: f64,
    /// Base approach speed; non-positive falls back to 0.01.
    pub warp_speed: f64,
}

impl Default for StarfieldParams {
    fn default() -> Self {
        Self {
            density: 0.03,
            warp_speed: 0.012,
        }
    }
}

struct Star {
    x: f64,
    y: f64,
    z: f64,
    velocity: f64,
    prev: Option<(i32, i32)>,
    twinkle: f64,
    layer: i32,
}

/// The starfield warp scene.
pub struct Starfield {
    width: i32,
    height: i32,
    warp_speed: f64,
    stars: Vec<Star>,
}

impl Starfield {
    /// Build the scene with a constant star population.
    pub fn new(cfg: &SceneConfig, params: StarfieldParams, rng: &mut StdRng) -> Self {
        let density = if params.density <= 0.0 {
            0.02
        } else {
            params.density
        };
        let warp_speed = if params.warp_speed <= 0.0 {
            0.01
        } else {
            params.warp_speed
        };

        let area = f64::from(cfg.width) * f64::from(cfg.height);
        let count = ((area * density) as usize).max(32);

        let mut stars = Vec::with_capacity(count);
        for _ in 0..count {
            let mut star = Star {
                x: 0.0,
                y: 0.0,
                z: 1.0,
                velocity: warp_speed,
                prev: None,
                twinkle: 0.0,
                layer: 0,
            };
            reset_star(&mut star, warp_speed, rng);
            stars.push(star);
        }

        Self {
            width: i32::from(cfg.width),
            height: i32::from(cfg.height),
            warp_speed,
            stars,
        }
    }

    fn draw_backdrop(frame: &mut FrameBuffer, tick: u64) {
        let t = tick as usize;
        let width = i32::from(frame.width());
        let height = i32::from(frame.height());
        for y in (0..height).step_by(BACKDROP_STRIDE) {
            let color = BACKDROP_PALETTE.get(y as usize / BACKDROP_STRIDE + t / 20);
            let mut x = ((y as usize / 2 + t) % 6) as i32;
            while x < width {
                frame.set_if_empty(x, y, b'.', Some(color));
                x += 6;
            }
        }
        frame.set_if_empty(width / 2, height / 2, b'+', Some(Color(238)));
    }

    fn draw_warp_tunnel(frame: &mut FrameBuffer, tick: u64) {
        let t = tick as usize;
        let width = i32::from(frame.width());
        let height = i32::from(frame.height());
        let cx = width / 2;
        let cy = height / 2;
        let min_dim = f64::from(width.min(height));
        let base_radius = min_dim * 0.12;
        if base_radius < 2.0 {
            return;
        }
        let pulse = 1.0 + 0.05 * (tick as f64 * 0.07).sin();

        for ring in 1..=RING_COUNT {
            let radius = f64::from(ring) * base_radius * pulse;
            let color = WARP_RING_PALETTE.get(ring as usize + t / 8);
            draw_ellipse(frame, cx, cy, radius, radius * 0.55, color);
        }

        for spoke in 0..SPOKE_COUNT {
            let angle = spoke as f64 / SPOKE_COUNT as f64 * TAU + tick as f64 * 0.012;
            let color = SPOKE_PALETTE.get(spoke + t / 10);
            draw_spoke(frame, cx, cy, angle, min_dim * 0.52, color);
        }
    }

    fn draw_stars(&self, frame: &mut FrameBuffer, tick: u64) {
        for star in &self.stars {
            let Some((px, py)) = project_star(star, self.width, self.height) else {
                continue;
            };

            if let Some((prev_x, prev_y)) = star.prev {
                draw_trail(frame, prev_x, prev_y, px, py, star.z);
            }

            let color = star_color(star.z, star.twinkle, tick);
            let glyph = star_glyph(star.z, star.twinkle);
            frame.set(px, py, glyph, Some(color), star.z as f32);
            if star.z < 0.4 {
                draw_flare(frame, px, py, star.z);
            }
        }
    }
}

impl Scene for Starfield {
    fn draw(&self, frame: &mut FrameBuffer, tick: u64) {
        Self::draw_backdrop(frame, tick);
        Self::draw_warp_tunnel(frame, tick);
        self.draw_stars(frame, tick);
    }

    fn advance(&mut self, rng: &mut StdRng) {
        for star in &mut self.stars {
            match project_star(star, self.width, self.height) {
                Some(pos) => star.prev = Some(pos),
                None => {
                    reset_star(star, self.warp_speed, rng);
                    continue;
                }
            }

            star.z -= star.velocity;
            star.twinkle += 0.18;
            if star.z <= MIN_DEPTH {
                reset_star(star, self.warp_speed, rng);
            }
        }
    }
}

fn reset_star(star: &mut Star, warp_speed: f64, rng: &mut StdRng) {
    star.x = rng.gen::<f64>() * 2.0 - 1.0;
    star.y = rng.gen::<f64>() * 2.0 - 1.0;
    star.layer = rng.gen_range(0..3);
    let layer_bias = 0.4 + f64::from(star.layer) * 0.18;
    star.z = rng.gen::<f64>() * 0.9 + layer_bias;
    let speed_variance = 0.6 + f64::from(star.layer) * 0.25 + rng.gen::<f64>() * 0.4;
    star.velocity = warp_speed * speed_variance;
    star.twinkle = rng.gen::<f64>() * TAU;
    star.prev = None;
}

fn project_star(star: &Star, width: i32, height: i32) -> Option<(i32, i32)> {
    if star.z <= 0.0 {
        return None;
    }
    let scale = f64::from(width.min(height)) * 0.45;
    let x = (f64::from(width) / 2.0 + star.x * scale / star.z) as i32;
    let y = (f64::from(height) / 2.0 + star.y * scale / (star.z * 0.9)) as i32;
    if x < 0 || x >= width || y < 0 || y >= height {
        return None;
    }
    Some((x, y))
}

fn draw_ellipse(frame: &mut FrameBuffer, cx: i32, cy: i32, rx: f64, ry: f64, color: Color) {
    let steps = ((rx * 6.0) as usize).max(24);
    for i in 0..steps {
        let angle = i as f64 / steps as f64 * TAU;
        let x = cx + (angle.cos() * rx) as i32;
        let y = cy + (angle.sin() * ry) as i32;
        frame.set_if_empty(x, y, b'-', Some(color));
    }
}

fn draw_spoke(frame: &mut FrameBuffer, cx: i32, cy: i32, angle: f64, length: f64, color: Color) {
    let end_x = cx + (angle.cos() * length) as i32;
    let end_y = cy + (angle.sin() * length * 0.55) as i32;
    let points = line_points(cx, cy, end_x, end_y);
    let glyph = slope_glyph(end_x - cx, end_y - cy);
    for &(x, y) in points.iter().skip(2).step_by(2) {
        frame.set_if_empty(x, y, glyph, Some(color));
    }
}

fn draw_trail(frame: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, depth: f64) {
    let points = line_points(x0, y0, x1, y1);
    if points.len() <= 1 {
        return;
    }
    let max_idx = TRAIL_PALETTE.len().saturating_sub(1);
    let color_index = (((1.0 - depth) * TRAIL_PALETTE.len() as f64) as usize).min(max_idx);
    let color = TRAIL_PALETTE.get(color_index);
    let glyph = trail_glyph(depth);
    for &(x, y) in &points[..points.len() - 1] {
        frame.set_if_empty(x, y, glyph, Some(color));
    }
}

fn draw_flare(frame: &mut FrameBuffer, x: i32, y: i32, depth: f64) {
    if depth > 0.45 {
        return;
    }
    let max_idx = FLARE_PALETTE.len().saturating_sub(1);
    let index = (((0.5 - depth) * FLARE_PALETTE.len() as f64 * 1.5) as usize).min(max_idx);
    let color = Some(FLARE_PALETTE.get(index));
    frame.set_if_empty(x + 1, y, b'-', color);
    frame.set_if_empty(x - 1, y, b'-', color);
    frame.set_if_empty(x, y + 1, b'|', color);
    frame.set_if_empty(x, y - 1, b'|', color);
    frame.set_if_empty(x + 1, y + 1, b'.', color);
    frame.set_if_empty(x - 1, y - 1, b'.', color);
    frame.set_if_empty(x + 1, y - 1, b'.', color);
    frame.set_if_empty(x - 1, y + 1, b'.', color);
}

fn star_color(depth: f64, twinkle: f64, tick: u64) -> Color {
    if STAR_PALETTE.is_empty() {
        return Color::WHITE;
    }
    let intensity = (1.0 - depth).clamp(0.0, 0.95);
    let flicker = 0.12 * (twinkle + tick as f64 * 0.12).sin();
    let ratio = (intensity + flicker).clamp(0.0, 0.95);
    let index = ((ratio / 0.35) as usize).min(STAR_PALETTE.len() - 1);
    let offset = (tick as usize / 24) % STAR_PALETTE.len();
    STAR_PALETTE.get(index + offset)
}

fn star_glyph(depth: f64, twinkle: f64) -> u8 {
    let ratio = (1.0 - depth + 0.1 * twinkle.sin()).clamp(0.0, 1.0);
    GLYPH_PALETTE.ratio(ratio)
}

fn trail_glyph(depth: f64) -> u8 {
    if depth > 0.6 {
        b'.'
    } else if depth > 0.3 {
        b'-'
    } else {
        b'~'
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::time::Duration;

    fn build(rng: &mut StdRng) -> Starfield {
        let cfg = SceneConfig::new(64, 24, Duration::from_millis(40));
        Starfield::new(&cfg, StarfieldParams::default(), rng)
    }

    #[test]
    fn test_population_is_constant() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut scene = build(&mut rng);
        let count = scene.stars.len();
        assert!(count >= 32);
        for _ in 0..300 {
            scene.advance(&mut rng);
        }
        assert_eq!(scene.stars.len(), count);
    }

    #[test]
    fn test_stars_respawn_above_depth_floor() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut scene = build(&mut rng);
        for _ in 0..300 {
            scene.advance(&mut rng);
        }
        for star in &scene.stars {
            assert!(star.z > MIN_DEPTH);
        }
    }

    #[test]
    fn test_projection_rejects_behind_camera() {
        let star = Star {
            x: 0.0,
            y: 0.0,
            z: -0.5,
            velocity: 0.01,
            prev: None,
            twinkle: 0.0,
            layer: 0,
        };
        assert_eq!(project_star(&star, 64, 24), None);
    }

    #[test]
    fn test_center_star_projects_to_center() {
        let star = Star {
            x: 0.0,
            y: 0.0,
            z: 1.0,
            velocity: 0.01,
            prev: None,
            twinkle: 0.0,
            layer: 0,
        };
        assert_eq!(project_star(&star, 64, 24), Some((32, 12)));
    }

    #[test]
    fn test_draw_paints_tunnel_and_stars() {
        let mut rng = StdRng::seed_from_u64(11);
        let scene = build(&mut rng);
        let mut frame = FrameBuffer::new(64, 24);
        scene.draw(&mut frame, 4);
        let painted = frame.cells().iter().filter(|c| c.is_painted()).count();
        assert!(painted > 50);
    }

    #[test]
    fn test_nonpositive_params_fall_back() {
        let mut rng = StdRng::seed_from_u64(1);
        let cfg = SceneConfig::new(64, 24, Duration::from_millis(40));
        let params = StarfieldParams {
            density: 0.0,
            warp_speed: -1.0,
        };
        let scene = Starfield::new(&cfg, params, &mut rng);
        assert!(scene.warp_speed > 0.0);
        assert!(scene.stars.len() >= 32);
    }
}
