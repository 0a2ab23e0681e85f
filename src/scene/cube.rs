//! Cube scene: Rotating wireframe cubes with shaded faces.
//!
//! Each instance projects eight rotated vertices into screen space, fills
//! the camera-facing faces with barycentric-interpolated depth, then lays
//! edges and glowing vertices on top. Everything routes through the depth
//! write, so intersecting instances occlude each other correctly.

use super::geom::{lerp, line_points, slope_glyph, Point2, Vec3};
use super::palette::Palette;
use super::{Scene, SceneConfig};
use crate::buffer::{Color, FrameBuffer};
use rand::rngs::StdRng;

const CAMERA_DISTANCE: f64 = 4.5;
const ASPECT_RATIO: f64 = 0.55;
const MAX_FIT_ATTEMPTS: u32 = 10;

const BASE_SPIN: Vec3 = Vec3::new(0.022, 0.017, 0.013);

static EDGE_PALETTE: Palette = Palette::new(&[
    Color(45),
    Color(81),
    Color(123),
    Color(159),
    Color(201),
]);
static VERTEX_GLOW_PALETTE: Palette =
    Palette::new(&[Color(195), Color(159), Color(123), Color(51)]);
static FACE_FILL_PALETTE: Palette = Palette::new(&[
    Color(24),
    Color(31),
    Color(38),
    Color(44),
    Color(81),
]);
static GHOST_PALETTE: Palette = Palette::new(&[Color(238), Color(239), Color(240)]);
static BACKDROP_PALETTE: Palette = Palette::new(&[Color(233), Color(234), Color(235)]);

static CUBE_VERTICES: [Vec3; 8] = [
    Vec3::new(-1.0, -1.0, -1.0),
    Vec3::new(1.0, -1.0, -1.0),
    Vec3::new(1.0, 1.0, -1.0),
    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(-1.0, -1.0, 1.0),
    Vec3::new(1.0, -1.0, 1.0),
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(-1.0, 1.0, 1.0),
];

static CUBE_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0),
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

struct FaceDef {
    indices: [usize; 4],
    glyph: u8,
}

static CUBE_FACES: [FaceDef; 6] = [
    FaceDef {
        indices: [0, 3, 2, 1],
        glyph: b'/',
    },
    FaceDef {
        indices: [4, 5, 6, 7],
        glyph: b'\\',
    },
    FaceDef {
        indices: [3, 7, 6, 2],
        glyph: b'-',
    },
    FaceDef {
        indices: [0, 1, 5, 4],
        glyph: b'-',
    },
    FaceDef {
        indices: [1, 2, 6, 5],
        glyph: b'=',
    },
    FaceDef {
        indices: [0, 4, 7, 3],
        glyph: b'=',
    },
];

const VIEW_VECTOR: Vec3 = Vec3::new(0.0, 0.0, 1.0);

/// How cube instances are arranged on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CubeLayout {
    /// Three offset instances with distinct spin rates.
    #[default]
    Multi,
    /// One centered instance.
    Single,
}

impl CubeLayout {
    /// Resolve a layout name, case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "" | "multi" | "default" => Some(Self::Multi),
            "single" | "solo" | "one" => Some(Self::Single),
            _ => None,
        }
    }
}

/// One cube copy: placement plus its rotation state.
struct Instance {
    scale: f64,
    offset_x: f64,
    offset_y: f64,
    spin: Vec3,
    angles: Vec3,
}

impl Instance {
    const fn new(scale: f64, offset_x: f64, offset_y: f64, spin: Vec3, phase: Vec3) -> Self {
        Self {
            scale,
            offset_x,
            offset_y,
            spin,
            angles: phase,
        }
    }
}

/// The rotating cube scene.
pub struct Cube {
    instances: Vec<Instance>,
}

impl Cube {
    /// Build the scene for a normalized config and layout.
    pub fn new(_cfg: &SceneConfig, layout: CubeLayout) -> Self {
        let instances = match layout {
            CubeLayout::Multi => vec![
                Instance::new(
                    0.9,
                    -0.55,
                    -0.12,
                    Vec3::new(0.019, 0.021, 0.015),
                    Vec3::new(0.4, 0.1, 0.8),
                ),
                Instance::new(1.05, 0.0, 0.05, BASE_SPIN, Vec3::new(0.15, 0.05, 0.0)),
                Instance::new(
                    0.78,
                    0.55,
                    -0.05,
                    Vec3::new(0.017, 0.02, 0.014),
                    Vec3::new(0.7, 0.35, 0.2),
                ),
            ],
            CubeLayout::Single => vec![Instance::new(1.1, 0.0, 0.0, BASE_SPIN, Vec3::ZERO)],
        };
        Self { instances }
    }

    fn draw_backdrop(frame: &mut FrameBuffer, tick: u64) {
        let t = tick as usize;
        let width = i32::from(frame.width());
        let height = i32::from(frame.height());
        for y in (0..height).step_by(4) {
            let color = BACKDROP_PALETTE.get(y as usize / 4 + t / 30);
            let mut x = 0;
            while x < width {
                let glyph = if (x as usize / 2 + y as usize + t / 8) % 5 == 0 {
                    b':'
                } else {
                    b'.'
                };
                frame.set_if_empty(x, y, glyph, Some(color));
                x += 2;
            }
        }
    }

    fn draw_instance(frame: &mut FrameBuffer, instance: &Instance, scale: f64, tick: u64) {
        let instance_scale = scale * instance.scale;
        if instance_scale <= 0.0 {
            return;
        }

        let width = i32::from(frame.width());
        let height = i32::from(frame.height());

        let rotated: Vec<Vec3> = CUBE_VERTICES
            .iter()
            .map(|v| v.rotated(instance.angles.x, instance.angles.y, instance.angles.z))
            .collect();

        let (projected, fitted_scale) = project_to_fit(&rotated, width, height, instance_scale, 2);
        let (ghost, _) = project_to_fit(&rotated, width, height, fitted_scale * 1.08, 1);

        let dx = (f64::from(width) * instance.offset_x * 0.5) as i32;
        let dy = (f64::from(height) * instance.offset_y * 0.5) as i32;
        let projected = shift_points(projected, dx, dy);
        let ghost = shift_points(ghost, dx, dy);

        draw_ghost_frame(frame, &ghost, tick);
        draw_faces(frame, &rotated, &projected, tick);

        struct EdgeRender {
            from: Point2,
            to: Point2,
            color: Color,
            depth: f64,
        }

        let mut edges: Vec<EdgeRender> = CUBE_EDGES
            .iter()
            .enumerate()
            .map(|(idx, &(a, b))| {
                let from = projected[a];
                let to = projected[b];
                let depth = (from.depth + to.depth) * 0.5;
                EdgeRender {
                    from,
                    to,
                    color: edge_color(idx, depth, tick),
                    depth,
                }
            })
            .collect();

        // Farthest edges first; the depth test keeps nearer ones on top.
        edges.sort_by(|a, b| b.depth.total_cmp(&a.depth));

        for edge in &edges {
            draw_edge(frame, edge.from, edge.to, edge.color);
        }

        for pt in &projected {
            frame.set(
                pt.x,
                pt.y,
                b'O',
                Some(glow_for_depth(pt.depth)),
                (pt.depth - 0.08) as f32,
            );
        }
    }
}

impl Scene for Cube {
    fn draw(&self, frame: &mut FrameBuffer, tick: u64) {
        Self::draw_backdrop(frame, tick);

        let min_dim = f64::from(frame.width().min(frame.height()));
        let pulse = 0.85 + 0.15 * (tick as f64 * 0.05).sin();
        let scale = min_dim * 1.25 * pulse;

        for instance in &self.instances {
            Self::draw_instance(frame, instance, scale, tick);
        }
    }

    fn advance(&mut self, _rng: &mut StdRng) {
        for instance in &mut self.instances {
            instance.angles.x += instance.spin.x;
            instance.angles.y += instance.spin.y;
            instance.angles.z += instance.spin.z;
        }
    }
}

fn project(v: Vec3, scale: f64, width: i32, height: i32) -> Point2 {
    let mut distance = v.z + CAMERA_DISTANCE;
    if distance == 0.0 {
        distance = 0.001;
    }
    let factor = scale / distance;
    let x = (f64::from(width) / 2.0 + v.x * factor) as i32;
    let y = (f64::from(height) / 2.0 - v.y * factor * ASPECT_RATIO) as i32;
    Point2::new(x, y, distance)
}

fn project_vertices(vertices: &[Vec3], scale: f64, width: i32, height: i32) -> Vec<Point2> {
    vertices
        .iter()
        .map(|&v| project(v, scale, width, height))
        .collect()
}

/// Project at the requested scale, shrinking until the silhouette fits
/// inside the margins (or the retry budget runs out).
fn project_to_fit(
    vertices: &[Vec3],
    width: i32,
    height: i32,
    scale: f64,
    margin: i32,
) -> (Vec<Point2>, f64) {
    let current = project_vertices(vertices, scale, width, height);
    if within_margins(&current, width, height, margin) {
        return (current, scale);
    }
    let mut current = current;
    let mut next_scale = scale;
    for _ in 0..MAX_FIT_ATTEMPTS {
        next_scale *= 0.94;
        let projected = project_vertices(vertices, next_scale, width, height);
        if within_margins(&projected, width, height, margin) {
            return (projected, next_scale);
        }
        current = projected;
    }
    (current, next_scale)
}

fn within_margins(points: &[Point2], width: i32, height: i32, margin: i32) -> bool {
    let margin = margin.max(1);
    points.iter().all(|p| {
        p.x >= margin && p.x < width - margin && p.y >= margin && p.y < height - margin
    })
}

fn shift_points(mut points: Vec<Point2>, dx: i32, dy: i32) -> Vec<Point2> {
    for p in &mut points {
        p.x += dx;
        p.y += dy;
    }
    points
}

fn draw_ghost_frame(frame: &mut FrameBuffer, projected: &[Point2], tick: u64) {
    if projected.is_empty() {
        return;
    }
    for (idx, &(a, b)) in CUBE_EDGES.iter().enumerate() {
        let color = GHOST_PALETTE.get(idx + tick as usize / 6);
        let from = projected[a];
        let to = projected[b];
        let depth = (from.depth + to.depth) * 0.5 + 1.5;
        for (x, y) in line_points(from.x, from.y, to.x, to.y) {
            frame.set(x, y, b'.', Some(color), depth as f32);
        }
    }
}

fn draw_faces(frame: &mut FrameBuffer, rotated: &[Vec3], projected: &[Point2], tick: u64) {
    for (i, face) in CUBE_FACES.iter().enumerate() {
        let a = rotated[face.indices[0]];
        let b = rotated[face.indices[1]];
        let c = rotated[face.indices[2]];

        let normal = b.sub(a).cross(c.sub(a));
        let intensity = -normal.normalized().dot(VIEW_VECTOR);
        if intensity <= 0.0 {
            continue;
        }

        let color = shade_for_face(intensity, tick + i as u64);
        let p0 = projected[face.indices[0]];
        let p1 = projected[face.indices[1]];
        let p2 = projected[face.indices[2]];
        let p3 = projected[face.indices[3]];

        fill_triangle(frame, p0, p1, p2, face.glyph, color);
        fill_triangle(frame, p0, p2, p3, face.glyph, color);
    }
}

fn shade_for_face(intensity: f64, tick: u64) -> Color {
    let levels = FACE_FILL_PALETTE.len();
    if levels == 0 {
        return Color::WHITE;
    }
    let idx = (intensity * (levels - 1) as f64).clamp(0.0, (levels - 1) as f64) as usize;
    let offset = (tick as usize / 24) % levels;
    FACE_FILL_PALETTE.get(idx + offset)
}

fn fill_triangle(frame: &mut FrameBuffer, a: Point2, b: Point2, c: Point2, glyph: u8, color: Color) {
    let min_x = a.x.min(b.x).min(c.x).max(0);
    let max_x = a.x.max(b.x).max(c.x).min(i32::from(frame.width()) - 1);
    let min_y = a.y.min(b.y).min(c.y).max(0);
    let max_y = a.y.max(b.y).max(c.y).min(i32::from(frame.height()) - 1);

    let area = edge_function(a, b, c);
    if area == 0.0 {
        return;
    }

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = Point2::new(x, y, 0.0);
            let w0 = edge_function(b, c, p);
            let w1 = edge_function(c, a, p);
            let w2 = edge_function(a, b, p);

            if !same_sign(w0, w1, w2) {
                continue;
            }

            let w0 = w0 / area;
            let w1 = w1 / area;
            let w2 = w2 / area;
            let depth = w0 * a.depth + w1 * b.depth + w2 * c.depth;

            frame.set(x, y, glyph, Some(color), (depth + 0.02) as f32);
        }
    }
}

fn edge_function(a: Point2, b: Point2, c: Point2) -> f64 {
    f64::from(b.x - a.x) * f64::from(c.y - a.y) - f64::from(b.y - a.y) * f64::from(c.x - a.x)
}

fn same_sign(w0: f64, w1: f64, w2: f64) -> bool {
    let has_pos = w0 > 0.0 || w1 > 0.0 || w2 > 0.0;
    let has_neg = w0 < 0.0 || w1 < 0.0 || w2 < 0.0;
    !(has_pos && has_neg)
}

fn edge_color(idx: usize, depth: f64, tick: u64) -> Color {
    if EDGE_PALETTE.is_empty() {
        return Color::WHITE;
    }
    let max_idx = (EDGE_PALETTE.len() - 1) as f64;
    let closeness = ((CAMERA_DISTANCE + 1.0 - depth) * 3.0).clamp(0.0, max_idx) as usize;
    let offset = (tick as usize / 8) % EDGE_PALETTE.len();
    EDGE_PALETTE.get(idx + offset + closeness)
}

fn draw_edge(frame: &mut FrameBuffer, from: Point2, to: Point2, color: Color) {
    let points = line_points(from.x, from.y, to.x, to.y);
    if points.is_empty() {
        return;
    }
    let glyph = slope_glyph(to.x - from.x, to.y - from.y);
    let last = points.len() - 1;
    for (i, &(x, y)) in points.iter().enumerate() {
        let t = if last > 0 { i as f64 / last as f64 } else { 0.5 };
        let depth = (lerp(from.depth, to.depth, t) - 0.03).max(0.0);
        frame.set(x, y, glyph, Some(color), depth as f32);
    }
}

fn glow_for_depth(depth: f64) -> Color {
    if depth < CAMERA_DISTANCE - 1.2 {
        VERTEX_GLOW_PALETTE.get(0)
    } else if depth < CAMERA_DISTANCE - 0.4 {
        VERTEX_GLOW_PALETTE.get(1)
    } else if depth < CAMERA_DISTANCE + 0.6 {
        VERTEX_GLOW_PALETTE.get(2)
    } else {
        VERTEX_GLOW_PALETTE.get(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::time::Duration;

    fn config() -> SceneConfig {
        SceneConfig::new(64, 24, Duration::from_millis(45))
    }

    #[test]
    fn test_layout_parse() {
        assert_eq!(CubeLayout::parse("multi"), Some(CubeLayout::Multi));
        assert_eq!(CubeLayout::parse("SOLO"), Some(CubeLayout::Single));
        assert_eq!(CubeLayout::parse("spiral"), None);
    }

    #[test]
    fn test_instance_counts() {
        assert_eq!(Cube::new(&config(), CubeLayout::Multi).instances.len(), 3);
        assert_eq!(Cube::new(&config(), CubeLayout::Single).instances.len(), 1);
    }

    #[test]
    fn test_draw_paints_cells() {
        let scene = Cube::new(&config(), CubeLayout::Single);
        let mut frame = FrameBuffer::new(64, 24);
        scene.draw(&mut frame, 0);
        let painted = frame.cells().iter().filter(|c| c.is_painted()).count();
        assert!(painted > 0);
    }

    #[test]
    fn test_advance_rotates() {
        let cfg = config();
        let mut scene = Cube::new(&cfg, CubeLayout::Single);
        let before = scene.instances[0].angles;
        let mut rng = StdRng::seed_from_u64(1);
        scene.advance(&mut rng);
        let after = scene.instances[0].angles;
        assert!(after.x > before.x);
        assert!(after.y > before.y);
        assert!(after.z > before.z);
    }

    #[test]
    fn test_draw_is_deterministic_per_tick() {
        let scene = Cube::new(&config(), CubeLayout::Multi);
        let mut a = FrameBuffer::new(64, 24);
        let mut b = FrameBuffer::new(64, 24);
        scene.draw(&mut a, 5);
        scene.draw(&mut b, 5);
        assert!(a == b);
    }

    #[test]
    fn test_projection_fits_margins() {
        let rotated: Vec<Vec3> = CUBE_VERTICES.to_vec();
        let (points, _) = project_to_fit(&rotated, 64, 24, 30.0, 2);
        assert!(within_margins(&points, 64, 24, 2));
    }
}
