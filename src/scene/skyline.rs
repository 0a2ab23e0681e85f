//! Skyline scene: Parallax neon city with flickering windows.
//!
//! Buildings are generated once in three layers; the layer index is the
//! compositing depth, so near towers occlude far ones and their windows.
//! Windows re-roll occasionally and whole buildings drift sideways at rare
//! intervals, wrapping around the far edge.

use super::palette::Palette;
use super::{Scene, SceneConfig};
use crate::buffer::{Color, FrameBuffer};
use rand::rngs::StdRng;
use rand::Rng;

const STAR_DEPTH: f32 = 4.0;
const HUD_DEPTH: f32 = 0.4;

static SKY_PALETTE: Palette = Palette::new(&[
    Color(17),
    Color(18),
    Color(19),
    Color(20),
    Color(26),
]);
static HORIZON_PALETTE: Palette = Palette::new(&[Color(90), Color(129), Color(165), Color(201)]);
static BUILDING_PALETTES: [Palette; 4] = [
    Palette::new(&[Color(236), Color(237), Color(238)]),
    Palette::new(&[Color(60), Color(61), Color(62)]),
    Palette::new(&[Color(33), Color(39), Color(45)]),
    Palette::new(&[Color(129), Color(135), Color(141)]),
];
static WINDOW_PALETTE: Palette = Palette::new(&[Color(226), Color(190), Color(214), Color(51)]);
static GLOW_PALETTE: Palette = Palette::new(&[Color(33), Color(45), Color(51)]);

struct Building {
    x: i32,
    width: i32,
    height: i32,
    palette: Palette,
    layer: i32,
    windows_on: Vec<bool>,
    outline: Color,
    fill_glyph: u8,
}

/// The neon skyline scene.
pub struct Skyline {
    width: i32,
    height: i32,
    buildings: Vec<Building>,
    ticks: u64,
}

impl Skyline {
    /// Build the scene; the city layout is rolled once at startup.
    pub fn new(cfg: &SceneConfig, rng: &mut StdRng) -> Self {
        let width = i32::from(cfg.width);
        let height = i32::from(cfg.height);

        let mut buildings = Vec::with_capacity(cfg.width as usize / 2);
        for layer in [3, 2, 1] {
            let mut x = rng.gen_range(0..8);
            while x < width {
                let b_width = 4 + rng.gen_range(0..6 + layer * 2);
                let b_height = height / 4 + rng.gen_range(0..height / 4) + layer * 3;
                let palette = BUILDING_PALETTES[rng.gen_range(0..BUILDING_PALETTES.len())];
                let window_count = (b_width * b_height / 5).max(0) as usize;
                let chance = (3 - layer).max(1);
                let windows_on = (0..window_count)
                    .map(|_| rng.gen_range(0..chance) == 0)
                    .collect();
                let fill_glyph = [b'=', b'#', b'%'][(layer as usize).min(3) - 1];
                buildings.push(Building {
                    x,
                    width: b_width,
                    height: b_height,
                    palette,
                    layer,
                    windows_on,
                    outline: GLOW_PALETTE.pick(rng),
                    fill_glyph,
                });
                x += b_width + rng.gen_range(0..6);
            }
        }

        Self {
            width,
            height,
            buildings,
            ticks: 0,
        }
    }

    fn draw_sky(frame: &mut FrameBuffer, tick: u64) {
        let t = tick as usize;
        let width = i32::from(frame.width());
        let height = i32::from(frame.height());
        for y in 0..height / 2 {
            let hue = SKY_PALETTE.get(y as usize / 2 + t / 20);
            for x in 0..width {
                frame.set_if_empty(x, y, b' ', Some(hue));
            }
        }
    }

    fn draw_stars(frame: &mut FrameBuffer, tick: u64) {
        let t = tick as usize;
        let width = usize::from(frame.width());
        let height = usize::from(frame.height());
        for i in 0..width / 6 {
            let x = (i * 13 + t) % width;
            let y = (i * 7 + t / 3) % (height / 2);
            if (x + y + t) % 11 == 0 {
                frame.set(x as i32, y as i32, b'.', Some(Color(231)), STAR_DEPTH);
            } else if (x * 3 + y + t) % 17 == 0 {
                frame.set(x as i32, y as i32, b'+', Some(Color(81)), STAR_DEPTH);
            }
        }
    }

    fn draw_horizon_glow(frame: &mut FrameBuffer, tick: u64) {
        let t = tick as usize;
        let width = i32::from(frame.width());
        let height = i32::from(frame.height());
        let horizon = height / 2;
        for y in horizon..height {
            let falloff = f64::from(y - horizon) / f64::from(height - horizon);
            let idx = (falloff * HORIZON_PALETTE.len() as f64) as usize + t / 16;
            let color = HORIZON_PALETTE.get(idx);
            for x in 0..width {
                frame.set_if_empty(x, y, b' ', Some(color));
            }
        }
    }

    fn draw_buildings(&self, frame: &mut FrameBuffer, tick: u64) {
        let base_line = self.height - 3;
        for building in &self.buildings {
            self.draw_building(frame, building, base_line, tick);
        }
    }

    fn draw_building(&self, frame: &mut FrameBuffer, b: &Building, base_line: i32, tick: u64) {
        let top = (base_line - b.height).max(0);
        let depth = b.layer as f32;

        for y in 0..b.height {
            let row = top + y;
            if row >= self.height {
                break;
            }
            let color = b.palette.get((y + b.layer) as usize);
            for x in 0..b.width {
                let col = b.x + x;
                let (glyph, cell_color) = if x == 0 || x == b.width - 1 {
                    (b'|', b.outline)
                } else if y == 0 {
                    (b'_', b.outline)
                } else {
                    (b.fill_glyph, color)
                };
                frame.set(col, row, glyph, Some(cell_color), depth);
            }
        }

        self.draw_windows(frame, b, base_line, tick);
        draw_billboard(frame, b, base_line, tick);
    }

    fn draw_windows(&self, frame: &mut FrameBuffer, b: &Building, base_line: i32, tick: u64) {
        let t = tick as usize;
        let depth = b.layer as f32 - 0.5;
        let window_cols = (b.width / 2).max(1);
        let window_rows = (b.height / 4).max(2);
        let mut idx = 0usize;
        for wy in 0..window_rows {
            let y = base_line - wy * 3 - 2;
            if y <= 2 {
                continue;
            }
            for wx in 0..window_cols {
                if idx >= b.windows_on.len() {
                    break;
                }
                if b.windows_on[idx] || (t / 10 + (wx + wy) as usize) % 6 == 0 {
                    let x = b.x + 1 + wx * 2;
                    let color = WINDOW_PALETTE.get((wx + wy) as usize + t / 7);
                    frame.set(x, y, b':', Some(color), depth);
                    frame.set(x + 1, y, b':', Some(color), depth);
                }
                idx += 1;
            }
        }
    }

    fn draw_hud(&self, frame: &mut FrameBuffer, tick: u64) {
        let y = self.height - 2;
        let bar_width = self.width / 2;
        let start = (self.width - bar_width) / 2;
        let fill = (f64::from(bar_width) * (0.5 + 0.5 * (tick as f64 * 0.02).sin())) as i32;
        for x in 0..bar_width {
            let (glyph, color) = if x < fill {
                (b'=', Color(45))
            } else {
                (b'-', Color(244))
            };
            frame.set(start + x, y, glyph, Some(color), HUD_DEPTH);
        }

        let text = format!(
            "SKYLINE {}k  FRAME:{:06}  SAT:{:02}%",
            self.width,
            tick,
            (tick / 5) % 100
        );
        for (i, byte) in text.bytes().enumerate() {
            frame.set(2 + i as i32, 1, byte, Some(Color(111)), HUD_DEPTH);
        }
    }
}

impl Scene for Skyline {
    fn draw(&self, frame: &mut FrameBuffer, tick: u64) {
        Self::draw_sky(frame, tick);
        Self::draw_stars(frame, tick);
        Self::draw_horizon_glow(frame, tick);
        self.draw_buildings(frame, tick);
        self.draw_hud(frame, tick);
    }

    fn advance(&mut self, rng: &mut StdRng) {
        self.ticks += 1;
        let reroll = self.ticks % 80 == 0;
        for building in &mut self.buildings {
            if reroll {
                for window in &mut building.windows_on {
                    if rng.gen_range(0..4) == 0 {
                        *window = !*window;
                    }
                }
            }
            if rng.gen_range(0..120) == 0 {
                building.x += 1;
                if building.x > self.width {
                    building.x = -building.width;
                }
            }
        }
    }
}

fn draw_billboard(frame: &mut FrameBuffer, b: &Building, base_line: i32, tick: u64) {
    if b.width < 8 {
        return;
    }
    let y = base_line - b.height - 3;
    if y < 1 {
        return;
    }
    let t = tick as usize;
    let depth = b.layer as f32 - 0.5;
    let x = b.x + b.width / 2 - 4;
    for i in 0..8 {
        let color = GLOW_PALETTE.get(i as usize + t / 6);
        frame.set(x + i, y, b'-', Some(color), depth);
        frame.set(x + i, y + 1, b'-', Some(color), depth);
    }
    if (t / 40) % 2 == 0 {
        let color = Some(Color(219));
        frame.set(x + 2, y - 1, b'/', color, depth);
        frame.set(x + 5, y - 1, b'\\', color, depth);
    }
}
