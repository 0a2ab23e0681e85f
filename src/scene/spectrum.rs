//! Spectrum scene: Faux equalizer bars, waveform trace and scan beam.
//!
//! Bars oscillate on per-bar phase oscillators rather than real audio.
//! Depth layering keeps the stack readable: peak markers over bars over
//! the waveform, with the grid and beam claiming leftover cells.

use super::palette::Palette;
use super::{Scene, SceneConfig};
use crate::buffer::{Color, FrameBuffer};
use rand::rngs::StdRng;
use rand::Rng;
use std::f64::consts::TAU;

static BAR_PALETTE: Palette = Palette::new(&[
    Color(33),
    Color(39),
    Color(45),
    Color(75),
    Color(111),
]);
static TRACE_PALETTE: Palette = Palette::new(&[Color(214), Color(221), Color(223)]);
static BEAM_PALETTE: Palette = Palette::new(&[Color(36), Color(44), Color(51)]);

const GRID_COLOR: Color = Color(237);
const PEAK_COLOR: Color = Color(229);

const BAR_DEPTH: f32 = 1.0;
const PEAK_DEPTH: f32 = 0.8;
const TRACE_DEPTH: f32 = 2.0;

struct Bar {
    phase: f64,
    speed: f64,
    offset: f64,
    color_shift: usize,
    peak: f64,
}

/// The spectrum analyzer scene.
pub struct Spectrum {
    width: i32,
    height: i32,
    bars: Vec<Bar>,
}

impl Spectrum {
    /// Build the scene with one bar per three columns (at least eight).
    pub fn new(cfg: &SceneConfig, rng: &mut StdRng) -> Self {
        let width = i32::from(cfg.width);
        let height = i32::from(cfg.height);
        let count = (cfg.width as usize / 3).max(8);

        let bars = (0..count)
            .map(|_| Bar {
                phase: rng.gen::<f64>() * TAU,
                speed: 0.05 + rng.gen::<f64>() * 0.08,
                offset: rng.gen::<f64>() * std::f64::consts::PI,
                color_shift: rng.gen_range(0..BAR_PALETTE.len().max(1)),
                peak: 0.0,
            })
            .collect();

        Self {
            width,
            height,
            bars,
        }
    }

    fn draw_grid(frame: &mut FrameBuffer, tick: u64) {
        let t = tick as usize;
        let width = i32::from(frame.width());
        let height = i32::from(frame.height());
        let base = height - 1;
        for x in 0..width {
            frame.set_if_empty(x, base, b'_', Some(GRID_COLOR));
            if x as usize % 12 == t % 12 {
                frame.set_if_empty(x, base - 6, b'.', Some(GRID_COLOR));
            }
        }
        for y in (0..height).step_by(6) {
            for x in (0..width).step_by(2) {
                frame.set_if_empty(x, y, b'.', Some(GRID_COLOR));
            }
        }
    }

    fn draw_waveform(frame: &mut FrameBuffer, tick: u64) {
        let t = tick as f64;
        let width = i32::from(frame.width());
        let height = i32::from(frame.height());
        let center = height / 3;
        for x in 0..width {
            let fx = f64::from(x);
            let value = (fx * 0.11 + t * 0.08).sin()
                + 0.6 * (fx * 0.035 + t * 0.025).sin()
                + 0.3 * (fx * 0.23 + t * 0.12).sin();
            let y = (center - (value * 2.3) as i32).clamp(1, height - 5);
            let color = TRACE_PALETTE.get(x as usize / 4 + tick as usize / 5);
            frame.set(x, y, b'*', Some(color), TRACE_DEPTH);
            if y + 1 < height - 4 {
                frame.set(x, y + 1, b'-', Some(color), TRACE_DEPTH);
            }
        }
    }

    fn draw_bars(&self, frame: &mut FrameBuffer, tick: u64) {
        let base = self.height - 2;
        let column_width = (self.width / self.bars.len() as i32).max(1);

        for (i, bar) in self.bars.iter().enumerate() {
            let bar_height = self.bar_height(bar);
            let start_x = i as i32 * column_width;

            for x in start_x..(start_x + column_width).min(self.width) {
                for step in 0..bar_height {
                    let y = base - step;
                    if y < 0 {
                        continue;
                    }
                    let color = bar_color(step, bar_height, tick as usize + bar.color_shift);
                    let glyph = bar_glyph(step, bar_height);
                    frame.set(x, y, glyph, Some(color), BAR_DEPTH);
                }
            }

            let peak_y = base - (bar.peak.round() as i32).clamp(1, self.height - 3);
            let center = (start_x + column_width / 2).clamp(0, self.width - 1);
            frame.set(center, peak_y, b'_', Some(PEAK_COLOR), PEAK_DEPTH);
        }
    }

    fn draw_scan_beam(frame: &mut FrameBuffer, tick: u64) {
        let t = tick as usize;
        let width = i32::from(frame.width());
        let height = i32::from(frame.height());
        if width == 0 {
            return;
        }
        let beam_x = ((t / 2) % width as usize) as i32;
        for offset in -1..=1i32 {
            let col = (beam_x + offset).clamp(0, width - 1);
            let idx = (offset + BEAM_PALETTE.len() as i32) as usize + t / 8;
            let color = BEAM_PALETTE.get(idx);
            for y in 1..height - 2 {
                let glyph = if (y as usize + t / 3) % 4 == 0 { b':' } else { b'|' };
                frame.set_if_empty(col, y, glyph, Some(color));
            }
        }
    }

    /// Amplitude-derived bar height for the current phase.
    fn bar_height(&self, bar: &Bar) -> i32 {
        let wave = bar.phase.sin() + 0.7 * (bar.phase * 0.5 + bar.offset).sin();
        let amp = ((wave + 2.0) / 2.7).clamp(0.05, 1.0);
        ((amp * f64::from(self.height) / 1.3) as i32).clamp(2, self.height - 4)
    }
}

impl Scene for Spectrum {
    fn draw(&self, frame: &mut FrameBuffer, tick: u64) {
        Self::draw_grid(frame, tick);
        Self::draw_waveform(frame, tick);
        self.draw_bars(frame, tick);
        Self::draw_scan_beam(frame, tick);
    }

    fn advance(&mut self, rng: &mut StdRng) {
        let height = self.height;
        for bar in &mut self.bars {
            // Raise the peak against the amplitude just rendered, then let
            // it sink.
            let wave = bar.phase.sin() + 0.7 * (bar.phase * 0.5 + bar.offset).sin();
            let amp = ((wave + 2.0) / 2.7).clamp(0.05, 1.0);
            let bar_height = ((amp * f64::from(height) / 1.3) as i32).clamp(2, height - 4);
            if f64::from(bar_height) > bar.peak {
                bar.peak = f64::from(bar_height);
            }

            bar.phase += bar.speed;
            if bar.phase > TAU {
                bar.phase -= TAU;
            }
            bar.speed += (rng.gen::<f64>() - 0.5) * 0.005;
            bar.speed = bar.speed.clamp(0.03, 0.18);

            if bar.peak > 0.0 {
                bar.peak = (bar.peak - 0.35).max(0.0);
            }
        }
    }
}

fn bar_color(step: i32, total: i32, shift: usize) -> Color {
    if total <= 1 {
        return BAR_PALETTE.get(0);
    }
    let ratio = f64::from(step) / f64::from(total - 1);
    let max_idx = BAR_PALETTE.len().saturating_sub(1);
    let idx = ((ratio * BAR_PALETTE.len() as f64) as usize).min(max_idx);
    BAR_PALETTE.get(idx + shift / 12)
}

fn bar_glyph(step: i32, total: i32) -> u8 {
    let ratio = f64::from(step) / f64::from(total.max(2) - 1);
    if ratio < 0.2 {
        b'|'
    } else if ratio < 0.6 {
        b'#'
    } else {
        b'='
    }
}
