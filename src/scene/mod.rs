//! Scene module: Pluggable per-frame content generators.
//!
//! A scene is a self-contained animated visual. Each one owns its private
//! simulation entities and implements the two-method [`Scene`] capability:
//! `draw` paints the current state into the frame, `advance` steps the
//! simulation for the next tick. Scenes share no structure beyond that
//! pair; a closed [`Mode`] registry maps mode names to constructors.

pub mod geom;
mod palette;

mod aurora;
mod cloud;
mod cube;
mod ocean;
mod orbit;
mod plasma;
mod rain;
mod skyline;
mod spectrum;
mod starfield;
mod tunnel;

pub use aurora::Aurora;
pub use cloud::Cloud;
pub use cube::{Cube, CubeLayout};
pub use ocean::Ocean;
pub use orbit::{Orbit, OrbitParams};
pub use palette::{GlyphRamp, Palette};
pub use plasma::{Plasma, PlasmaParams};
pub use rain::{Rain, RainParams};
pub use skyline::Skyline;
pub use spectrum::Spectrum;
pub use starfield::{Starfield, StarfieldParams};
pub use tunnel::Tunnel;

use crate::buffer::FrameBuffer;
use rand::rngs::StdRng;
use std::time::Duration;

/// A unit of per-frame content generation.
///
/// `draw` must be a pure function of the scene state and the tick index —
/// no blocking, no IO, no randomness. `advance` mutates entity state for
/// the next tick, drawing any randomness from the process-seeded generator
/// the loop hands in. Neither may block.
pub trait Scene {
    /// Paint the current state into the frame.
    fn draw(&self, frame: &mut FrameBuffer, tick: u64);

    /// Step the simulation for the next tick.
    fn advance(&mut self, rng: &mut StdRng);
}

/// Shared dimensions and cadence every scene config carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneConfig {
    /// Grid width in columns.
    pub width: u16,
    /// Grid height in rows.
    pub height: u16,
    /// Delay between ticks.
    pub frame_delay: Duration,
}

impl SceneConfig {
    /// Create a config.
    pub const fn new(width: u16, height: u16, frame_delay: Duration) -> Self {
        Self {
            width,
            height,
            frame_delay,
        }
    }

    /// Apply CLI overrides; zero or missing values leave the preset alone.
    #[must_use]
    pub fn with_overrides(mut self, overrides: &Overrides) -> Self {
        if let Some(width) = overrides.width.filter(|w| *w > 0) {
            self.width = width;
        }
        if let Some(height) = overrides.height.filter(|h| *h > 0) {
            self.height = height;
        }
        if let Some(delay) = overrides.frame_delay.filter(|d| !d.is_zero()) {
            self.frame_delay = delay;
        }
        self
    }

    /// Clamp to a scene's floors; never rejects, only raises.
    #[must_use]
    pub fn normalized(mut self, min_width: u16, min_height: u16, fallback_delay: Duration) -> Self {
        self.width = self.width.max(min_width);
        self.height = self.height.max(min_height);
        if self.frame_delay.is_zero() {
            self.frame_delay = fallback_delay;
        }
        self
    }
}

/// Shared CLI overrides, validated before the loop starts.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    /// Override grid width.
    pub width: Option<u16>,
    /// Override grid height.
    pub height: Option<u16>,
    /// Override frame delay.
    pub frame_delay: Option<Duration>,
    /// Cube scene layout selection.
    pub cube_layout: Option<CubeLayout>,
}

/// The closed set of available scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Rotating wireframe cubes with shaded faces.
    Cube,
    /// Digital rain streams with splashes.
    Rain,
    /// Faux spectrum analyzer bars and waveform.
    Spectrum,
    /// Starfield warp with trails and flares.
    Starfield,
    /// Sine-field plasma.
    Plasma,
    /// Orbiting particle HUD.
    Orbit,
    /// Neon skyline with flickering windows.
    Skyline,
    /// Layered ocean waves.
    Ocean,
    /// Aurora curtains over mountains.
    Aurora,
    /// Radial neon tunnel.
    Tunnel,
    /// Parametric cloud layers with lightning.
    Cloud,
}

impl Mode {
    /// Every mode, in display order.
    pub const ALL: [Self; 11] = [
        Self::Cube,
        Self::Rain,
        Self::Spectrum,
        Self::Starfield,
        Self::Plasma,
        Self::Orbit,
        Self::Skyline,
        Self::Ocean,
        Self::Aurora,
        Self::Tunnel,
        Self::Cloud,
    ];

    /// Canonical mode name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cube => "cube",
            Self::Rain => "rain",
            Self::Spectrum => "spectrum",
            Self::Starfield => "starfield",
            Self::Plasma => "plasma",
            Self::Orbit => "orbit",
            Self::Skyline => "skyline",
            Self::Ocean => "ocean",
            Self::Aurora => "aurora",
            Self::Tunnel => "tunnel",
            Self::Cloud => "cloud",
        }
    }

    /// Resolve a mode name or alias, case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "cube" | "cybercube" => Some(Self::Cube),
            "rain" | "neonrain" => Some(Self::Rain),
            "spectrum" | "equalizer" | "scope" => Some(Self::Spectrum),
            "starfield" | "warp" | "stars" => Some(Self::Starfield),
            "plasma" => Some(Self::Plasma),
            "orbit" | "hud" => Some(Self::Orbit),
            "skyline" | "city" => Some(Self::Skyline),
            "ocean" | "waves" => Some(Self::Ocean),
            "aurora" | "borealis" => Some(Self::Aurora),
            "tunnel" => Some(Self::Tunnel),
            "cloud" | "clouds" | "sky" => Some(Self::Cloud),
            _ => None,
        }
    }

    /// Preset tuned for a typical terminal.
    pub const fn default_config(self) -> SceneConfig {
        match self {
            Self::Cube => SceneConfig::new(96, 32, Duration::from_millis(45)),
            Self::Rain => SceneConfig::new(96, 34, Duration::from_millis(55)),
            Self::Starfield => SceneConfig::new(96, 32, Duration::from_millis(40)),
            Self::Spectrum => SceneConfig::new(100, 34, Duration::from_millis(45)),
            Self::Plasma | Self::Ocean | Self::Tunnel => {
                SceneConfig::new(100, 34, Duration::from_millis(35))
            }
            Self::Orbit | Self::Skyline | Self::Aurora => {
                SceneConfig::new(100, 34, Duration::from_millis(40))
            }
            Self::Cloud => SceneConfig::new(100, 34, Duration::from_millis(70)),
        }
    }

    /// Minimum width/height floors and the fallback delay for this scene.
    const fn floor(self) -> (u16, u16, Duration) {
        match self {
            Self::Cube => (48, 24, Duration::from_millis(60)),
            Self::Rain => (48, 24, Duration::from_millis(55)),
            Self::Starfield => (48, 24, Duration::from_millis(45)),
            Self::Spectrum | Self::Orbit | Self::Skyline | Self::Aurora => {
                (60, 24, Duration::from_millis(45))
            }
            Self::Plasma | Self::Ocean | Self::Tunnel => (60, 24, Duration::from_millis(40)),
            Self::Cloud => (60, 24, Duration::from_millis(70)),
        }
    }

    /// Normalize the preset against overrides and this scene's floors.
    pub fn resolve_config(self, overrides: &Overrides) -> SceneConfig {
        let (min_width, min_height, fallback_delay) = self.floor();
        self.default_config()
            .with_overrides(overrides)
            .normalized(min_width, min_height, fallback_delay)
    }

    /// Construct the scene together with its normalized config.
    pub fn build(self, overrides: &Overrides, rng: &mut StdRng) -> (Box<dyn Scene>, SceneConfig) {
        let cfg = self.resolve_config(overrides);
        let scene: Box<dyn Scene> = match self {
            Self::Cube => Box::new(Cube::new(&cfg, overrides.cube_layout.unwrap_or_default())),
            Self::Rain => Box::new(Rain::new(&cfg, RainParams::default(), rng)),
            Self::Spectrum => Box::new(Spectrum::new(&cfg, rng)),
            Self::Starfield => Box::new(Starfield::new(&cfg, StarfieldParams::default(), rng)),
            Self::Plasma => Box::new(Plasma::new(&cfg, PlasmaParams::default())),
            Self::Orbit => Box::new(Orbit::new(&cfg, OrbitParams::default(), rng)),
            Self::Skyline => Box::new(Skyline::new(&cfg, rng)),
            Self::Ocean => Box::new(Ocean::new(&cfg)),
            Self::Aurora => Box::new(Aurora::new(&cfg)),
            Self::Tunnel => Box::new(Tunnel::new(&cfg)),
            Self::Cloud => Box::new(Cloud::new(&cfg)),
        };
        (scene, cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{encode_frame, OutputBuffer};
    use rand::SeedableRng;

    #[test]
    fn test_parse_aliases() {
        assert_eq!(Mode::parse("cybercube"), Some(Mode::Cube));
        assert_eq!(Mode::parse("NEONRAIN"), Some(Mode::Rain));
        assert_eq!(Mode::parse("equalizer"), Some(Mode::Spectrum));
        assert_eq!(Mode::parse("warp"), Some(Mode::Starfield));
        assert_eq!(Mode::parse("sky"), Some(Mode::Cloud));
        assert_eq!(Mode::parse("lava-lamp"), None);
    }

    #[test]
    fn test_every_canonical_name_parses() {
        for mode in Mode::ALL {
            assert_eq!(Mode::parse(mode.name()), Some(mode));
        }
    }

    #[test]
    fn test_overrides_apply_only_when_positive() {
        let cfg = SceneConfig::new(96, 32, Duration::from_millis(45));
        let overrides = Overrides {
            width: Some(0),
            height: Some(40),
            frame_delay: Some(Duration::ZERO),
            cube_layout: None,
        };
        let cfg = cfg.with_overrides(&overrides);
        assert_eq!(cfg.width, 96);
        assert_eq!(cfg.height, 40);
        assert_eq!(cfg.frame_delay, Duration::from_millis(45));
    }

    #[test]
    fn test_floor_raises_small_requests() {
        let overrides = Overrides {
            width: Some(10),
            height: Some(5),
            ..Overrides::default()
        };
        let cfg = Mode::Cube.resolve_config(&overrides);
        assert_eq!(cfg.width, 48);
        assert_eq!(cfg.height, 24);
    }

    #[test]
    fn test_serialized_width_matches_floor_not_request() {
        let overrides = Overrides {
            width: Some(10),
            ..Overrides::default()
        };
        let cfg = Mode::Cube.resolve_config(&overrides);
        let frame = FrameBuffer::new(cfg.width, cfg.height);

        let mut out = OutputBuffer::new();
        encode_frame(&frame, &mut out);
        let text = String::from_utf8(out.as_bytes().to_vec()).unwrap();
        let first_row = text
            .trim_start_matches("\x1b[H")
            .split("\x1b[0m")
            .next()
            .unwrap();
        assert_eq!(first_row.len(), 48);
    }

    #[test]
    fn test_every_mode_builds_and_draws() {
        let mut rng = StdRng::seed_from_u64(7);
        for mode in Mode::ALL {
            let (scene, cfg) = mode.build(&Overrides::default(), &mut rng);
            let mut frame = FrameBuffer::new(cfg.width, cfg.height);
            let mut scene = scene;
            for tick in 0..3 {
                frame.clear();
                scene.draw(&mut frame, tick);
                scene.advance(&mut rng);
            }
        }
    }
}
