//! # Phosphor
//!
//! A depth-compositing ASCII animation engine for ANSI terminals.
//!
//! Phosphor renders animated ASCII/ANSI-art scenes (rotating cubes, digital
//! rain, plasma fields, starfield warps and friends) at a fixed frame rate.
//! Scenes paint into a shared depth-aware cell grid; the renderer turns each
//! composed frame into one minimal-escape byte stream and one terminal write.
//!
//! ## Core Concepts
//!
//! - **Depth compositing**: Overlapping writes to a cell resolve nearest-wins
//! - **Claim-once layering**: Backgrounds take whatever foregrounds left empty
//! - **One write per tick**: A frame is fully serialized before any byte
//!   reaches the terminal
//! - **Scoped terminal session**: Cursor and screen state restore on every
//!   exit path
//!
//! ## Example
//!
//! ```rust,ignore
//! use phosphor::{FrameBuffer, Color};
//!
//! // Compose a small frame by hand
//! let mut frame = FrameBuffer::new(80, 24);
//! frame.set(2, 2, b'@', Some(Color::new(45)), 1.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod buffer;
pub mod render;
pub mod runtime;
pub mod scene;

// Re-exports for convenience
pub use buffer::{Cell, CellFlags, Color, FrameBuffer};
pub use render::{OutputBuffer, RenderStats, Renderer};
pub use runtime::{Runner, SessionConfig, TerminalSession, Tick, Ticker};
pub use scene::{CubeLayout, Mode, Overrides, Scene, SceneConfig};
