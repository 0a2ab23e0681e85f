//! Render module: Serialization of composed frames into terminal writes.
//!
//! This module contains:
//! - [`encoder`]: The frame-to-ANSI serializer honoring the one-write wire
//!   contract
//! - [`OutputBuffer`]: Pre-allocated escape-sequence accumulator
//! - [`Renderer`]: The per-tick flush path with timing statistics

pub mod encoder;
mod output;
mod renderer;

pub use encoder::encode_frame;
pub use output::OutputBuffer;
pub use renderer::{RenderStats, Renderer};
