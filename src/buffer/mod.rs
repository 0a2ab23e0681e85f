//! Buffer module: Core data structures for frame composition.
//!
//! This module contains:
//! - [`Cell`]: The atomic unit of a frame, optimized for cache efficiency
//! - [`FrameBuffer`]: The depth-compositing grid scenes paint into
//! - [`Color`]: ANSI 256-color index
//! - [`CellFlags`]: Cell state bitflags

mod cell;
mod frame;

pub use cell::{Cell, CellFlags, Color};
pub use frame::FrameBuffer;
