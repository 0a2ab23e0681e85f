//! Runtime module: Tick pacing, terminal lifecycle, and the control loop.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────┐        Tick         ┌──────────────────────┐
//! │ Ticker Thread  │ ─────────────────▶  │                      │
//! └────────────────┘                     │    Control Loop      │
//!                                        │ draw → flush → adv   │
//! ┌────────────────┐    ControlEvent     │                      │
//! │ Watcher Thread │ ─────────────────▶  │                      │
//! └────────────────┘                     └──────────────────────┘
//! ```
//!
//! Helper threads never touch the frame or scene state; the control thread
//! does all composition and IO, blocking on the tick channel between frames.

mod runner;
mod session;
mod ticker;
mod watch;

pub use runner::Runner;
pub use session::{SessionConfig, TerminalSession};
pub use ticker::{Tick, Ticker};
pub use watch::{ControlEvent, InterruptWatcher};
