//! Runner: The tick loop driving draw → flush → advance forever.
//!
//! One control thread performs composition, serialization and state
//! advancement sequentially, then blocks on the tick channel until the next
//! boundary. The loop has no natural end; it runs until an interrupt
//! arrives, and every exit path restores the terminal through the session's
//! idempotent release.

use super::session::{SessionConfig, TerminalSession};
use super::ticker::Ticker;
use super::watch::{ControlEvent, InterruptWatcher};
use crate::buffer::FrameBuffer;
use crate::render::Renderer;
use crate::scene::{Scene, SceneConfig};
use crossbeam_channel::select;
use log::{debug, warn};
use rand::rngs::StdRng;
use std::io;
use std::time::Duration;

/// How long the watcher waits for terminal events before rechecking.
const EVENT_POLL: Duration = Duration::from_millis(25);

/// Owns a scene and the machinery that animates it.
pub struct Runner {
    scene: Box<dyn Scene>,
    frame: FrameBuffer,
    frame_delay: Duration,
    rng: StdRng,
    session_config: SessionConfig,
}

impl Runner {
    /// Create a runner for a built scene and its normalized config.
    pub fn new(scene: Box<dyn Scene>, config: SceneConfig, rng: StdRng) -> Self {
        Self {
            scene,
            frame: FrameBuffer::new(config.width, config.height),
            frame_delay: config.frame_delay,
            rng,
            session_config: SessionConfig::default(),
        }
    }

    /// Override the terminal session options.
    #[must_use]
    pub fn with_session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    /// Acquire the terminal and animate until interrupted.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be acquired or a frame write
    /// fails. Terminal state is restored on every path.
    pub fn run(mut self) -> io::Result<()> {
        let session = TerminalSession::acquire(self.session_config)?;
        let ticker = Ticker::spawn(self.frame_delay);
        let watcher = InterruptWatcher::spawn(EVENT_POLL);
        let mut renderer = Renderer::stdout();

        debug!(
            "animating {}x{} every {:?}",
            self.frame.width(),
            self.frame.height(),
            self.frame_delay
        );

        let result = loop {
            select! {
                recv(watcher.receiver()) -> event => match event {
                    Ok(ControlEvent::Interrupt) | Err(_) => break Ok(()),
                    Ok(ControlEvent::Error(message)) => {
                        warn!("event source error: {message}");
                    }
                },
                recv(ticker.receiver()) -> tick => {
                    let Ok(tick) = tick else { break Ok(()) };
                    self.frame.clear();
                    self.scene.draw(&mut self.frame, tick.frame);
                    if let Err(e) = renderer.flush(&self.frame) {
                        break Err(e);
                    }
                    self.scene.advance(&mut self.rng);
                },
            }
        };

        ticker.join();
        watcher.join();
        session.restore();

        let stats = renderer.stats();
        debug!(
            "stopped after {} frames, {} bytes, avg flush {}us",
            stats.frames, stats.bytes_written, stats.avg_flush_us
        );
        result
    }
}
