//! Ticker: Dedicated thread generating fixed-cadence timing events.
//!
//! The ticker decouples frame pacing from the control thread: it sends a
//! `Tick` on a small bounded channel at each frame-delay boundary, and the
//! control thread's blocking receive is the loop's only suspension point.

use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// A tick event sent at regular intervals.
#[derive(Debug, Clone, Copy)]
pub struct Tick {
    /// Frame number (monotonically increasing).
    pub frame: u64,
    /// Time elapsed since the ticker was started.
    pub elapsed: Duration,
}

/// Fixed-interval tick generator running on its own thread.
pub struct Ticker {
    /// Handle to the ticker thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
    /// Receiver for tick events.
    tick_rx: Receiver<Tick>,
}

impl Ticker {
    /// Spawn a ticker with the given frame delay.
    ///
    /// # Panics
    ///
    /// Panics if the OS fails to spawn the ticker thread.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn(interval: Duration) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        // Bounded channel with small buffer - we don't want ticks to queue up
        let (tick_tx, tick_rx) = bounded(2);

        let handle = thread::Builder::new()
            .name("phosphor-ticker".to_string())
            .spawn(move || {
                Self::run_loop(&tick_tx, &shutdown_clone, interval);
            })
            .expect("Failed to spawn ticker thread");

        Self {
            handle: Some(handle),
            shutdown,
            tick_rx,
        }
    }

    /// Get a reference to the tick receiver.
    ///
    /// The control loop selects over this and the interrupt channel.
    #[inline]
    pub const fn receiver(&self) -> &Receiver<Tick> {
        &self.tick_rx
    }

    /// Signal the ticker to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the ticker thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main ticker loop.
    fn run_loop(tick_tx: &Sender<Tick>, shutdown: &Arc<AtomicBool>, interval: Duration) {
        let start = Instant::now();
        let mut frame = 0u64;
        let mut next_tick = start + interval;

        loop {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }

            let now = Instant::now();
            if now >= next_tick {
                let tick = Tick {
                    frame,
                    elapsed: now - start,
                };

                // Non-blocking send - if the buffer is full the receiver is
                // still flushing the previous frame; skip rather than queue.
                let _ = tick_tx.try_send(tick);

                frame += 1;
                next_tick += interval;

                // Catch up without queuing if we fell behind.
                if next_tick < now {
                    next_tick = now + interval;
                }
            } else {
                let sleep_duration = next_tick - now;
                thread::sleep(sleep_duration.min(Duration::from_millis(1)));
            }
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_emits_frames() {
        let ticker = Ticker::spawn(Duration::from_millis(10));

        let tick = ticker.receiver().recv_timeout(Duration::from_millis(200));
        assert!(tick.is_ok());
        assert_eq!(tick.unwrap().frame, 0);

        let tick2 = ticker.receiver().recv_timeout(Duration::from_millis(200));
        assert!(tick2.is_ok());

        ticker.join();
    }

    #[test]
    fn test_ticker_shutdown() {
        let ticker = Ticker::spawn(Duration::from_millis(100));
        ticker.shutdown();
        thread::sleep(Duration::from_millis(50));
        ticker.join();
    }
}
