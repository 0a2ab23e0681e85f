//! Interrupt watcher: Dedicated thread polling for shutdown requests.
//!
//! The watcher is the only concurrency in the pipeline beyond the ticker.
//! It polls crossterm events and forwards an interrupt when the user asks
//! to stop (Ctrl+C, `q`, or Esc — under raw mode Ctrl+C arrives as a key
//! event rather than a signal). It never touches the frame or scene state;
//! it exists solely so the control loop can break and restore the terminal.

use crossbeam_channel::{bounded, Receiver, Sender};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Control events forwarded to the main loop.
#[derive(Debug, Clone)]
pub enum ControlEvent {
    /// The user requested shutdown.
    Interrupt,
    /// The event source failed; reported for logging only.
    Error(String),
}

/// Watcher thread handle.
pub struct InterruptWatcher {
    /// Handle to the watcher thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
    /// Receiver for control events.
    event_rx: Receiver<ControlEvent>,
}

impl InterruptWatcher {
    /// Spawn the watcher thread.
    ///
    /// # Panics
    ///
    /// Panics if the OS fails to spawn the watcher thread.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn(poll_timeout: Duration) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let (event_tx, event_rx) = bounded(4);

        let handle = thread::Builder::new()
            .name("phosphor-watch".to_string())
            .spawn(move || {
                Self::run_loop(&event_tx, &shutdown_clone, poll_timeout);
            })
            .expect("Failed to spawn watcher thread");

        Self {
            handle: Some(handle),
            shutdown,
            event_rx,
        }
    }

    /// Get a reference to the control-event receiver.
    #[inline]
    pub const fn receiver(&self) -> &Receiver<ControlEvent> {
        &self.event_rx
    }

    /// Signal the watcher to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the watcher thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main polling loop.
    fn run_loop(event_tx: &Sender<ControlEvent>, shutdown: &Arc<AtomicBool>, poll: Duration) {
        loop {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }

            match event::poll(poll) {
                Ok(true) => match event::read() {
                    Ok(ev) => {
                        if Self::is_interrupt(&ev)
                            && event_tx.send(ControlEvent::Interrupt).is_err()
                        {
                            break;
                        }
                    }
                    Err(e) => {
                        let _ = event_tx.send(ControlEvent::Error(e.to_string()));
                    }
                },
                Ok(false) => {}
                Err(e) => {
                    let _ = event_tx.send(ControlEvent::Error(e.to_string()));
                }
            }
        }
    }

    /// Whether an event asks for shutdown.
    fn is_interrupt(ev: &Event) -> bool {
        let Event::Key(key) = ev else {
            return false;
        };
        if key.kind != KeyEventKind::Press {
            return false;
        }
        match key.code {
            KeyCode::Char('c' | 'C') => key.modifiers.contains(KeyModifiers::CONTROL),
            KeyCode::Char('q' | 'Q') | KeyCode::Esc => true,
            _ => false,
        }
    }
}

impl Drop for InterruptWatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyEventState};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn test_interrupt_keys() {
        assert!(InterruptWatcher::is_interrupt(&key(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(InterruptWatcher::is_interrupt(&key(
            KeyCode::Char('q'),
            KeyModifiers::NONE
        )));
        assert!(InterruptWatcher::is_interrupt(&key(
            KeyCode::Esc,
            KeyModifiers::NONE
        )));
    }

    #[test]
    fn test_ordinary_keys_pass() {
        assert!(!InterruptWatcher::is_interrupt(&key(
            KeyCode::Char('c'),
            KeyModifiers::NONE
        )));
        assert!(!InterruptWatcher::is_interrupt(&key(
            KeyCode::Char('x'),
            KeyModifiers::NONE
        )));
        assert!(!InterruptWatcher::is_interrupt(&Event::FocusGained));
    }
}
