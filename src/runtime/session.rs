//! `TerminalSession`: Scoped acquisition of exclusive terminal control.
//!
//! Acquiring a session hides the cursor, optionally switches to the
//! alternate screen and clears it, and enables raw mode so interrupt keys
//! can be observed. Restoration is a single idempotent routine reached both
//! from `Drop` and from the interrupt path, so every exit funnels through
//! the same code.

use crossterm::{
    cursor, execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::debug;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

/// Session acquisition options.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Use the alternate screen buffer.
    pub alternate_screen: bool,
    /// Clear the screen after entering.
    pub clear_on_entry: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            alternate_screen: true,
            clear_on_entry: true,
        }
    }
}

/// Guaranteed-release handle over the terminal.
///
/// Dropping the session restores cursor visibility, SGR attributes, the
/// main screen and cooked mode. `restore` may also be called directly; it
/// runs at most once no matter how many paths reach it.
pub struct TerminalSession {
    config: SessionConfig,
    restored: AtomicBool,
}

impl TerminalSession {
    /// Acquire the terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode or the screen switches fail.
    pub fn acquire(config: SessionConfig) -> io::Result<Self> {
        terminal::enable_raw_mode()?;

        let mut stdout = io::stdout();
        if config.alternate_screen {
            execute!(stdout, EnterAlternateScreen)?;
        }
        execute!(stdout, cursor::Hide)?;
        if config.clear_on_entry {
            execute!(stdout, Clear(ClearType::All))?;
        }

        debug!("terminal session acquired");
        Ok(Self {
            config,
            restored: AtomicBool::new(false),
        })
    }

    /// Restore terminal state. Idempotent and safe to call from any exit
    /// path; each step is best-effort so one failure cannot strand the rest.
    pub fn restore(&self) {
        if self.restored.swap(true, Ordering::SeqCst) {
            return;
        }

        let mut stdout = io::stdout();
        let _ = stdout.write_all(b"\x1b[0m");
        let _ = execute!(stdout, cursor::Show);
        if self.config.alternate_screen {
            let _ = execute!(stdout, LeaveAlternateScreen);
        }
        let _ = terminal::disable_raw_mode();
        debug!("terminal session restored");
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.restore();
    }
}
