//! `OutputBuffer`: Single-syscall output buffer for ANSI sequences.

use crate::buffer::Color;
use std::io::Write;

/// Pre-allocated buffer for building ANSI escape sequences.
///
/// A whole frame is accumulated here, then flushed in a single `write()`
/// syscall so no partial frame ever reaches the terminal device.
pub struct OutputBuffer {
    data: Vec<u8>,
}

impl OutputBuffer {
    /// Create a new output buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Create a buffer sized for a typical frame (16KB).
    pub fn new() -> Self {
        Self::with_capacity(16_384)
    }

    /// Clear the buffer for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Get the buffer contents.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Get the buffer length.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write raw bytes.
    #[inline]
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Push a single byte.
    #[inline]
    pub fn push(&mut self, byte: u8) {
        self.data.push(byte);
    }

    /// Move cursor to the home position (1,1).
    #[inline]
    pub fn cursor_home(&mut self) {
        self.data.extend_from_slice(b"\x1b[H");
    }

    /// Hide cursor.
    #[inline]
    pub fn cursor_hide(&mut self) {
        self.data.extend_from_slice(b"\x1b[?25l");
    }

    /// Show cursor.
    #[inline]
    pub fn cursor_show(&mut self) {
        self.data.extend_from_slice(b"\x1b[?25h");
    }

    /// Set foreground color (256-color palette).
    #[inline]
    pub fn set_fg(&mut self, color: Color) {
        let _ = write!(self.data, "\x1b[38;5;{}m", color.index());
    }

    /// Reset all attributes.
    #[inline]
    pub fn reset_attrs(&mut self) {
        self.data.extend_from_slice(b"\x1b[0m");
    }

    /// Clear the entire screen.
    #[inline]
    pub fn clear_screen(&mut self) {
        self.data.extend_from_slice(b"\x1b[2J");
    }

    /// Flush to a writer in a single syscall.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn flush_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.data)?;
        writer.flush()
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_sequences() {
        let mut out = OutputBuffer::new();
        out.cursor_home();
        assert_eq!(out.as_bytes(), b"\x1b[H");

        out.clear();
        out.set_fg(Color::new(45));
        assert_eq!(out.as_bytes(), b"\x1b[38;5;45m");

        out.clear();
        out.reset_attrs();
        assert_eq!(out.as_bytes(), b"\x1b[0m");
    }

    #[test]
    fn test_flush_to_writer() {
        let mut out = OutputBuffer::new();
        out.write_raw(b"hello");
        let mut sink = Vec::new();
        out.flush_to(&mut sink).unwrap();
        assert_eq!(sink, b"hello");
    }
}
