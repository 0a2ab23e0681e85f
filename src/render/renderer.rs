//! Renderer: Flushes composed frames to the terminal, one write per tick.

use super::encoder::encode_frame;
use super::output::OutputBuffer;
use crate::buffer::FrameBuffer;
use std::io::{self, Stdout, Write};
use std::time::Instant;

/// Render statistics for debugging/profiling.
#[derive(Debug, Clone, Default)]
pub struct RenderStats {
    /// Total frames flushed.
    pub frames: u64,
    /// Total bytes written to the terminal.
    pub bytes_written: u64,
    /// Average flush time in microseconds (smoothed).
    pub avg_flush_us: u64,
    /// Last flush time in microseconds.
    pub last_flush_us: u64,
}

/// Serializes frames and writes each as a single syscall.
///
/// The renderer owns a reusable [`OutputBuffer`] so steady-state flushing
/// performs no allocation. It is generic over the sink; production code
/// uses [`Renderer::stdout`], tests write into a `Vec<u8>`.
pub struct Renderer<W: Write> {
    /// Pre-allocated serialization buffer, reused across frames.
    out: OutputBuffer,
    /// Terminal (or test) sink.
    sink: W,
    /// Flush statistics.
    stats: RenderStats,
}

impl Renderer<Stdout> {
    /// Create a renderer writing to stdout.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Renderer<W> {
    /// Create a renderer over an arbitrary sink.
    pub fn new(sink: W) -> Self {
        Self {
            out: OutputBuffer::new(),
            sink,
            stats: RenderStats::default(),
        }
    }

    /// Serialize the frame and write it as one flush.
    ///
    /// The whole byte stream is accumulated before any byte reaches the
    /// sink, so no partial frame is ever visible.
    pub fn flush(&mut self, frame: &FrameBuffer) -> io::Result<()> {
        let start = Instant::now();

        self.out.clear();
        encode_frame(frame, &mut self.out);
        self.out.flush_to(&mut self.sink)?;

        let elapsed = start.elapsed();
        self.stats.frames += 1;
        self.stats.bytes_written += self.out.len() as u64;
        self.stats.last_flush_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        if self.stats.avg_flush_us == 0 {
            self.stats.avg_flush_us = self.stats.last_flush_us;
        } else {
            self.stats.avg_flush_us =
                (self.stats.avg_flush_us * 15 + self.stats.last_flush_us) / 16;
        }

        Ok(())
    }

    /// Flush statistics so far.
    pub const fn stats(&self) -> &RenderStats {
        &self.stats
    }

    /// Consume the renderer and return its sink.
    pub fn into_sink(self) -> W {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Color;

    #[test]
    fn test_flush_writes_whole_frame_once() {
        let mut renderer = Renderer::new(Vec::new());
        let mut frame = FrameBuffer::new(6, 3);
        frame.set(1, 1, b'@', Some(Color::new(201)), 1.0);

        renderer.flush(&frame).unwrap();
        assert_eq!(renderer.stats().frames, 1);

        let bytes = renderer.into_sink();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("\x1b[H"));
        assert!(text.contains('@'));
        assert_eq!(text.matches('\n').count(), 3);
    }

    #[test]
    fn test_repeated_flush_is_stable() {
        let mut renderer = Renderer::new(Vec::new());
        let mut frame = FrameBuffer::new(6, 3);
        frame.set(2, 0, b'#', Some(Color::new(45)), 1.0);

        renderer.flush(&frame).unwrap();
        renderer.flush(&frame).unwrap();

        let bytes = renderer.into_sink();
        let half = bytes.len() / 2;
        assert_eq!(&bytes[..half], &bytes[half..]);
    }
}
