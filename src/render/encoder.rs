//! Frame encoder: Serialize a composed frame into one ANSI byte stream.
//!
//! The wire contract per frame is:
//! 1. One cursor-home escape
//! 2. For each row, `[color escape]* glyph` for exactly `width` glyphs,
//!    followed by a full SGR reset and a newline
//! 3. Nothing else — no other control sequences are interleaved mid-frame
//!
//! Color escapes are only emitted when the cell's color differs from the
//! last color emitted in the current row; runs of identically colored cells
//! cost a single escape. Uncolored cells emit nothing and inherit whatever
//! attribute is active, which is invisible in practice since unpainted
//! cells are spaces.

use super::output::OutputBuffer;
use crate::buffer::{Color, FrameBuffer};

/// Serialize one frame into the output buffer.
///
/// The output is a deterministic function of the frame contents: encoding
/// the same frame twice produces byte-identical streams.
pub fn encode_frame(frame: &FrameBuffer, out: &mut OutputBuffer) {
    out.cursor_home();

    for row in frame.rows() {
        // The trailing reset of the previous row cleared the SGR state.
        let mut active: Option<Color> = None;

        for cell in row {
            if let Some(color) = cell.color() {
                if active != Some(color) {
                    out.set_fg(color);
                    active = Some(color);
                }
            }
            let glyph = cell.glyph();
            out.push(if glyph == 0 { b' ' } else { glyph });
        }

        out.reset_attrs();
        out.push(b'\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_to_vec(frame: &FrameBuffer) -> Vec<u8> {
        let mut out = OutputBuffer::new();
        encode_frame(frame, &mut out);
        out.as_bytes().to_vec()
    }

    #[test]
    fn test_cleared_frame_is_blank_rows() {
        let mut frame = FrameBuffer::new(10, 5);
        frame.clear();
        let bytes = encode_to_vec(&frame);
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.starts_with("\x1b[H"));
        // No color escapes anywhere in a cleared frame.
        assert!(!text.contains("\x1b[38;5;"));

        let rows: Vec<&str> = text
            .trim_start_matches("\x1b[H")
            .split('\n')
            .filter(|r| !r.is_empty())
            .collect();
        assert_eq!(rows.len(), 5);
        for row in rows {
            assert_eq!(row, format!("{}\x1b[0m", " ".repeat(10)));
        }
    }

    #[test]
    fn test_identical_color_run_emits_one_escape() {
        let mut frame = FrameBuffer::new(8, 1);
        let color = Some(Color::new(81));
        frame.set(0, 0, b'a', color, 1.0);
        frame.set(1, 0, b'b', color, 1.0);
        frame.set(2, 0, b'c', color, 1.0);

        let text = String::from_utf8(encode_to_vec(&frame)).unwrap();
        assert_eq!(text.matches("\x1b[38;5;81m").count(), 1);
        assert!(text.contains("abc"));
    }

    #[test]
    fn test_color_change_emits_new_escape() {
        let mut frame = FrameBuffer::new(8, 1);
        frame.set(0, 0, b'a', Some(Color::new(81)), 1.0);
        frame.set(1, 0, b'b', Some(Color::new(201)), 1.0);
        frame.set(2, 0, b'c', Some(Color::new(81)), 1.0);

        let text = String::from_utf8(encode_to_vec(&frame)).unwrap();
        assert_eq!(text.matches("\x1b[38;5;81m").count(), 2);
        assert_eq!(text.matches("\x1b[38;5;201m").count(), 1);
    }

    #[test]
    fn test_color_state_resets_at_row_boundary() {
        let mut frame = FrameBuffer::new(4, 2);
        let color = Some(Color::new(45));
        frame.set(3, 0, b'x', color, 1.0);
        frame.set(0, 1, b'y', color, 1.0);

        // The row-trailing SGR reset discards the color, so the second row
        // must re-emit it even though it matches the previous cell's.
        let text = String::from_utf8(encode_to_vec(&frame)).unwrap();
        assert_eq!(text.matches("\x1b[38;5;45m").count(), 2);
    }

    #[test]
    fn test_rows_end_with_reset_and_newline() {
        let frame = FrameBuffer::new(3, 2);
        let text = String::from_utf8(encode_to_vec(&frame)).unwrap();
        assert_eq!(text.matches("\x1b[0m\n").count(), 2);
        assert!(text.ends_with("\x1b[0m\n"));
    }

    #[test]
    fn test_encoding_is_idempotent() {
        let mut frame = FrameBuffer::new(12, 6);
        frame.set(2, 2, b'X', Some(Color::new(45)), 1.0);
        frame.set(3, 2, b'Y', Some(Color::new(81)), 0.5);
        frame.set_if_empty(11, 5, b'.', None);

        let first = encode_to_vec(&frame);
        let second = encode_to_vec(&frame);
        assert_eq!(first, second);
    }

    #[test]
    fn test_depth_winner_appears_in_stream() {
        let mut frame = FrameBuffer::new(10, 5);
        frame.clear();
        frame.set(2, 2, b'X', Some(Color::new(45)), 1.0);
        frame.set(2, 2, b'Y', Some(Color::new(45)), 2.0);

        let text = String::from_utf8(encode_to_vec(&frame)).unwrap();
        assert!(text.contains('X'));
        assert!(!text.contains('Y'));
    }
}
