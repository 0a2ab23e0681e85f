//! Cell: The atomic unit of a composed frame.
//!
//! # Memory Layout
//!
//! The `Cell` struct is laid out for cache efficiency:
//! - 8 bytes total, allowing 8 cells per cache line (64 bytes)
//! - A single ASCII glyph byte; scenes draw exclusively from ASCII ramps
//! - Depth stored inline so occlusion tests never chase a pointer
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  Cell Layout (8 bytes)                       │
//! ├─────────┬─────────┬─────────┬───────┬────────┤
//! │  glyph  │  color  │  flags  │  pad  │ depth  │
//! │   u8    │   u8    │   u8    │  u8   │  f32   │
//! └─────────┴─────────┴─────────┴───────┴────────┘
//! ```

use bitflags::bitflags;

/// An ANSI 256-color palette index.
///
/// The renderer emits this as a `38;5;N` SGR sequence. Scenes define their
/// palettes as slices of these indices.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u8);

impl Color {
    /// Bright white, used as the hardcoded fallback when a palette is empty.
    pub const WHITE: Self = Self(231);

    /// Create a color from a 256-color palette index.
    #[inline]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// The raw palette index.
    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }
}

impl std::fmt::Debug for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ansi256({})", self.0)
    }
}

impl From<u8> for Color {
    #[inline]
    fn from(index: u8) -> Self {
        Self(index)
    }
}

bitflags! {
    /// Cell-level flags.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CellFlags: u8 {
        /// The color byte holds a valid palette index.
        const COLORED = 0b0000_0001;
    }
}

impl std::fmt::Debug for CellFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

/// A single frame cell.
///
/// This is the atomic unit of composition. Each cell carries:
/// - An ASCII glyph (a space marks the cell as unpainted)
/// - An optional ANSI 256-color index
/// - A depth value used for nearest-wins occlusion
///
/// A blank glyph is the sentinel for "unpainted": any write lands on an
/// unpainted cell, while painted cells only yield to strictly nearer writes.
#[repr(C)]
#[derive(Clone, Copy, PartialEq)]
pub struct Cell {
    /// The ASCII glyph byte.
    glyph: u8,
    /// ANSI 256-color index; only meaningful when `COLORED` is set.
    color: u8,
    /// Cell flags.
    flags: CellFlags,
    /// Padding to reach 8 bytes (power of 2, cache-friendly).
    _padding: u8,
    /// Distance from camera; `f32::INFINITY` when no depth was supplied.
    depth: f32,
}

// Compile-time assertion: Cell must be exactly 8 bytes
const _: () = assert!(
    std::mem::size_of::<Cell>() == 8,
    "Cell must be exactly 8 bytes for cache efficiency"
);

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Cell {
    /// An unpainted cell (space, no color, infinite depth).
    pub const EMPTY: Self = Self {
        glyph: b' ',
        color: 0,
        flags: CellFlags::empty(),
        _padding: 0,
        depth: f32::INFINITY,
    };

    /// Create a painted cell.
    #[inline]
    pub fn new(glyph: u8, color: Option<Color>, depth: f32) -> Self {
        let (color, flags) = match color {
            Some(c) => (c.0, CellFlags::COLORED),
            None => (0, CellFlags::empty()),
        };
        Self {
            glyph,
            color,
            flags,
            _padding: 0,
            depth,
        }
    }

    /// The glyph byte; a `0` glyph is serialized as a space.
    #[inline]
    pub const fn glyph(&self) -> u8 {
        self.glyph
    }

    /// The color, if one was written.
    #[inline]
    pub const fn color(&self) -> Option<Color> {
        if self.flags.contains(CellFlags::COLORED) {
            Some(Color(self.color))
        } else {
            None
        }
    }

    /// The depth of the winning write at this cell.
    #[inline]
    pub const fn depth(&self) -> f32 {
        self.depth
    }

    /// Whether a non-space glyph has claimed this cell for the frame.
    #[inline]
    pub const fn is_painted(&self) -> bool {
        self.glyph != b' '
    }

    /// Reset the cell to the unpainted sentinel.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::EMPTY;
    }
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cell")
            .field("glyph", &char::from(self.glyph))
            .field("color", &self.color())
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_size() {
        assert_eq!(std::mem::size_of::<Cell>(), 8);
    }

    #[test]
    fn test_empty_is_unpainted() {
        assert!(!Cell::EMPTY.is_painted());
        assert_eq!(Cell::EMPTY.glyph(), b' ');
        assert_eq!(Cell::EMPTY.color(), None);
        assert!(Cell::EMPTY.depth().is_infinite());
    }

    #[test]
    fn test_cell_new_colored() {
        let cell = Cell::new(b'X', Some(Color::new(45)), 1.5);
        assert!(cell.is_painted());
        assert_eq!(cell.glyph(), b'X');
        assert_eq!(cell.color(), Some(Color::new(45)));
        assert_eq!(cell.depth(), 1.5);
    }

    #[test]
    fn test_cell_new_uncolored() {
        let cell = Cell::new(b'*', None, f32::INFINITY);
        assert_eq!(cell.color(), None);
    }

    #[test]
    fn test_space_write_stays_unpainted() {
        // A colored space (sky washes) must not claim the cell.
        let cell = Cell::new(b' ', Some(Color::new(19)), f32::INFINITY);
        assert!(!cell.is_painted());
        assert_eq!(cell.color(), Some(Color::new(19)));
    }

    #[test]
    fn test_cell_reset() {
        let mut cell = Cell::new(b'X', Some(Color::new(45)), 1.0);
        cell.reset();
        assert_eq!(cell, Cell::EMPTY);
    }

    #[test]
    fn test_color_from_index() {
        let color: Color = 81.into();
        assert_eq!(color.index(), 81);
    }
}
