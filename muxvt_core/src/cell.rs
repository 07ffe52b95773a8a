//! Terminal cell types.
//!
//! A `Cell` is one character position in the grid. Wide graphemes occupy a
//! leader cell (`WIDE_CHAR`) followed by a continuation cell
//! (`WIDE_CHAR_SPACER`); the pair always carries the same colors.

use bitflags::bitflags;
use unicode_width::UnicodeWidthChar;
use vte::ansi::{Color, NamedColor};

bitflags! {
    /// Per-cell attribute flags (SGR and structural).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CellFlags: u16 {
        const BOLD             = 1;
        const DIM              = 1 << 1;
        const ITALIC           = 1 << 2;
        const UNDERLINE        = 1 << 3;
        const BLINK            = 1 << 4;
        const INVERSE          = 1 << 5;
        const HIDDEN           = 1 << 6;
        const STRIKETHROUGH    = 1 << 7;
        /// Leading half of a wide grapheme.
        const WIDE_CHAR        = 1 << 8;
        /// Trailing (continuation) half of a wide grapheme.
        const WIDE_CHAR_SPACER = 1 << 9;
        /// The line soft-wrapped after this cell.
        const WRAPLINE         = 1 << 10;

        /// All SGR attribute bits, excluding structural flags.
        const ATTRS = Self::BOLD.bits()
            | Self::DIM.bits()
            | Self::ITALIC.bits()
            | Self::UNDERLINE.bits()
            | Self::BLINK.bits()
            | Self::INVERSE.bits()
            | Self::HIDDEN.bits()
            | Self::STRIKETHROUGH.bits();
    }
}

impl Default for CellFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// One character position in the terminal grid.
///
/// A `'\0'` character renders as a space. Fields are small enough that the
/// whole cell stays copy-cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// The character stored in this cell.
    pub ch: char,
    /// Foreground color (deferred palette resolution).
    pub fg: Color,
    /// Background color (deferred palette resolution).
    pub bg: Color,
    /// Attribute flags.
    pub flags: CellFlags,
}

const _: () = assert!(size_of::<Cell>() <= 16);

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::Named(NamedColor::Foreground),
            bg: Color::Named(NamedColor::Background),
            flags: CellFlags::empty(),
        }
    }
}

impl From<Color> for Cell {
    /// Blank cell carrying only a background color (BCE fill template).
    fn from(bg: Color) -> Self {
        Self { bg, ..Self::default() }
    }
}

impl Cell {
    /// Reset this cell to match the given template.
    pub fn reset(&mut self, template: &Self) {
        self.ch = template.ch;
        self.fg = template.fg;
        self.bg = template.bg;
        self.flags = template.flags;
    }

    /// Returns `true` if this cell is visually empty (blank, default colors,
    /// no flags).
    pub fn is_empty(&self) -> bool {
        (self.ch == ' ' || self.ch == '\0')
            && self.fg == Color::Named(NamedColor::Foreground)
            && self.bg == Color::Named(NamedColor::Background)
            && self.flags.is_empty()
    }

    /// Display width of this cell's character.
    ///
    /// Respects the structural flags and falls back to `unicode-width`.
    pub fn width(&self) -> usize {
        if self.flags.contains(CellFlags::WIDE_CHAR) {
            return 2;
        }
        if self.flags.contains(CellFlags::WIDE_CHAR_SPACER) {
            return 0;
        }
        UnicodeWidthChar::width(self.ch).unwrap_or(1)
    }

    /// The renderable style of this cell (structural flags masked off).
    pub fn style(&self) -> Style {
        Style {
            fg: self.fg,
            bg: self.bg,
            flags: self.flags & CellFlags::ATTRS,
        }
    }
}

/// A color pair plus attribute bits, compared by value.
///
/// This is what the renderer diffs between adjacent cells to emit minimal
/// SGR transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
    pub flags: CellFlags,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fg: Color::Named(NamedColor::Foreground),
            bg: Color::Named(NamedColor::Background),
            flags: CellFlags::empty(),
        }
    }
}

impl Style {
    /// Whether this style matches the post-`ESC[0m` terminal state.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}
