//! Terminal cursor state and attribute template.

use vte::ansi::{Color, NamedColor};

use crate::cell::{Cell, CellFlags};

/// Cursor position plus the attribute template applied to new cells.
///
/// `col` may transiently equal the grid width after a write in the last
/// column (pending wrap); every cursor *movement* operation clamps it back
/// into range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    /// Row position (0-based, into visible rows).
    pub row: usize,
    /// Column position (0-based).
    pub col: usize,
    /// Attribute template for new cells; SGR handling mutates this directly.
    pub template: Cell,
}

impl Cursor {
    /// Reset the attribute template to default colors and flags.
    pub fn reset_attrs(&mut self) {
        self.template.fg = Color::Named(NamedColor::Foreground);
        self.template.bg = Color::Named(NamedColor::Background);
        self.template.flags = CellFlags::empty();
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            row: 0,
            col: 0,
            template: Cell::default(),
        }
    }
}
