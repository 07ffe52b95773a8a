//! 270-entry color palette.
//!
//! Layout: 0–15 ANSI, 16–231 6×6×6 cube, 232–255 grayscale ramp, 256+ named
//! semantic slots (foreground, background, cursor, dim variants). Cells store
//! symbolic `vte::ansi::Color` values; hosts resolve them here at display
//! time.

use vte::ansi::{Color, NamedColor};

pub use vte::ansi::Rgb;

/// Total palette entries: 256 indexed + 14 named semantic slots.
pub const NUM_COLORS: usize = 270;

/// Base ANSI colors (indices 0–15).
const ANSI_COLORS: [Rgb; 16] = [
    Rgb { r: 0x00, g: 0x00, b: 0x00 }, // 0  Black
    Rgb { r: 0xcd, g: 0x31, b: 0x31 }, // 1  Red
    Rgb { r: 0x0d, g: 0xbc, b: 0x79 }, // 2  Green
    Rgb { r: 0xe5, g: 0xe5, b: 0x10 }, // 3  Yellow
    Rgb { r: 0x24, g: 0x72, b: 0xc8 }, // 4  Blue
    Rgb { r: 0xbc, g: 0x3f, b: 0xbc }, // 5  Magenta
    Rgb { r: 0x11, g: 0xa8, b: 0xcd }, // 6  Cyan
    Rgb { r: 0xe5, g: 0xe5, b: 0xe5 }, // 7  White
    Rgb { r: 0x66, g: 0x66, b: 0x66 }, // 8  Bright Black
    Rgb { r: 0xf1, g: 0x4c, b: 0x4c }, // 9  Bright Red
    Rgb { r: 0x23, g: 0xd1, b: 0x8b }, // 10 Bright Green
    Rgb { r: 0xf5, g: 0xf5, b: 0x45 }, // 11 Bright Yellow
    Rgb { r: 0x3b, g: 0x8e, b: 0xea }, // 12 Bright Blue
    Rgb { r: 0xd6, g: 0x70, b: 0xd6 }, // 13 Bright Magenta
    Rgb { r: 0x29, g: 0xb8, b: 0xdb }, // 14 Bright Cyan
    Rgb { r: 0xff, g: 0xff, b: 0xff }, // 15 Bright White
];

/// Default foreground (ANSI 7).
const DEFAULT_FG: Rgb = Rgb { r: 0xe5, g: 0xe5, b: 0xe5 };
/// Default background (black).
const DEFAULT_BG: Rgb = Rgb { r: 0x00, g: 0x00, b: 0x00 };
/// Default cursor color (white).
const DEFAULT_CURSOR: Rgb = Rgb { r: 0xff, g: 0xff, b: 0xff };

/// Palette with indexed and named color slots.
///
/// Supports per-index overrides and reset-to-default, so a host can apply
/// OSC 4 / OSC 104 style recoloring without rebuilding the table.
#[derive(Debug, Clone)]
pub struct Palette {
    /// Live palette entries.
    colors: [Rgb; NUM_COLORS],
    /// Factory defaults for reset operations.
    defaults: [Rgb; NUM_COLORS],
}

impl Default for Palette {
    fn default() -> Self {
        let colors = build_default_palette();
        Self { colors, defaults: colors }
    }
}

impl Palette {
    /// Resolve a symbolic color to a concrete `Rgb` value.
    pub fn resolve(&self, color: Color) -> Rgb {
        match color {
            Color::Spec(rgb) => rgb,
            Color::Indexed(idx) => self.colors[idx as usize],
            Color::Named(name) => self.colors[name as usize],
        }
    }

    /// Override an indexed color.
    pub fn set_indexed(&mut self, index: usize, color: Rgb) {
        if index < NUM_COLORS {
            self.colors[index] = color;
        }
    }

    /// Reset an indexed color to its default.
    pub fn reset_indexed(&mut self, index: usize) {
        if index < NUM_COLORS {
            self.colors[index] = self.defaults[index];
        }
    }

    /// Default foreground color.
    pub fn foreground(&self) -> Rgb {
        self.colors[NamedColor::Foreground as usize]
    }

    /// Default background color.
    pub fn background(&self) -> Rgb {
        self.colors[NamedColor::Background as usize]
    }

    /// Cursor color.
    pub fn cursor_color(&self) -> Rgb {
        self.colors[NamedColor::Cursor as usize]
    }
}

/// Build the default xterm-256 palette.
fn build_default_palette() -> [Rgb; NUM_COLORS] {
    let mut colors = [Rgb { r: 0, g: 0, b: 0 }; NUM_COLORS];

    // 0–15: ANSI colors.
    colors[..16].copy_from_slice(&ANSI_COLORS);

    // 16–231: 6×6×6 color cube with levels 0, 95, 135, 175, 215, 255.
    for r in 0..6u8 {
        for g in 0..6u8 {
            for b in 0..6u8 {
                let idx = 16 + (r as usize * 36) + (g as usize * 6) + b as usize;
                colors[idx] = Rgb {
                    r: cube_level(r),
                    g: cube_level(g),
                    b: cube_level(b),
                };
            }
        }
    }

    // 232–255: grayscale ramp.
    for i in 0..24u8 {
        let v = 8 + i * 10;
        colors[232 + i as usize] = Rgb { r: v, g: v, b: v };
    }

    // Named semantic slots.
    colors[NamedColor::Foreground as usize] = DEFAULT_FG;
    colors[NamedColor::Background as usize] = DEFAULT_BG;
    colors[NamedColor::Cursor as usize] = DEFAULT_CURSOR;

    // Dim variants (2/3 brightness of ANSI 0–7).
    for i in 0..8 {
        colors[NamedColor::DimBlack as usize + i] = dim(colors[i]);
    }

    colors[NamedColor::BrightForeground as usize] = DEFAULT_FG;
    colors[NamedColor::DimForeground as usize] = dim(DEFAULT_FG);

    colors
}

fn cube_level(v: u8) -> u8 {
    if v == 0 { 0 } else { 55 + v * 40 }
}

/// Reduce a color to 2/3 brightness for dim variants.
fn dim(c: Rgb) -> Rgb {
    Rgb {
        r: (c.r as u16 * 2 / 3) as u8,
        g: (c.g as u16 * 2 / 3) as u8,
        b: (c.b as u16 * 2 / 3) as u8,
    }
}

#[cfg(test)]
mod tests;
