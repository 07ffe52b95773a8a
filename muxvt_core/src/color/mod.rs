//! Color palette for terminal emulation.

mod palette;

pub use palette::{Palette, NUM_COLORS};
