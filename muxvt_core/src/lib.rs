//! Headless terminal emulation core.
//!
//! This crate is the in-memory model of a VT100/xterm-compatible terminal:
//! it consumes the raw byte stream a PTY-attached program produces and
//! maintains a grid of styled cells, bounded scrollback history, cursor and
//! mode state. Frames come back out as ANSI-encoded strings (with per-line
//! caching and delta SGR encoding) or as cell snapshots suitable for
//! lock-free display. It contains no PTY, GUI, or event-loop code.

#![deny(unsafe_code)]

pub mod canvas;
pub mod cell;
pub mod color;
pub mod grid;
pub mod render;
pub mod screen;

pub use canvas::Canvas;
pub use cell::{Cell, CellFlags, Style};
pub use color::Palette;
pub use grid::{Cursor, DirtyTracker, EraseMode, Grid, Row, MAX_SCROLLBACK};
pub use screen::{Screen, Selection, Snapshot, SnapshotSelection, TermMode};
