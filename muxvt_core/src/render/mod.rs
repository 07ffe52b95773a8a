//! ANSI frame emission.
//!
//! Three paths share one per-line encoder: a cached live path that only
//! re-encodes dirty lines, a full pass over the frozen frame while a
//! synchronized-output window is open, and a full pass composing scrollback
//! when the view is scrolled into history. Every line begins with `ESC[0m`,
//! the frame ends with `ESC[0m`, and lines are joined by newlines with no
//! trailing newline.

pub mod sgr;

use crate::cell::{Cell, CellFlags, Style};
use crate::screen::Screen;

/// Per-line ANSI cache for the live render path.
#[derive(Debug, Clone)]
pub(crate) struct RenderCache {
    lines: Vec<String>,
    valid: bool,
    cursor_row: usize,
    cursor_col: usize,
    cursor_shown: bool,
}

impl RenderCache {
    pub(crate) fn new() -> Self {
        Self {
            lines: Vec::new(),
            valid: false,
            cursor_row: 0,
            cursor_col: 0,
            cursor_shown: false,
        }
    }

    pub(crate) fn invalidate(&mut self) {
        self.valid = false;
    }
}

/// Encode one row of cells as ANSI, left to right.
///
/// Continuation cells are skipped (the wide leader already advanced the
/// terminal two columns). Blank cells never carry underline, so cleared
/// underlined rows do not leave scanline artifacts. `rev` reports whether
/// the cursor/selection overlay inverts a column; overlapping overlays
/// cancel out before this is called.
pub(crate) fn emit_cells(cells: &[Cell], cols: usize, mut rev: impl FnMut(usize) -> bool) -> String {
    let mut out = String::with_capacity(cols + 16);
    out.push_str("\x1b[0m");
    let mut prev = Style::default();
    let len = cells.len().min(cols);
    let mut skip_next = false;

    for (col, cell) in cells.iter().enumerate().take(len) {
        // The column after a wide leader is covered by the glyph itself,
        // whether or not it still carries the spacer flag.
        if skip_next {
            skip_next = false;
            continue;
        }
        if cell.flags.contains(CellFlags::WIDE_CHAR_SPACER) {
            continue;
        }
        if cell.flags.contains(CellFlags::WIDE_CHAR) {
            skip_next = true;
        }
        let mut style = cell.style();
        let blank = cell.ch == ' ' || cell.ch == '\0';
        if blank {
            style.flags.remove(CellFlags::UNDERLINE);
        }
        if rev(col) {
            style.flags.toggle(CellFlags::INVERSE);
        }
        if style != prev {
            out.push_str(&sgr::style_to_delta_ansi(&prev, &style));
            prev = style;
        }
        out.push(if cell.ch == '\0' { ' ' } else { cell.ch });
    }

    if len < cols {
        if !prev.is_default() {
            out.push_str(&sgr::style_to_delta_ansi(&prev, &Style::default()));
        }
        for _ in len..cols {
            out.push(' ');
        }
    }
    out
}

fn join_frame(lines: &[String]) -> String {
    let mut out = String::with_capacity(lines.iter().map(String::len).sum::<usize>() + lines.len() + 4);
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(line);
    }
    out.push_str("\x1b[0m");
    out
}

impl Screen {
    /// Render the full screen as an ANSI string.
    ///
    /// The live path reuses cached per-line strings for clean rows and
    /// consumes the dirty flags; a sync window or a scrolled view forces
    /// a full pass.
    pub fn render(&mut self) -> String {
        let cols = self.cols();
        let lines = self.lines();
        let selection = self.selection().copied();

        // Sync window: a frozen frame, rendered in full.
        if let Some(sync) = self.sync_frame() {
            let base = sync.scrollback_len;
            let mut rendered = Vec::with_capacity(lines);
            for (y, row) in sync.rows.iter().enumerate() {
                let cursor_here = sync.cursor_visible && y == sync.cursor_row;
                let cursor_col = sync.cursor_col;
                rendered.push(emit_cells(row.as_slice(), cols, |x| {
                    let mut rev = cursor_here && x == cursor_col;
                    if let Some(sel) = selection {
                        if sel.contains(base + y, x) {
                            rev = !rev;
                        }
                    }
                    rev
                }));
            }
            return join_frame(&rendered);
        }

        // Scrolled into history: compose from scrollback, no cursor.
        if self.view_offset() > 0 && !self.alt_screen_active() {
            let base = self.screen_y_to_absolute_line(0);
            let grid = self.grid();
            let mut rendered = Vec::with_capacity(lines);
            for y in 0..lines {
                let row = grid.visible_row(y);
                rendered.push(emit_cells(row.as_slice(), cols, |x| {
                    selection.is_some_and(|sel| sel.contains(base + y, x))
                }));
            }
            return join_frame(&rendered);
        }

        // Live view: cached per-line emit with dirty reuse.
        let show_cursor = !self.cursor_hidden();
        let cursor_row = self.cursor_row();
        let cursor_col = self.cursor_col();
        let base = self.screen_y_to_absolute_line(0);

        let mut cached = std::mem::take(&mut self.cache.lines);
        let was_valid = self.cache.valid && cached.len() == lines;
        if !was_valid {
            cached = vec![String::new(); lines];
        }
        let (dirty, all_dirty) = self.dirty_lines();
        let cursor_changed = self.cache.cursor_row != cursor_row
            || self.cache.cursor_col != cursor_col
            || self.cache.cursor_shown != show_cursor;
        let old_cursor_row = self.cache.cursor_row;

        for (y, slot) in cached.iter_mut().enumerate() {
            let needs_emit = !was_valid
                || all_dirty
                || dirty[y]
                || (cursor_changed && (y == old_cursor_row || y == cursor_row));
            if !needs_emit {
                continue;
            }
            let cursor_here = show_cursor && y == cursor_row;
            let row = self.grid().row(y);
            *slot = emit_cells(row.as_slice(), cols, |x| {
                let mut rev = cursor_here && x == cursor_col;
                if let Some(sel) = selection {
                    if sel.contains(base + y, x) {
                        rev = !rev;
                    }
                }
                rev
            });
        }

        let frame = join_frame(&cached);
        self.cache.lines = cached;
        self.cache.valid = true;
        self.cache.cursor_row = cursor_row;
        self.cache.cursor_col = cursor_col;
        self.cache.cursor_shown = show_cursor;
        self.grid_mut().dirty_mut().clear();
        frame
    }
}
