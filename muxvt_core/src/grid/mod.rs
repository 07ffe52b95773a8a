//! Terminal grid: 2D cell storage with cursor, scrollback, and dirty
//! tracking.
//!
//! One `Grid` models one screen buffer. The primary screen owns a bounded
//! scrollback history; the alternate screen is constructed with a zero
//! scrollback cap and therefore never captures history.

pub mod cursor;
pub mod dirty;
pub mod editing;
pub mod navigation;
pub mod row;
pub mod scroll;

use std::collections::VecDeque;

use log::debug;

use crate::cell::Cell;

pub use cursor::Cursor;
pub use dirty::DirtyTracker;
pub use editing::EraseMode;
pub use row::Row;

/// Maximum scrollback lines retained by the primary screen.
pub const MAX_SCROLLBACK: usize = 10_000;

/// Tab stop interval in columns.
const TAB_INTERVAL: usize = 8;

/// The 2D terminal cell grid.
///
/// Stores visible rows indexed `0..lines` (top to bottom), a cursor with
/// its attribute template, the DECSTBM scroll region (half-open), tab
/// stops, scrollback history, the view offset into that history, and
/// per-line dirty flags.
#[derive(Debug, Clone)]
pub struct Grid {
    /// Visible rows (index 0 = top of screen).
    rows: Vec<Row>,
    /// Number of columns.
    cols: usize,
    /// Number of visible lines.
    lines: usize,
    /// Current cursor position and template.
    pub cursor: Cursor,
    /// DECSC/DECRC saved cursor.
    saved_cursor: Option<Cursor>,
    /// Scroll region top (inclusive).
    scroll_top: usize,
    /// Scroll region bottom (exclusive).
    scroll_bottom: usize,
    /// Tab stop at each column (true = stop).
    tab_stops: Vec<bool>,
    /// Rows that scrolled off the top, oldest first.
    scrollback: VecDeque<Row>,
    /// Maximum rows retained in scrollback (0 disables capture).
    max_scrollback: usize,
    /// How many rows the view is scrolled back into history (0 = live).
    display_offset: usize,
    /// Scrollback trimming is deferred while a sync window is open.
    trim_paused: bool,
    /// Total rows ever trimmed from the front of scrollback.
    trimmed_total: u64,
    /// Bumped by every content scroll; observers use it to invalidate
    /// selections.
    scroll_count: u64,
    /// Tracks which rows have changed since last frame.
    dirty: DirtyTracker,
}

impl Grid {
    /// Create a grid with the default scrollback cap.
    pub fn new(cols: usize, lines: usize) -> Self {
        Self::with_max_scrollback(cols, lines, MAX_SCROLLBACK)
    }

    /// Create a grid with an explicit scrollback cap (0 disables capture).
    pub fn with_max_scrollback(cols: usize, lines: usize, max_scrollback: usize) -> Self {
        let cols = cols.max(1);
        let lines = lines.max(1);
        let rows = (0..lines).map(|_| Row::new(cols)).collect();

        Self {
            rows,
            cols,
            lines,
            cursor: Cursor::default(),
            saved_cursor: None,
            scroll_top: 0,
            scroll_bottom: lines,
            tab_stops: Self::build_tab_stops(cols),
            scrollback: VecDeque::new(),
            max_scrollback,
            display_offset: 0,
            trim_paused: false,
            trimmed_total: 0,
            scroll_count: 0,
            dirty: DirtyTracker::new(lines),
        }
    }

    fn build_tab_stops(cols: usize) -> Vec<bool> {
        (0..cols).map(|c| c % TAB_INTERVAL == 0 && c != 0).collect()
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of visible lines.
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// A visible row by index.
    pub fn row(&self, line: usize) -> &Row {
        &self.rows[line]
    }

    /// A visible row by index, mutably. The caller marks dirt.
    pub fn row_mut(&mut self, line: usize) -> &mut Row {
        &mut self.rows[line]
    }

    /// Scroll region top (inclusive).
    pub fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    /// Scroll region bottom (exclusive).
    pub fn scroll_bottom(&self) -> usize {
        self.scroll_bottom
    }

    /// Number of rows currently held in scrollback.
    pub fn scrollback_len(&self) -> usize {
        self.scrollback.len()
    }

    /// A scrollback row by absolute index (0 = oldest).
    pub fn scrollback_row(&self, index: usize) -> Option<&Row> {
        self.scrollback.get(index)
    }

    /// How many rows the view is scrolled back into history (0 = live).
    pub fn display_offset(&self) -> usize {
        self.display_offset
    }

    /// Immutable reference to the dirty tracker.
    pub fn dirty(&self) -> &DirtyTracker {
        &self.dirty
    }

    /// Mutable reference to the dirty tracker.
    pub fn dirty_mut(&mut self) -> &mut DirtyTracker {
        &mut self.dirty
    }

    /// Total rows ever trimmed off the front of scrollback.
    pub fn trimmed_total(&self) -> u64 {
        self.trimmed_total
    }

    /// Number of content scrolls performed so far.
    pub fn scroll_count(&self) -> u64 {
        self.scroll_count
    }

    /// The row at visible position `line` under the current view offset.
    ///
    /// With a non-zero offset the top of the viewport is sourced from
    /// scrollback history.
    pub fn visible_row(&self, line: usize) -> &Row {
        if self.display_offset == 0 {
            return &self.rows[line];
        }
        if line < self.display_offset {
            let sb_idx = self.scrollback.len() + line - self.display_offset;
            if let Some(row) = self.scrollback.get(sb_idx) {
                return row;
            }
            // Offset ran past history (clamped elsewhere); show the oldest.
            if let Some(row) = self.scrollback.front() {
                return row;
            }
            return &self.rows[0];
        }
        &self.rows[line - self.display_offset]
    }

    /// Convert a viewport line to an absolute line index (scrollback row 0
    /// = oldest).
    pub fn viewport_to_absolute(&self, line: usize) -> usize {
        self.scrollback.len().saturating_sub(self.display_offset) + line
    }

    /// Access a row by absolute line index.
    pub fn absolute_row(&self, abs: usize) -> Option<&Row> {
        let sb_len = self.scrollback.len();
        if abs < sb_len {
            self.scrollback.get(abs)
        } else {
            self.rows.get(abs - sb_len)
        }
    }

    /// Set the view offset, clamped to the available history.
    ///
    /// Returns `true` if the offset changed.
    pub fn set_display_offset(&mut self, offset: usize) -> bool {
        let target = offset.min(self.scrollback.len());
        if target == self.display_offset {
            return false;
        }
        self.display_offset = target;
        self.dirty.mark_all();
        true
    }

    /// Adjust the view offset (positive = further into history).
    ///
    /// Returns `true` if the offset changed.
    pub fn scroll_display(&mut self, delta: isize) -> bool {
        let current = self.display_offset as isize;
        let target = (current + delta).clamp(0, self.scrollback.len() as isize) as usize;
        self.set_display_offset(target)
    }

    /// Append a departing row to scrollback, keeping the viewport anchor.
    pub(super) fn push_scrollback(&mut self, row: Row) {
        if self.max_scrollback == 0 {
            return;
        }
        self.scrollback.push_back(row);
        // Keep a scrolled-back viewport anchored on the same absolute line.
        if self.display_offset > 0 {
            self.display_offset += 1;
        }
    }

    /// Defer or resume scrollback trimming (synchronized-output windows).
    pub fn pause_trim(&mut self, paused: bool) {
        self.trim_paused = paused;
    }

    /// Drop history beyond the cap. Returns the number of rows removed.
    pub fn trim_scrollback(&mut self) -> usize {
        if self.trim_paused {
            return 0;
        }
        let mut trimmed = 0;
        while self.scrollback.len() > self.max_scrollback {
            self.scrollback.pop_front();
            trimmed += 1;
        }
        if trimmed > 0 {
            self.trimmed_total += trimmed as u64;
            self.display_offset = self.display_offset.min(self.scrollback.len());
        }
        trimmed
    }

    /// Empty the scrollback entirely (ED 3).
    pub fn clear_scrollback(&mut self) {
        let dropped = self.scrollback.len();
        if dropped > 0 {
            self.trimmed_total += dropped as u64;
            self.scrollback.clear();
        }
        if self.display_offset > 0 {
            self.display_offset = 0;
            self.dirty.mark_all();
        }
    }

    /// Prepend restored history rows (oldest first) in front of the
    /// existing scrollback.
    pub fn prepend_scrollback_rows(&mut self, rows: Vec<Row>) {
        for row in rows.into_iter().rev() {
            self.scrollback.push_front(row);
        }
    }

    /// Iterate scrollback rows oldest first.
    pub fn scrollback_rows(&self) -> impl Iterator<Item = &Row> + '_ {
        self.scrollback.iter()
    }

    /// Index of the last visible row with content, if any.
    pub fn last_used_row(&self) -> Option<usize> {
        self.rows.iter().rposition(|r| r.occ() > 0)
    }

    /// Blank every visible cell and home the cursor.
    pub fn clear_all(&mut self) {
        let template = Cell::default();
        for row in &mut self.rows {
            row.reset(&template);
        }
        self.cursor.row = 0;
        self.cursor.col = 0;
        self.dirty.mark_all();
    }

    /// RIS-style reset: blank the screen, home the cursor, restore the
    /// default region and tab stops. Scrollback survives.
    pub fn reset_state(&mut self) {
        self.clear_all();
        self.cursor = Cursor::default();
        self.saved_cursor = None;
        self.scroll_top = 0;
        self.scroll_bottom = self.lines;
        self.tab_stops = Self::build_tab_stops(self.cols);
        self.display_offset = 0;
        self.dirty.mark_all();
    }

    /// Resize the grid, preserving content.
    ///
    /// Shrinking the height pushes the top rows into scrollback (when this
    /// grid captures history); growing it restores rows from scrollback
    /// while the view is live. Rows are rebuilt to the new width.
    #[allow(clippy::else_if_without_else, reason = "Unchanged height needs no branch")]
    pub fn resize(&mut self, cols: usize, lines: usize) {
        let cols = cols.max(1);
        let lines = lines.max(1);
        if cols == self.cols && lines == self.lines {
            return;
        }
        debug!("grid resize {}x{} -> {cols}x{lines}", self.cols, self.lines);

        let region_was_full = self.scroll_top == 0 && self.scroll_bottom == self.lines;

        if lines < self.lines {
            let excess = self.lines - lines;
            if self.max_scrollback > 0 {
                for _ in 0..excess {
                    let row = self.rows.remove(0);
                    self.push_scrollback(row);
                }
            } else {
                self.rows.truncate(lines);
            }
            self.cursor.row = self.cursor.row.saturating_sub(excess);
            self.trim_scrollback();
        } else if lines > self.lines {
            let mut missing = lines - self.lines;
            if self.max_scrollback > 0 && self.display_offset == 0 {
                while missing > 0 {
                    let Some(row) = self.scrollback.pop_back() else {
                        break;
                    };
                    self.rows.insert(0, row);
                    self.cursor.row += 1;
                    missing -= 1;
                }
            }
            for _ in 0..missing {
                self.rows.push(Row::new(cols));
            }
        }

        self.cols = cols;
        self.lines = lines;
        for row in &mut self.rows {
            row.resize(cols);
        }
        for line in 0..lines {
            self.normalize_line(line);
        }

        if region_was_full {
            self.scroll_top = 0;
            self.scroll_bottom = lines;
        } else {
            self.scroll_top = self.scroll_top.min(lines.saturating_sub(1));
            self.scroll_bottom = self.scroll_bottom.min(lines);
            if self.scroll_top + 1 >= self.scroll_bottom {
                self.scroll_top = 0;
                self.scroll_bottom = lines;
            }
        }

        self.tab_stops = Self::build_tab_stops(cols);
        self.cursor.row = self.cursor.row.min(lines - 1);
        self.cursor.col = self.cursor.col.min(cols - 1);
        if let Some(saved) = &mut self.saved_cursor {
            saved.row = saved.row.min(lines - 1);
            saved.col = saved.col.min(cols - 1);
        }
        self.display_offset = self.display_offset.min(self.scrollback.len());
        self.dirty.resize(lines);
    }

    pub(super) fn tab_stops(&self) -> &[bool] {
        &self.tab_stops
    }

    pub(super) fn tab_stops_mut(&mut self) -> &mut [bool] {
        &mut self.tab_stops
    }

    pub(super) fn rows_mut(&mut self) -> &mut Vec<Row> {
        &mut self.rows
    }

    pub(super) fn set_scroll_region_raw(&mut self, top: usize, bottom: usize) {
        self.scroll_top = top;
        self.scroll_bottom = bottom;
    }

    pub(super) fn saved_cursor(&self) -> Option<&Cursor> {
        self.saved_cursor.as_ref()
    }

    pub(super) fn set_saved_cursor(&mut self, cursor: Option<Cursor>) {
        self.saved_cursor = cursor;
    }

    pub(super) fn bump_scroll_count(&mut self) {
        self.scroll_count += 1;
    }
}
