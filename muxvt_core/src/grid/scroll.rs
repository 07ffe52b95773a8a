//! Scroll region management and scroll operations.
//!
//! `scroll_up` is the only path that feeds scrollback: rows leaving the top
//! of a region anchored at the screen top are deep-copied into history
//! before blank rows appear at the bottom. `insert_lines`/`delete_lines`
//! reuse the same row rotation without capturing.

use crate::cell::Cell;

use super::row::Row;
use super::Grid;

impl Grid {
    /// DECSTBM: set the scroll region from 0-based bounds
    /// (`bottom` exclusive) and home the cursor.
    ///
    /// Rejected unless the region spans at least two lines.
    pub fn set_scroll_region(&mut self, top: usize, bottom: usize) {
        let bottom = bottom.min(self.lines());
        if top + 1 >= bottom {
            return;
        }
        self.set_scroll_region_raw(top, bottom);
    }

    /// Move the cursor down one line, scrolling when at the bottom of the
    /// scroll region.
    #[allow(clippy::else_if_without_else, reason = "No else needed for boundary condition")]
    pub fn linefeed(&mut self) {
        if self.cursor.row + 1 == self.scroll_bottom() {
            self.scroll_up(1);
        } else if self.cursor.row + 1 < self.lines() {
            self.cursor.row += 1;
        }
    }

    /// Move the cursor to column 0.
    pub fn carriage_return(&mut self) {
        self.cursor.col = 0;
    }

    /// Move the cursor left one column.
    ///
    /// A pending wrap (column == width) snaps back to the last column.
    #[allow(clippy::else_if_without_else, reason = "No else needed for boundary condition")]
    pub fn backspace(&mut self) {
        if self.cursor.col >= self.cols() {
            self.cursor.col = self.cols() - 1;
        } else if self.cursor.col > 0 {
            self.cursor.col -= 1;
        }
    }

    /// Move the cursor up one line, scrolling down when at the top of the
    /// scroll region.
    #[allow(clippy::else_if_without_else, reason = "No else needed for boundary condition")]
    pub fn reverse_index(&mut self) {
        if self.cursor.row == self.scroll_top() {
            self.scroll_down(1);
        } else if self.cursor.row > 0 {
            self.cursor.row -= 1;
        }
    }

    /// Scroll the scroll region up by `count` lines, capturing departing
    /// rows into scrollback when the region is anchored at the screen top.
    pub fn scroll_up(&mut self, count: usize) {
        self.bump_scroll_count();
        let (top, bottom) = (self.scroll_top(), self.scroll_bottom());
        self.scroll_up_in_region(top, bottom, count, true);
    }

    /// Scroll the scroll region down by `count` lines. No capture.
    pub fn scroll_down(&mut self, count: usize) {
        let (top, bottom) = (self.scroll_top(), self.scroll_bottom());
        self.scroll_down_in_region(top, bottom, count);
    }

    /// IL: insert `count` blank lines at the cursor, pushing lines below it
    /// down within the scroll region. No-op outside the region.
    pub fn insert_lines(&mut self, count: usize) {
        let row = self.cursor.row;
        if row < self.scroll_top() || row >= self.scroll_bottom() {
            return;
        }
        let bottom = self.scroll_bottom();
        self.scroll_down_in_region(row, bottom, count);
    }

    /// DL: delete `count` lines at the cursor, pulling lines below it up
    /// within the scroll region. No-op outside the region.
    pub fn delete_lines(&mut self, count: usize) {
        let row = self.cursor.row;
        if row < self.scroll_top() || row >= self.scroll_bottom() {
            return;
        }
        let bottom = self.scroll_bottom();
        self.scroll_up_in_region(row, bottom, count, false);
    }

    /// Shift rows `[top, bottom)` up by `count`, blanking the vacated
    /// bottom rows with the BCE background.
    pub(super) fn scroll_up_in_region(
        &mut self,
        top: usize,
        bottom: usize,
        count: usize,
        capture: bool,
    ) {
        if top >= bottom || bottom > self.lines() {
            return;
        }
        let count = count.min(bottom - top);
        if count == 0 {
            return;
        }
        let cols = self.cols();
        let template = Cell::from(self.cursor.template.bg);
        let capture = capture && top == 0;

        for _ in 0..count {
            let departing = self.rows_mut().remove(top);
            if capture {
                self.push_scrollback(departing);
            }
            self.rows_mut().insert(bottom - 1, Row::filled(cols, &template));
        }
        if capture {
            self.trim_scrollback();
        }
        self.dirty_mut().mark_range(top, bottom);
    }

    /// Shift rows `[top, bottom)` down by `count`, blanking the vacated
    /// top rows with the BCE background.
    pub(super) fn scroll_down_in_region(&mut self, top: usize, bottom: usize, count: usize) {
        if top >= bottom || bottom > self.lines() {
            return;
        }
        let count = count.min(bottom - top);
        if count == 0 {
            return;
        }
        let cols = self.cols();
        let template = Cell::from(self.cursor.template.bg);

        for _ in 0..count {
            self.rows_mut().remove(bottom - 1);
            self.rows_mut().insert(top, Row::filled(cols, &template));
        }
        self.dirty_mut().mark_range(top, bottom);
    }
}
