//! Cursor movement, tab stops, and save/restore.
//!
//! Absolute and relative moves take explicit row bounds so the dispatcher
//! can pass the scroll region under origin mode and the full screen
//! otherwise. Every movement clamps the cursor back into range, which also
//! discharges any pending wrap.

use super::{Cursor, Grid};

impl Grid {
    /// Clamp the cursor into `[top, bottom)` rows and valid columns.
    pub fn clamp_cursor(&mut self, top: usize, bottom: usize) {
        let bottom = bottom.min(self.lines()).max(top + 1);
        self.cursor.row = self.cursor.row.clamp(top, bottom - 1);
        self.cursor.col = self.cursor.col.min(self.cols() - 1);
    }

    /// Absolute cursor placement (0-based), clamped into `[top, bottom)`.
    pub fn set_cursor_pos(&mut self, row: usize, col: usize, top: usize, bottom: usize) {
        self.cursor.row = row;
        self.cursor.col = col;
        self.clamp_cursor(top, bottom);
    }

    /// Relative cursor movement, clamped into `[top, bottom)`.
    pub fn move_cursor(&mut self, dy: isize, dx: isize, top: usize, bottom: usize) {
        // Pending wrap resolves to the last column before moving.
        let col = self.cursor.col.min(self.cols() - 1) as isize;
        let row = self.cursor.row as isize;
        self.cursor.row = (row + dy).max(0) as usize;
        self.cursor.col = (col + dx).max(0) as usize;
        self.clamp_cursor(top, bottom);
    }

    /// CHA: set the cursor column (0-based), clamped.
    pub fn set_cursor_col(&mut self, col: usize) {
        self.cursor.col = col.min(self.cols() - 1);
    }

    /// HT: advance to the next tab stop (or the last column).
    pub fn tab(&mut self) {
        let cols = self.cols();
        let mut col = self.cursor.col.min(cols - 1) + 1;
        while col < cols && !self.tab_stops()[col] {
            col += 1;
        }
        self.cursor.col = col.min(cols - 1);
    }

    /// HTS: set a tab stop at the cursor column.
    pub fn set_tab_stop(&mut self) {
        let col = self.cursor.col;
        if let Some(stop) = self.tab_stops_mut().get_mut(col) {
            *stop = true;
        }
    }

    /// DECSC: save cursor position and attributes.
    pub fn save_cursor(&mut self) {
        let cursor = self.cursor.clone();
        self.set_saved_cursor(Some(cursor));
    }

    /// DECRC: restore the saved cursor, clamped to current dimensions.
    pub fn restore_cursor(&mut self) {
        if let Some(saved) = self.saved_cursor().cloned() {
            self.cursor = saved;
            let lines = self.lines();
            self.clamp_cursor(0, lines);
        }
    }

    /// Replace the whole cursor (alt-screen swaps).
    pub fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
        let lines = self.lines();
        self.clamp_cursor(0, lines);
    }
}
