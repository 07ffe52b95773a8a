//! Grid editing operations.
//!
//! Character writes and the in-row insert/delete/erase primitives the
//! escape dispatcher calls. Every edit that can split a wide-glyph pair is
//! followed by `normalize_line`, which repairs the invariant: a leader with
//! no continuation becomes a blank, and an orphan continuation becomes a
//! blank.

use unicode_width::UnicodeWidthChar;

use crate::cell::{Cell, CellFlags};

use super::Grid;

/// Erase mode for display and line erase operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraseMode {
    /// Erase from cursor to end (of display or line).
    Below,
    /// Erase from start (of display or line) to cursor, inclusive.
    Above,
    /// Erase entire (display or line).
    All,
    /// Erase entire display and empty the scrollback (display erase only).
    Scrollback,
}

impl Grid {
    /// Write a character at the cursor position.
    ///
    /// Handles pending wrap, wide characters (leader + continuation,
    /// never split across the right edge), and clearing any wide pair
    /// being overwritten. Zero-width scalars (combining marks) are
    /// consumed without mutating the grid or advancing the cursor.
    pub fn put_char(&mut self, ch: char) {
        let width = UnicodeWidthChar::width(ch).unwrap_or(1);
        if width == 0 {
            return;
        }
        let cols = self.cols();

        // Pending wrap from a previous write at the last column.
        if self.cursor.col >= cols {
            let row = self.cursor.row;
            self.row_mut(row)[cols - 1].flags |= CellFlags::WRAPLINE;
            self.linefeed();
            self.cursor.col = 0;
            return self.put_char(ch);
        }

        // A wide char that would straddle the right edge leaves a styled
        // blank in the final column and wraps instead.
        if width == 2 && self.cursor.col + 1 >= cols {
            let (row, col) = (self.cursor.row, self.cursor.col);
            self.clear_wide_pair_at(row, col);
            let template = self.cursor.template.clone();
            let cell = &mut self.row_mut(row)[col];
            cell.ch = ' ';
            cell.fg = template.fg;
            cell.bg = template.bg;
            cell.flags = (template.flags & CellFlags::ATTRS) | CellFlags::WRAPLINE;
            self.dirty_mut().mark(row);
            self.linefeed();
            self.cursor.col = 0;
            return self.put_char(ch);
        }

        let (row, col) = (self.cursor.row, self.cursor.col);
        self.clear_wide_pair_at(row, col);
        if width == 2 {
            // A pair beginning in the continuation column must go too.
            self.clear_wide_pair_at(row, col + 1);
        }

        let template = self.cursor.template.clone();
        let cell = &mut self.row_mut(row)[col];
        cell.ch = ch;
        cell.fg = template.fg;
        cell.bg = template.bg;
        cell.flags = template.flags & CellFlags::ATTRS;

        if width == 2 {
            self.row_mut(row)[col].flags |= CellFlags::WIDE_CHAR;
            let spacer = &mut self.row_mut(row)[col + 1];
            spacer.ch = ' ';
            spacer.fg = template.fg;
            spacer.bg = template.bg;
            spacer.flags = (template.flags & CellFlags::ATTRS) | CellFlags::WIDE_CHAR_SPACER;
        }

        self.dirty_mut().mark(row);
        self.cursor.col = col + width;
    }

    /// ICH: insert `count` blank cells at the cursor, shifting the rest of
    /// the row right. Cells pushed past the right edge are lost.
    pub fn insert_blank_chars(&mut self, count: usize) {
        let (row, col) = (self.cursor.row, self.cursor.col);
        let cols = self.cols();
        if col >= cols {
            return;
        }
        let count = count.min(cols - col);
        let template = Cell::from(self.cursor.template.bg);

        self.normalize_line(row);
        {
            let cells = self.row_mut(row).as_mut_slice();
            for i in (col + count..cols).rev() {
                cells.swap(i, i - count);
            }
            for cell in &mut cells[col..col + count] {
                cell.reset(&template);
            }
        }
        self.normalize_line(row);
        self.row_mut(row).recalculate_occ();
        self.dirty_mut().mark(row);
    }

    /// DCH: delete `count` cells at the cursor, shifting the rest of the
    /// row left. Blanks appear at the right edge.
    pub fn delete_chars(&mut self, count: usize) {
        let (row, col) = (self.cursor.row, self.cursor.col);
        let cols = self.cols();
        if col >= cols {
            return;
        }
        let count = count.min(cols - col);
        let template = Cell::from(self.cursor.template.bg);

        self.normalize_line(row);
        {
            let cells = self.row_mut(row).as_mut_slice();
            for i in col..cols - count {
                cells.swap(i, i + count);
            }
            for cell in &mut cells[cols - count..cols] {
                cell.reset(&template);
            }
        }
        self.normalize_line(row);
        self.row_mut(row).recalculate_occ();
        self.dirty_mut().mark(row);
    }

    /// ECH: blank `count` cells starting at the cursor without shifting.
    pub fn erase_chars(&mut self, count: usize) {
        let (row, col) = (self.cursor.row, self.cursor.col);
        let cols = self.cols();
        if col >= cols {
            return;
        }
        let template = Cell::from(self.cursor.template.bg);
        let end = col.saturating_add(count).min(cols);
        self.row_mut(row).clear_range(col..end, &template);
        self.normalize_line(row);
        self.dirty_mut().mark(row);
    }

    /// Erase part or all of the display.
    pub fn erase_display(&mut self, mode: EraseMode) {
        let template = Cell::from(self.cursor.template.bg);
        match mode {
            EraseMode::Below => {
                self.erase_line(EraseMode::Below);
                for line in self.cursor.row + 1..self.lines() {
                    self.row_mut(line).reset(&template);
                }
                let row = self.cursor.row;
                self.dirty_mut().mark_range(row, usize::MAX);
            }
            EraseMode::Above => {
                self.erase_line(EraseMode::Above);
                for line in 0..self.cursor.row {
                    self.row_mut(line).reset(&template);
                }
                let row = self.cursor.row;
                self.dirty_mut().mark_range(0, row + 1);
            }
            EraseMode::All => {
                for line in 0..self.lines() {
                    self.row_mut(line).reset(&template);
                }
                self.dirty_mut().mark_all();
            }
            EraseMode::Scrollback => {
                self.erase_display(EraseMode::All);
                self.clear_scrollback();
            }
        }
    }

    /// Erase part or all of the current line.
    pub fn erase_line(&mut self, mode: EraseMode) {
        let (row, col) = (self.cursor.row, self.cursor.col);
        let cols = self.cols();
        let template = Cell::from(self.cursor.template.bg);

        match mode {
            EraseMode::Below => {
                self.row_mut(row).clear_range(col.min(cols)..cols, &template);
            }
            EraseMode::Above => {
                self.row_mut(row).clear_range(0..(col + 1).min(cols), &template);
            }
            EraseMode::All | EraseMode::Scrollback => {
                self.row_mut(row).reset(&template);
            }
        }
        self.normalize_line(row);
        self.dirty_mut().mark(row);
    }

    /// Repair the wide-glyph pairing invariant on a row.
    ///
    /// A `WIDE_CHAR` with no following `WIDE_CHAR_SPACER` becomes a blank;
    /// an orphan spacer becomes a blank.
    pub fn normalize_line(&mut self, line: usize) {
        let cols = self.cols();
        for col in 0..cols {
            let flags = self.row(line)[col].flags;
            if flags.contains(CellFlags::WIDE_CHAR) {
                let paired = col + 1 < cols
                    && self.row(line)[col + 1].flags.contains(CellFlags::WIDE_CHAR_SPACER);
                if !paired {
                    let cell = &mut self.row_mut(line)[col];
                    cell.ch = ' ';
                    cell.flags.remove(CellFlags::WIDE_CHAR);
                }
            } else if flags.contains(CellFlags::WIDE_CHAR_SPACER) {
                let paired = col > 0 && self.row(line)[col - 1].flags.contains(CellFlags::WIDE_CHAR);
                if !paired {
                    let cell = &mut self.row_mut(line)[col];
                    cell.ch = ' ';
                    cell.flags.remove(CellFlags::WIDE_CHAR_SPACER);
                }
            }
        }
    }

    /// Clear any wide pair overlapping the given position.
    ///
    /// Overwriting a continuation blanks the leader to its left;
    /// overwriting a leader blanks the continuation to its right.
    fn clear_wide_pair_at(&mut self, line: usize, col: usize) {
        let cols = self.cols();
        if col >= cols {
            return;
        }
        let flags = self.row(line)[col].flags;

        if flags.contains(CellFlags::WIDE_CHAR_SPACER) && col > 0 {
            let prev = &mut self.row_mut(line)[col - 1];
            prev.ch = ' ';
            prev.flags.remove(CellFlags::WIDE_CHAR);
        }
        if flags.contains(CellFlags::WIDE_CHAR) && col + 1 < cols {
            let next = &mut self.row_mut(line)[col + 1];
            next.ch = ' ';
            next.flags.remove(CellFlags::WIDE_CHAR_SPACER);
        }
    }
}
