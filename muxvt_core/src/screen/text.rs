//! Text extraction, search, and absolute-line coordinate conversions.
//!
//! All line indices here are absolute: line 0 is the oldest scrollback row
//! and visible rows follow the history.

use crate::grid::Row;

use super::Screen;

impl Screen {
    /// Total lines: scrollback plus visible screen.
    pub fn total_lines(&self) -> usize {
        self.primary_grid().scrollback_len() + self.lines()
    }

    /// The row at an absolute line index.
    fn absolute_line_row(&self, abs: usize) -> Option<&Row> {
        let sb_len = self.primary_grid().scrollback_len();
        if abs < sb_len {
            self.primary_grid().scrollback_row(abs)
        } else if abs - sb_len < self.lines() {
            Some(self.grid().row(abs - sb_len))
        } else {
            None
        }
    }

    /// Convert a visible row index to an absolute line index under the
    /// current view offset.
    pub fn screen_y_to_absolute_line(&self, y: usize) -> usize {
        if self.alt_screen_active() {
            return self.primary_grid().scrollback_len() + y;
        }
        self.primary_grid().viewport_to_absolute(y)
    }

    /// Convert an absolute line index to a visible row index, if the line
    /// is inside the current viewport.
    pub fn absolute_line_to_screen_y(&self, abs: usize) -> Option<usize> {
        let start = self.screen_y_to_absolute_line(0);
        if abs < start {
            return None;
        }
        let y = abs - start;
        (y < self.lines()).then_some(y)
    }

    /// The absolute line range currently visible: `(start, end, total)`
    /// with `end` exclusive.
    pub fn visible_line_range(&self) -> (usize, usize, usize) {
        let start = self.screen_y_to_absolute_line(0);
        (start, start + self.lines(), self.total_lines())
    }

    /// Every line of text, scrollback first, trailing spaces trimmed.
    pub fn all_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.total_lines());
        lines.extend(self.primary_grid().scrollback_rows().map(Row::text));
        for y in 0..self.lines() {
            lines.push(self.grid().row(y).text());
        }
        lines
    }

    /// Absolute line indices whose text contains `needle`.
    pub fn search(&self, needle: &str) -> Vec<usize> {
        if needle.is_empty() {
            return Vec::new();
        }
        self.all_lines()
            .iter()
            .enumerate()
            .filter(|(_, line)| line.contains(needle))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Extract the text between two absolute-line anchors (inclusive),
    /// trailing spaces trimmed per line, lines joined with newlines.
    pub fn text_range(
        &self,
        start_x: usize,
        start_line: usize,
        end_x: usize,
        end_line: usize,
    ) -> String {
        let (start, end) = {
            let a = (start_line, start_x);
            let b = (end_line, end_x);
            if a <= b { (a, b) } else { (b, a) }
        };

        let mut out = Vec::new();
        for line in start.0..=end.0 {
            let Some(row) = self.absolute_line_row(line) else {
                break;
            };
            let text = row.text();
            let chars = text.chars().count();
            let from = if line == start.0 { start.1.min(chars) } else { 0 };
            let to = if line == end.0 {
                // End anchor is inclusive.
                (end.1 + 1).min(chars)
            } else {
                chars
            };
            let slice: String = text.chars().skip(from).take(to.saturating_sub(from)).collect();
            out.push(slice.trim_end_matches(' ').to_string());
        }
        out.join("\n")
    }
}
