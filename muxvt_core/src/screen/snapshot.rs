//! Lock-coupled screen snapshots.
//!
//! A snapshot is taken while the caller holds the screen lock and read
//! without it. Rows are reference-counted so clean rows can be shared with
//! the previous frame instead of copied; a reader must therefore treat
//! rows as immutable. Dirty rows are freshly owned.

use std::sync::Arc;

use crate::grid::Row;

use super::{Screen, TermMode};

/// Selection clipped and translated into visible-row coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotSelection {
    pub start_x: usize,
    pub start_y: usize,
    pub end_x: usize,
    pub end_y: usize,
    pub rectangular: bool,
}

/// An immutable frame of the visible screen.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub cols: usize,
    pub lines: usize,
    /// Visible rows; clean rows may alias the previous snapshot's rows.
    pub rows: Vec<Arc<Row>>,
    /// Per-line dirty flags at capture time.
    pub dirty: Vec<bool>,
    pub all_dirty: bool,
    pub cursor_row: usize,
    pub cursor_col: usize,
    pub cursor_visible: bool,
    pub view_offset: usize,
    pub scrollback_len: usize,
    pub selection: Option<SnapshotSelection>,
    pub version: u64,
    pub sync_active: bool,
}

impl Screen {
    /// Capture a snapshot of the visible screen.
    ///
    /// When `prev` has matching geometry and view offset, rows that are
    /// not dirty alias the previous snapshot's rows. A sync window or a
    /// scrolled view forces a full copy. Cursor-only changes (moves and
    /// visibility flips) force the previous and current cursor rows dirty
    /// so cell-layer consumers repaint them.
    pub fn snapshot(&mut self, prev: Option<&Snapshot>) -> Snapshot {
        let lines = self.lines();
        let cols = self.cols();
        let view_offset = self.view_offset();
        let sync_active = self.sync_active();
        let cursor_row = self.cursor_row();
        let cursor_col = self.cursor_col();
        let cursor_visible =
            self.mode().contains(TermMode::SHOW_CURSOR) && view_offset == 0;

        // A cursor that moved or flipped visibility dirties both homes.
        let (last_row, _, last_visible) = self.last_cursor();
        if last_row != cursor_row || last_visible != cursor_visible {
            self.grid_mut().dirty_mut().mark(last_row);
            self.grid_mut().dirty_mut().mark(cursor_row);
        } else {
            let (_, last_col, _) = self.last_cursor();
            if last_col != cursor_col {
                self.grid_mut().dirty_mut().mark(cursor_row);
            }
        }

        let (dirty, all_dirty) = self.dirty_lines();

        let reusable = !sync_active
            && view_offset == 0
            && prev.is_some_and(|p| {
                p.cols == cols && p.lines == lines && p.view_offset == 0 && !p.sync_active
            });

        let rows: Vec<Arc<Row>> = if reusable {
            let prev = prev.expect("reusable implies prev");
            (0..lines)
                .map(|y| {
                    if all_dirty || dirty[y] {
                        Arc::new(self.grid().row(y).clone())
                    } else {
                        Arc::clone(&prev.rows[y])
                    }
                })
                .collect()
        } else if let Some(sync) = self.sync_frame() {
            sync.rows.iter().map(|r| Arc::new(r.clone())).collect()
        } else {
            let grid = self.grid();
            (0..lines).map(|y| Arc::new(grid.visible_row(y).clone())).collect()
        };

        let scrollback_len = self.scrollback_len();
        let selection = self.selection().and_then(|sel| {
            let base = scrollback_len.saturating_sub(view_offset);
            let ((start_line, start_x), (end_line, end_x)) = sel.ordered();
            // Clip to the viewport; drop selections entirely outside it.
            if end_line < base || start_line >= base + lines {
                return None;
            }
            // Linear selections clipped at the top/bottom cover full edge
            // rows; rectangular ones keep their columns.
            let (start_y, start_x) = if start_line < base {
                (0, if sel.rectangular { start_x } else { 0 })
            } else {
                (start_line - base, start_x)
            };
            let (end_y, end_x) = if end_line >= base + lines {
                (
                    lines - 1,
                    if sel.rectangular { end_x } else { cols.saturating_sub(1) },
                )
            } else {
                (end_line - base, end_x)
            };
            Some(SnapshotSelection {
                start_x,
                start_y,
                end_x,
                end_y,
                rectangular: sel.rectangular,
            })
        });

        Snapshot {
            cols,
            lines,
            rows,
            dirty,
            all_dirty,
            cursor_row,
            cursor_col,
            cursor_visible,
            view_offset,
            scrollback_len,
            selection,
            version: self.version(),
            sync_active,
        }
    }
}

impl Snapshot {
    /// Whether the cell at visible (`y`, `x`) is inside the selection.
    pub fn selected(&self, y: usize, x: usize) -> bool {
        let Some(sel) = self.selection else {
            return false;
        };
        if sel.rectangular {
            let lo = sel.start_x.min(sel.end_x);
            let hi = sel.start_x.max(sel.end_x);
            return y >= sel.start_y && y <= sel.end_y && x >= lo && x <= hi;
        }
        if y < sel.start_y || y > sel.end_y {
            return false;
        }
        if sel.start_y == sel.end_y {
            return x >= sel.start_x && x <= sel.end_x;
        }
        if y == sel.start_y {
            return x >= sel.start_x;
        }
        if y == sel.end_y {
            return x <= sel.end_x;
        }
        true
    }
}
