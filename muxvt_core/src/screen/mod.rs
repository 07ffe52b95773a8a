//! The terminal model root.
//!
//! `Screen` owns the primary and alternate grids, terminal modes, the byte
//! parser, the response writer, selection state, and the synchronized-output
//! freeze. The expected topology is a PTY reader thread calling
//! [`Screen::write`] and a UI thread calling the query/render surface,
//! both under one caller-supplied lock; snapshots taken under the lock can
//! then be read without it.

pub mod mode;
mod performer;
pub mod selection;
pub mod snapshot;
pub mod text;

use std::io::Write;

use crate::cell::CellFlags;
use crate::color::Palette;
use crate::grid::{Cursor, Grid, Row, MAX_SCROLLBACK};
use crate::render::RenderCache;

use performer::Performer;

pub use mode::TermMode;
pub use selection::Selection;
pub use snapshot::{Snapshot, SnapshotSelection};

/// Frozen visible screen captured when a synchronized-output window opens.
#[derive(Debug, Clone)]
pub struct SyncFrame {
    /// Deep copy of the visible rows at entry.
    pub rows: Vec<Row>,
    pub cursor_row: usize,
    pub cursor_col: usize,
    pub cursor_visible: bool,
    /// Scrollback length at entry.
    pub scrollback_len: usize,
}

/// A virtual terminal screen: grid state plus parser and mode state.
pub struct Screen {
    /// Primary grid; owns the scrollback history.
    primary: Grid,
    /// Alternate grid; never captures scrollback.
    alt: Grid,
    /// Which grid is currently active.
    active_is_alt: bool,
    /// DECSET/DECRST mode flags.
    mode: TermMode,
    /// Color palette (symbolic-to-RGB resolution for hosts).
    palette: Palette,
    /// Escape-sequence state machine; persists across `write` calls so
    /// sequences split at arbitrary byte boundaries parse identically.
    parser: vte::Parser,
    /// Reply sink for DSR/DA/DECRQM. Invoked during `write`, under
    /// whatever lock the caller holds; it must not re-enter the screen.
    writer: Option<Box<dyn Write + Send>>,
    /// Active selection, absolute line coordinates.
    selection: Option<Selection>,
    /// Frozen frame while DEC 2026 is active.
    sync: Option<SyncFrame>,
    /// Primary cursor stashed while the alternate screen is active.
    saved_primary_cursor: Option<Cursor>,
    /// Monotonic counter bumped on every visible change.
    version: u64,
    /// Cursor state recorded at the last frame handoff.
    last_cursor_row: usize,
    last_cursor_col: usize,
    last_cursor_visible: bool,
    /// Per-line ANSI cache for the live render path.
    pub(crate) cache: RenderCache,
}

impl Screen {
    /// Create a screen with the given dimensions (clamped to at least 1x1),
    /// a cleared primary grid, empty scrollback, and no response writer.
    pub fn new(cols: usize, lines: usize) -> Self {
        let cols = cols.max(1);
        let lines = lines.max(1);
        Self {
            primary: Grid::with_max_scrollback(cols, lines, MAX_SCROLLBACK),
            alt: Grid::with_max_scrollback(cols, lines, 0),
            active_is_alt: false,
            mode: TermMode::default(),
            palette: Palette::default(),
            parser: vte::Parser::new(),
            writer: None,
            selection: None,
            sync: None,
            saved_primary_cursor: None,
            version: 0,
            last_cursor_row: 0,
            last_cursor_col: 0,
            last_cursor_visible: true,
            cache: RenderCache::new(),
        }
    }

    /// Register the callback that receives DSR/DA/DECRQM replies.
    ///
    /// Without one, replies are dropped.
    pub fn set_response_writer(&mut self, writer: Box<dyn Write + Send>) {
        self.writer = Some(writer);
    }

    /// Feed PTY output bytes into the model.
    ///
    /// Bytes are applied in order; escape sequences split across calls
    /// resume where they left off.
    pub fn write(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        let scrolls_before = self.primary.scroll_count() + self.alt.scroll_count();
        let trimmed_before = self.primary.trimmed_total();

        let mut performer = Performer {
            primary: &mut self.primary,
            alt: &mut self.alt,
            active_is_alt: &mut self.active_is_alt,
            mode: &mut self.mode,
            writer: &mut self.writer,
            sync: &mut self.sync,
            saved_primary_cursor: &mut self.saved_primary_cursor,
        };
        self.parser.advance(&mut performer, bytes);

        // Content scrolls invalidate the selection outright; trimming
        // shifts what survives toward line zero.
        if self.primary.scroll_count() + self.alt.scroll_count() != scrolls_before {
            self.selection = None;
        } else {
            let trimmed = (self.primary.trimmed_total() - trimmed_before) as usize;
            if trimmed > 0 {
                self.selection = self.selection.and_then(|s| s.shifted(trimmed));
            }
        }
        self.version += 1;
    }

    /// The active grid.
    pub fn grid(&self) -> &Grid {
        if self.active_is_alt { &self.alt } else { &self.primary }
    }

    /// The active grid, mutably. Host-side edits must mark dirt themselves.
    pub fn grid_mut(&mut self) -> &mut Grid {
        if self.active_is_alt { &mut self.alt } else { &mut self.primary }
    }

    /// The primary grid (scrollback owner), regardless of alt state.
    pub fn primary_grid(&self) -> &Grid {
        &self.primary
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.grid().cols()
    }

    /// Number of visible lines.
    pub fn lines(&self) -> usize {
        self.grid().lines()
    }

    /// Current mode flags.
    pub fn mode(&self) -> TermMode {
        self.mode
    }

    /// Whether the alternate screen is active.
    pub fn alt_screen_active(&self) -> bool {
        self.active_is_alt
    }

    /// Whether a synchronized-output window is open.
    pub fn sync_active(&self) -> bool {
        self.sync.is_some()
    }

    /// The frozen sync frame, if a window is open.
    pub(crate) fn sync_frame(&self) -> Option<&SyncFrame> {
        self.sync.as_ref()
    }

    /// Whether DECTCEM has hidden the cursor.
    pub fn cursor_hidden(&self) -> bool {
        !self.mode.contains(TermMode::SHOW_CURSOR)
    }

    /// Cursor column, clamped out of any pending-wrap state.
    pub fn cursor_col(&self) -> usize {
        self.grid().cursor.col.min(self.cols() - 1)
    }

    /// Cursor row.
    pub fn cursor_row(&self) -> usize {
        self.grid().cursor.row
    }

    /// Monotonic version: bumps on any visible change.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The color palette.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// The color palette, mutably (host recoloring).
    pub fn palette_mut(&mut self) -> &mut Palette {
        &mut self.palette
    }

    /// Rows scrolled back into history (0 = live bottom).
    pub fn view_offset(&self) -> usize {
        self.primary.display_offset()
    }

    /// Scrollback length of the primary screen.
    pub fn scrollback_len(&self) -> usize {
        self.primary.scrollback_len()
    }

    /// Scroll the view by `delta` rows (positive = further into history).
    pub fn scroll_view(&mut self, delta: isize) {
        if !self.active_is_alt && self.primary.scroll_display(delta) {
            self.version += 1;
        }
    }

    /// Scroll the view to an absolute offset (clamped).
    pub fn scroll_view_to(&mut self, offset: usize) {
        if !self.active_is_alt && self.primary.set_display_offset(offset) {
            self.version += 1;
        }
    }

    /// Scroll the view to the oldest retained row.
    pub fn scroll_view_to_top(&mut self) {
        let len = self.primary.scrollback_len();
        self.scroll_view_to(len);
    }

    /// Return the view to the live bottom.
    pub fn scroll_view_to_bottom(&mut self) {
        self.scroll_view_to(0);
    }

    /// Set the selection from absolute-line anchors.
    pub fn set_selection(
        &mut self,
        start_x: usize,
        start_line: usize,
        end_x: usize,
        end_line: usize,
        active: bool,
        rectangular: bool,
    ) {
        let next = active.then_some(Selection {
            start_x,
            start_line,
            end_x,
            end_line,
            rectangular,
        });
        if next != self.selection {
            self.selection = next;
            self.grid_mut().dirty_mut().mark_all();
            self.version += 1;
        }
    }

    /// Drop any active selection.
    pub fn clear_selection(&mut self) {
        if self.selection.is_some() {
            self.selection = None;
            self.grid_mut().dirty_mut().mark_all();
            self.version += 1;
        }
    }

    /// The active selection, if any.
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Resize both screens, preserving content.
    pub fn resize(&mut self, cols: usize, lines: usize) {
        let cols = cols.max(1);
        let lines = lines.max(1);
        if cols == self.primary.cols() && lines == self.primary.lines() {
            return;
        }
        let trimmed_before = self.primary.trimmed_total();
        self.primary.resize(cols, lines);
        self.alt.resize(cols, lines);
        if let Some(sync) = &mut self.sync {
            sync.rows.resize(lines, Row::new(cols));
            for row in &mut sync.rows {
                row.resize(cols);
            }
            sync.cursor_row = sync.cursor_row.min(lines - 1);
            sync.cursor_col = sync.cursor_col.min(cols - 1);
        }
        let trimmed = (self.primary.trimmed_total() - trimmed_before) as usize;
        if trimmed > 0 {
            self.selection = self.selection.and_then(|s| s.shifted(trimmed));
        }
        self.cache.invalidate();
        self.version += 1;
    }

    /// Per-line dirty flags plus the all-dirty shortcut.
    pub fn dirty_lines(&self) -> (Vec<bool>, bool) {
        self.grid().dirty().flags()
    }

    /// Clear dirty flags and record the cursor state handed to the
    /// consumer, in one step.
    pub fn clear_dirty_with_cursor(&mut self, show_cursor: bool) {
        let row = self.cursor_row();
        let col = self.cursor_col();
        self.grid_mut().dirty_mut().clear();
        self.last_cursor_row = row;
        self.last_cursor_col = col;
        self.last_cursor_visible = show_cursor;
    }

    pub(crate) fn last_cursor(&self) -> (usize, usize, bool) {
        (self.last_cursor_row, self.last_cursor_col, self.last_cursor_visible)
    }

    /// The visible rows under the current view offset (or the frozen sync
    /// frame while a sync window is open).
    pub fn visible_screen(&self) -> Vec<Row> {
        if let Some(sync) = &self.sync {
            return sync.rows.clone();
        }
        let grid = self.grid();
        (0..grid.lines()).map(|y| grid.visible_row(y).clone()).collect()
    }

    /// The visible rows with the selection baked in as reversed cells.
    pub fn visible_screen_with_selection(&self) -> Vec<Row> {
        let mut rows = self.visible_screen();
        let Some(selection) = self.selection else {
            return rows;
        };
        let base = self.screen_y_to_absolute_line(0);
        for (y, row) in rows.iter_mut().enumerate() {
            for x in 0..row.len() {
                if selection.contains(base + y, x) {
                    row[x].flags.toggle(CellFlags::INVERSE);
                }
            }
        }
        rows
    }

    /// The live screen rows and scrollback length for a cell-layer
    /// consumer; frozen while a sync window is open.
    pub fn render_buffers(&self) -> (Vec<Row>, usize) {
        if let Some(sync) = &self.sync {
            return (sync.rows.clone(), sync.scrollback_len);
        }
        let grid = self.grid();
        let rows = (0..grid.lines()).map(|y| grid.row(y).clone()).collect();
        (rows, self.primary.scrollback_len())
    }

    /// Restore captured history: parse `bytes` into a throwaway screen and
    /// prepend its scrollback plus used rows to this screen's history.
    pub fn prepend_scrollback(&mut self, bytes: &[u8]) {
        let mut replay = Screen::new(self.cols(), self.lines());
        replay.write(bytes);

        let mut rows: Vec<Row> = replay.primary.scrollback_rows().cloned().collect();
        if let Some(last) = replay.primary.last_used_row() {
            for y in 0..=last {
                rows.push(replay.primary.row(y).clone());
            }
        }
        if rows.is_empty() {
            return;
        }
        for row in &mut rows {
            row.resize(self.cols());
        }

        let added = rows.len();
        self.primary.prepend_scrollback_rows(rows);
        self.selection = self.selection.map(|s| s.raised(added));
        let trimmed = self.primary.trim_scrollback();
        if trimmed > 0 {
            self.selection = self.selection.and_then(|s| s.shifted(trimmed));
        }
        self.grid_mut().dirty_mut().mark_all();
        self.version += 1;
    }
}
