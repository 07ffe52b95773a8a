//! Escape-sequence dispatch.
//!
//! `Performer` implements [`vte::Perform`] over disjoint borrows of the
//! screen's fields, so the byte parser can drive it while the parser itself
//! stays a sibling field. The vte state machine handles UTF-8 accumulation,
//! parameter/subparameter collection, and OSC/DCS framing; everything that
//! gives those bytes meaning lives here: the CSI dispatch table, the SGR
//! decoder, DEC private modes, and the DSR/DA/DECRQM replies.
//!
//! Malformed or unknown sequences are dropped without touching state.

use std::io::Write;

use log::trace;
use vte::ansi::Color;
use vte::{Params, Perform};

use crate::cell::CellFlags;
use crate::grid::{Cursor, EraseMode, Grid};

use super::mode::TermMode;
use super::SyncFrame;

/// Upper bound on CSI parameters we look at (matches common emulators).
const MAX_PARAMS: usize = 32;

/// Dispatches parsed escape sequences into grid and mode mutations.
pub(super) struct Performer<'a> {
    pub primary: &'a mut Grid,
    pub alt: &'a mut Grid,
    pub active_is_alt: &'a mut bool,
    pub mode: &'a mut TermMode,
    pub writer: &'a mut Option<Box<dyn Write + Send>>,
    pub sync: &'a mut Option<SyncFrame>,
    pub saved_primary_cursor: &'a mut Option<Cursor>,
}

/// Read parameter `i`, substituting the default when it is missing **or
/// zero**. VT modes define their zero as "use the default", and real
/// programs rely on that conflation, so it is reproduced deliberately.
fn arg(flat: &[u16], i: usize, default: u16) -> u16 {
    match flat.get(i) {
        Some(&v) if v != 0 => v,
        _ => default,
    }
}

impl Performer<'_> {
    /// The currently active grid.
    fn grid(&mut self) -> &mut Grid {
        if *self.active_is_alt { &mut *self.alt } else { &mut *self.primary }
    }

    /// The currently active grid, shared.
    fn grid_ref(&self) -> &Grid {
        if *self.active_is_alt { &*self.alt } else { &*self.primary }
    }

    /// Cursor row bounds: the scroll region under origin mode, the full
    /// screen otherwise.
    fn cursor_bounds(&self) -> (usize, usize) {
        let grid = self.grid_ref();
        if self.mode.contains(TermMode::ORIGIN) {
            (grid.scroll_top(), grid.scroll_bottom())
        } else {
            (0, grid.lines())
        }
    }

    /// Send a reply toward the PTY, if a writer is registered.
    fn write_response(&mut self, data: &[u8]) {
        if let Some(w) = self.writer.as_mut() {
            let _ = w.write_all(data);
            let _ = w.flush();
        }
    }

    fn move_cursor(&mut self, dy: isize, dx: isize) {
        let (top, bottom) = self.cursor_bounds();
        self.grid().move_cursor(dy, dx, top, bottom);
    }

    /// CUP/HVP/VPA target placement; `row` is 0-based and shifted by the
    /// region top under origin mode.
    fn set_cursor_pos(&mut self, row: usize, col: usize) {
        let (top, bottom) = self.cursor_bounds();
        let row = if self.mode.contains(TermMode::ORIGIN) { row + top } else { row };
        self.grid().set_cursor_pos(row, col, top, bottom);
    }

    /// Switch to the alternate screen (modes 47/1047/1049).
    fn enter_alt_screen(&mut self) {
        if *self.active_is_alt {
            return;
        }
        *self.saved_primary_cursor = Some(self.primary.cursor.clone());
        self.alt.clear_all();
        // SGR state carries across the switch.
        self.alt.cursor.template = self.primary.cursor.template.clone();
        *self.active_is_alt = true;
        self.mode.insert(TermMode::ALT_SCREEN);
        self.alt.dirty_mut().mark_all();
    }

    /// Return to the primary screen, restoring its cursor.
    fn exit_alt_screen(&mut self) {
        if !*self.active_is_alt {
            return;
        }
        *self.active_is_alt = false;
        self.mode.remove(TermMode::ALT_SCREEN);
        if let Some(cursor) = self.saved_primary_cursor.take() {
            self.primary.set_cursor(cursor);
        }
        self.primary.dirty_mut().mark_all();
    }

    /// DEC 2026: freeze a copy of the visible screen for readers.
    /// Mutations continue against the live grid; scrollback trimming is
    /// deferred until the window closes.
    fn begin_sync(&mut self) {
        if self.mode.contains(TermMode::SYNC_UPDATE) {
            return;
        }
        self.mode.insert(TermMode::SYNC_UPDATE);
        let cursor_visible = self.mode.contains(TermMode::SHOW_CURSOR);
        let scrollback_len = self.primary.scrollback_len();
        let (rows, cursor_row, cursor_col) = {
            let grid = self.grid_ref();
            (
                (0..grid.lines()).map(|y| grid.row(y).clone()).collect(),
                grid.cursor.row,
                grid.cursor.col.min(grid.cols() - 1),
            )
        };
        *self.sync = Some(SyncFrame {
            rows,
            cursor_row,
            cursor_col,
            cursor_visible,
            scrollback_len,
        });
        self.primary.pause_trim(true);
        self.alt.pause_trim(true);
    }

    /// DEC 2026 exit: drop the frozen frame and apply the deferred trim.
    fn end_sync(&mut self) {
        if !self.mode.contains(TermMode::SYNC_UPDATE) {
            return;
        }
        self.mode.remove(TermMode::SYNC_UPDATE);
        *self.sync = None;
        self.primary.pause_trim(false);
        self.alt.pause_trim(false);
        self.primary.trim_scrollback();
        self.grid().dirty_mut().mark_all();
    }

    /// RIS: full reset. Scrollback survives; everything else returns to
    /// the power-on state.
    fn reset_state(&mut self) {
        *self.active_is_alt = false;
        *self.mode = TermMode::default();
        *self.sync = None;
        *self.saved_primary_cursor = None;
        self.primary.pause_trim(false);
        self.alt.pause_trim(false);
        self.primary.reset_state();
        self.alt.reset_state();
        // A reset invalidates any selection the host was tracking.
        self.primary.bump_scroll_count();
    }

    fn set_private_mode(&mut self, param: u16, enable: bool) {
        match param {
            // DECOM: origin mode; the cursor homes on toggle.
            6 => {
                if enable {
                    self.mode.insert(TermMode::ORIGIN);
                } else {
                    self.mode.remove(TermMode::ORIGIN);
                }
                self.set_cursor_pos(0, 0);
            }
            // DECTCEM: cursor visibility.
            25 => {
                if enable {
                    self.mode.insert(TermMode::SHOW_CURSOR);
                } else {
                    self.mode.remove(TermMode::SHOW_CURSOR);
                }
                let row = self.grid_ref().cursor.row;
                self.grid().dirty_mut().mark(row);
            }
            // Alternate screen variants; 1049 behaves like 47 here.
            47 | 1047 | 1049 => {
                if enable {
                    self.enter_alt_screen();
                } else {
                    self.exit_alt_screen();
                }
            }
            // Synchronized output.
            2026 => {
                if enable {
                    self.begin_sync();
                } else {
                    self.end_sync();
                }
            }
            // Bracketed paste: tracked so DECRQM can answer, no behavior.
            2004 => {
                if enable {
                    self.mode.insert(TermMode::BRACKETED_PASTE);
                } else {
                    self.mode.remove(TermMode::BRACKETED_PASTE);
                }
            }
            // Cursor keys / autowrap / blink: accepted and ignored.
            1 | 7 | 12 => {}
            _ => trace!("unhandled DEC private mode {param} ({})", if enable { 'h' } else { 'l' }),
        }
    }

    /// DECRQM: report private mode state (1 set, 2 reset, 0 unrecognized).
    fn report_private_mode(&mut self, param: u16) {
        let flag = match param {
            6 => Some(TermMode::ORIGIN),
            25 => Some(TermMode::SHOW_CURSOR),
            47 | 1047 | 1049 => Some(TermMode::ALT_SCREEN),
            2026 => Some(TermMode::SYNC_UPDATE),
            2004 => Some(TermMode::BRACKETED_PASTE),
            _ => None,
        };
        let state = match flag {
            Some(flag) if self.mode.contains(flag) => 1,
            Some(_) => 2,
            None => 0,
        };
        let response = format!("\x1b[?{param};{state}$y");
        self.write_response(response.as_bytes());
    }

    /// DSR: device status (5) and cursor position (6) reports.
    fn device_status(&mut self, status: u16) {
        match status {
            5 => self.write_response(b"\x1b[0n"),
            6 => {
                let grid = self.grid_ref();
                let row = grid.cursor.row + 1;
                let col = grid.cursor.col.min(grid.cols() - 1) + 1;
                let response = format!("\x1b[{row};{col}R");
                self.write_response(response.as_bytes());
            }
            _ => {}
        }
    }

    /// DA: primary and secondary device attributes.
    fn identify_terminal(&mut self, secondary: bool) {
        if secondary {
            self.write_response(b"\x1b[>1;10;0c");
        } else {
            self.write_response(b"\x1b[?62;22c");
        }
    }

    /// Apply an SGR parameter sequence to the cursor template.
    ///
    /// Accepts both the semicolon form (`38;5;N`, `38;2;R;G;B`) and the
    /// colon sub-parameter form (`38:5:N`, `38:2:R:G:B`).
    fn apply_sgr(&mut self, params: &Params) {
        let mut groups: [&[u16]; MAX_PARAMS] = [&[]; MAX_PARAMS];
        let mut len = 0;
        for group in params.iter() {
            if len < MAX_PARAMS {
                groups[len] = group;
                len += 1;
            }
        }
        let groups = &groups[..len];

        if groups.is_empty() {
            self.grid().cursor.reset_attrs();
            return;
        }

        let mut i = 0;
        while i < groups.len() {
            let group = groups[i];
            let code = group.first().copied().unwrap_or(0);
            match code {
                0 => self.grid().cursor.reset_attrs(),
                1 => self.set_attr(CellFlags::BOLD, true),
                2 => self.set_attr(CellFlags::DIM, true),
                3 => self.set_attr(CellFlags::ITALIC, true),
                4 => self.set_attr(CellFlags::UNDERLINE, true),
                5 | 6 => self.set_attr(CellFlags::BLINK, true),
                7 => self.set_attr(CellFlags::INVERSE, true),
                8 => self.set_attr(CellFlags::HIDDEN, true),
                9 => self.set_attr(CellFlags::STRIKETHROUGH, true),
                21 => self.set_attr(CellFlags::BOLD, false),
                22 => {
                    self.set_attr(CellFlags::BOLD, false);
                    self.set_attr(CellFlags::DIM, false);
                }
                23 => self.set_attr(CellFlags::ITALIC, false),
                24 => self.set_attr(CellFlags::UNDERLINE, false),
                25 => self.set_attr(CellFlags::BLINK, false),
                27 => self.set_attr(CellFlags::INVERSE, false),
                28 => self.set_attr(CellFlags::HIDDEN, false),
                29 => self.set_attr(CellFlags::STRIKETHROUGH, false),
                30..=37 => self.set_fg(Color::Indexed((code - 30) as u8)),
                38 => {
                    if group.len() > 1 {
                        // Colon sub-parameter form, self-contained.
                        if let Some(color) = extended_color_from_group(group) {
                            self.set_fg(color);
                        }
                    } else {
                        i += 1;
                        if let Some(color) = extended_color_from_groups(groups, &mut i) {
                            self.set_fg(color);
                        }
                        continue;
                    }
                }
                39 => self.set_fg(Color::Named(vte::ansi::NamedColor::Foreground)),
                40..=47 => self.set_bg(Color::Indexed((code - 40) as u8)),
                48 => {
                    if group.len() > 1 {
                        if let Some(color) = extended_color_from_group(group) {
                            self.set_bg(color);
                        }
                    } else {
                        i += 1;
                        if let Some(color) = extended_color_from_groups(groups, &mut i) {
                            self.set_bg(color);
                        }
                        continue;
                    }
                }
                49 => self.set_bg(Color::Named(vte::ansi::NamedColor::Background)),
                90..=97 => self.set_fg(Color::Indexed((code - 90 + 8) as u8)),
                100..=107 => self.set_bg(Color::Indexed((code - 100 + 8) as u8)),
                _ => trace!("unhandled SGR code {code}"),
            }
            i += 1;
        }
    }

    fn set_attr(&mut self, flag: CellFlags, enable: bool) {
        let template = &mut self.grid().cursor.template;
        if enable {
            template.flags.insert(flag);
        } else {
            template.flags.remove(flag);
        }
    }

    fn set_fg(&mut self, color: Color) {
        self.grid().cursor.template.fg = color;
    }

    fn set_bg(&mut self, color: Color) {
        self.grid().cursor.template.bg = color;
    }
}

/// Decode `38:5:N` / `38:2:R:G:B` from one colon-joined group.
fn extended_color_from_group(group: &[u16]) -> Option<Color> {
    match *group.get(1)? {
        5 => Some(Color::Indexed(*group.get(2)? as u8)),
        2 => {
            let r = *group.get(2)? as u8;
            let g = *group.get(3)? as u8;
            let b = *group.get(4)? as u8;
            Some(Color::Spec(vte::ansi::Rgb { r, g, b }))
        }
        _ => None,
    }
}

/// Decode `38;5;N` / `38;2;R;G;B` from the semicolon parameter stream.
/// `i` points at the mode parameter on entry and one past the last
/// consumed parameter on return.
fn extended_color_from_groups(groups: &[&[u16]], i: &mut usize) -> Option<Color> {
    let mode = groups.get(*i)?.first().copied()?;
    match mode {
        5 => {
            *i += 1;
            let idx = groups.get(*i)?.first().copied()? as u8;
            *i += 1;
            Some(Color::Indexed(idx))
        }
        2 => {
            if *i + 3 >= groups.len() {
                *i = groups.len();
                return None;
            }
            let r = groups[*i + 1].first().copied()? as u8;
            let g = groups[*i + 2].first().copied()? as u8;
            let b = groups[*i + 3].first().copied()? as u8;
            *i += 4;
            Some(Color::Spec(vte::ansi::Rgb { r, g, b }))
        }
        _ => {
            *i += 1;
            None
        }
    }
}

impl Perform for Performer<'_> {
    fn print(&mut self, c: char) {
        self.grid().put_char(c);
    }

    fn execute(&mut self, byte: u8) {
        match byte {
            0x08 => self.grid().backspace(),
            0x09 => self.grid().tab(),
            // LF, VT, FF all index down.
            0x0A..=0x0C => self.grid().linefeed(),
            0x0D => self.grid().carriage_return(),
            // BEL and charset shifts carry no model state here.
            0x07 | 0x0E | 0x0F => {}
            _ => trace!("unhandled control byte 0x{byte:02X}"),
        }
    }

    fn csi_dispatch(&mut self, params: &Params, intermediates: &[u8], _ignore: bool, action: char) {
        let mut flat_buf = [0u16; MAX_PARAMS];
        let mut flat_len = 0;
        for group in params.iter() {
            if flat_len < MAX_PARAMS {
                flat_buf[flat_len] = group.first().copied().unwrap_or(0);
                flat_len += 1;
            }
        }
        let flat = &flat_buf[..flat_len];
        let private = intermediates.first() == Some(&b'?');

        match (action, intermediates) {
            ('A', []) => self.move_cursor(-(arg(flat, 0, 1) as isize), 0),
            ('B', []) => self.move_cursor(arg(flat, 0, 1) as isize, 0),
            ('C', []) => self.move_cursor(0, arg(flat, 0, 1) as isize),
            ('D', []) => self.move_cursor(0, -(arg(flat, 0, 1) as isize)),
            ('E', []) => {
                self.move_cursor(arg(flat, 0, 1) as isize, 0);
                self.grid().carriage_return();
            }
            ('F', []) => {
                self.move_cursor(-(arg(flat, 0, 1) as isize), 0);
                self.grid().carriage_return();
            }
            ('G', []) => {
                let col = arg(flat, 0, 1) as usize - 1;
                self.grid().set_cursor_col(col);
            }
            ('H' | 'f', []) => {
                let row = arg(flat, 0, 1) as usize - 1;
                let col = arg(flat, 1, 1) as usize - 1;
                self.set_cursor_pos(row, col);
            }
            ('J', []) => {
                let mode = match flat.first().copied().unwrap_or(0) {
                    0 => EraseMode::Below,
                    1 => EraseMode::Above,
                    2 => EraseMode::All,
                    3 => EraseMode::Scrollback,
                    n => {
                        trace!("unhandled ED mode {n}");
                        return;
                    }
                };
                self.grid().erase_display(mode);
            }
            ('K', []) => {
                let mode = match flat.first().copied().unwrap_or(0) {
                    0 => EraseMode::Below,
                    1 => EraseMode::Above,
                    2 => EraseMode::All,
                    n => {
                        trace!("unhandled EL mode {n}");
                        return;
                    }
                };
                self.grid().erase_line(mode);
            }
            ('L', []) => {
                let n = arg(flat, 0, 1) as usize;
                self.grid().insert_lines(n);
            }
            ('M', []) => {
                let n = arg(flat, 0, 1) as usize;
                self.grid().delete_lines(n);
            }
            ('P', []) => {
                let n = arg(flat, 0, 1) as usize;
                self.grid().delete_chars(n);
            }
            ('S', []) => {
                let n = arg(flat, 0, 1) as usize;
                self.grid().scroll_up(n);
            }
            ('T', []) => {
                let n = arg(flat, 0, 1) as usize;
                self.grid().scroll_down(n);
            }
            ('X', []) => {
                let n = arg(flat, 0, 1) as usize;
                self.grid().erase_chars(n);
            }
            ('@', []) => {
                let n = arg(flat, 0, 1) as usize;
                self.grid().insert_blank_chars(n);
            }
            ('d', []) => {
                let row = arg(flat, 0, 1) as usize - 1;
                let col = self.grid_ref().cursor.col.min(self.grid_ref().cols() - 1);
                self.set_cursor_pos(row, col);
            }
            ('m', []) => self.apply_sgr(params),
            ('n', []) => self.device_status(flat.first().copied().unwrap_or(0)),
            ('r', []) => {
                let lines = self.grid_ref().lines();
                let top = arg(flat, 0, 1) as usize - 1;
                let bottom = arg(flat, 1, lines as u16) as usize;
                self.grid().set_scroll_region(top, bottom);
                self.set_cursor_pos(0, 0);
            }
            ('s', []) => self.grid().save_cursor(),
            ('u', []) => self.grid().restore_cursor(),
            ('c', []) => self.identify_terminal(false),
            ('c', [b'>']) => self.identify_terminal(true),
            ('h' | 'l', _) if private => {
                for &param in flat {
                    self.set_private_mode(param, action == 'h');
                }
            }
            // ANSI SM/RM without the private marker is not honored.
            ('h' | 'l', []) => {}
            ('p', [b'?', b'$']) => self.report_private_mode(flat.first().copied().unwrap_or(0)),
            _ => {
                trace!("unhandled CSI '{action}' intermediates={intermediates:?} params={flat:?}");
            }
        }
    }

    fn esc_dispatch(&mut self, intermediates: &[u8], _ignore: bool, byte: u8) {
        match (byte, intermediates) {
            (b'7', []) => self.grid().save_cursor(),
            (b'8', []) => self.grid().restore_cursor(),
            // RI: up one line, scrolling down at the top of the region.
            (b'M', []) => self.grid().reverse_index(),
            // IND: down one line, scrolling up at the bottom.
            (b'D', []) => self.grid().linefeed(),
            // NEL: CR + IND.
            (b'E', []) => {
                self.grid().carriage_return();
                self.grid().linefeed();
            }
            (b'c', []) => self.reset_state(),
            (b'H', []) => self.grid().set_tab_stop(),
            // Keypad modes carry no model state here.
            (b'=' | b'>', []) => {}
            // Charset designations are swallowed and ignored.
            (_, [b'('] | [b')']) => {}
            _ => trace!("unhandled ESC dispatch 0x{byte:02X} intermediates={intermediates:?}"),
        }
    }

    fn osc_dispatch(&mut self, params: &[&[u8]], _bell_terminated: bool) {
        // OSC is parsed and discarded (titles, hyperlinks, clipboard are
        // outside this model).
        if let Some(cmd) = params.first() {
            trace!("discarding OSC {:?}", String::from_utf8_lossy(cmd));
        }
    }

    fn hook(&mut self, _params: &Params, _intermediates: &[u8], _ignore: bool, _action: char) {}

    fn put(&mut self, _byte: u8) {}

    fn unhook(&mut self) {}
}
