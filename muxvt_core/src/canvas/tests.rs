use vte::ansi::Color;

use crate::cell::{CellFlags, Style};
use crate::screen::Screen;

use super::Canvas;

fn style() -> Style {
    Style::default()
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::new();
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            if chars.peek() == Some(&'[') {
                chars.next();
                for next in chars.by_ref() {
                    if ('\u{40}'..='\u{7e}').contains(&next) {
                        break;
                    }
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[test]
fn new_canvas_is_blank() {
    let canvas = Canvas::new(4, 2);
    assert_eq!(canvas.width(), 4);
    assert_eq!(canvas.height(), 2);
    assert!(canvas.cell(0, 0).unwrap().is_empty());
    assert!(canvas.cell(3, 1).unwrap().is_empty());
    assert!(canvas.cell(4, 0).is_none());
}

#[test]
fn fill_applies_style() {
    let mut canvas = Canvas::new(3, 2);
    let style = Style { bg: Color::Indexed(4), ..Style::default() };
    canvas.fill(&style);
    assert_eq!(canvas.cell(2, 1).unwrap().bg, Color::Indexed(4));
}

#[test]
fn set_cell_clips() {
    let mut canvas = Canvas::new(3, 2);
    canvas.set_cell(1, 1, 'x', &style());
    assert_eq!(canvas.cell(1, 1).unwrap().ch, 'x');
    // Out of bounds writes are dropped.
    canvas.set_cell(99, 0, 'y', &style());
    canvas.set_cell(0, 99, 'z', &style());
}

#[test]
fn draw_text_advances_by_width() {
    let mut canvas = Canvas::new(10, 1);
    canvas.draw_text(0, 0, "a你b", &style());
    assert_eq!(canvas.cell(0, 0).unwrap().ch, 'a');
    assert_eq!(canvas.cell(1, 0).unwrap().ch, '你');
    assert!(canvas.cell(2, 0).unwrap().flags.contains(CellFlags::WIDE_CHAR_SPACER));
    assert_eq!(canvas.cell(3, 0).unwrap().ch, 'b');
}

#[test]
fn draw_text_refuses_to_split_wide_glyph() {
    let mut canvas = Canvas::new(4, 1);
    canvas.draw_text(0, 0, "abc你", &style());
    assert_eq!(canvas.cell(3, 0).unwrap().ch, ' ');
    assert!(!canvas.cell(3, 0).unwrap().flags.contains(CellFlags::WIDE_CHAR));
}

#[test]
fn draw_text_clips_at_right_edge() {
    let mut canvas = Canvas::new(3, 1);
    canvas.draw_text(1, 0, "abcdef", &style());
    assert_eq!(canvas.cell(1, 0).unwrap().ch, 'a');
    assert_eq!(canvas.cell(2, 0).unwrap().ch, 'b');
}

#[test]
fn draw_border_plain_and_focused() {
    let mut canvas = Canvas::new(5, 4);
    canvas.draw_border(0, 0, 5, 4, &style(), false);
    assert_eq!(canvas.cell(0, 0).unwrap().ch, '┌');
    assert_eq!(canvas.cell(4, 0).unwrap().ch, '┐');
    assert_eq!(canvas.cell(0, 3).unwrap().ch, '└');
    assert_eq!(canvas.cell(4, 3).unwrap().ch, '┘');
    assert_eq!(canvas.cell(2, 0).unwrap().ch, '─');
    assert_eq!(canvas.cell(0, 2).unwrap().ch, '│');

    canvas.draw_border(0, 0, 5, 4, &style(), true);
    assert_eq!(canvas.cell(0, 0).unwrap().ch, '╔');
    assert_eq!(canvas.cell(4, 3).unwrap().ch, '╝');
    assert_eq!(canvas.cell(2, 0).unwrap().ch, '═');
    assert_eq!(canvas.cell(0, 2).unwrap().ch, '║');
}

#[test]
fn draw_screen_blits_with_cursor() {
    let mut s = Screen::new(5, 2);
    s.write(b"hi");
    let (rows, _) = s.render_buffers();

    let mut canvas = Canvas::new(10, 4);
    canvas.draw_screen(1, 1, 5, 2, &rows, s.cursor_col(), s.cursor_row(), true, 0);
    assert_eq!(canvas.cell(1, 1).unwrap().ch, 'h');
    assert_eq!(canvas.cell(2, 1).unwrap().ch, 'i');
    // Cursor cell carries the reverse overlay.
    assert!(canvas.cell(3, 1).unwrap().flags.contains(CellFlags::INVERSE));
}

#[test]
fn draw_screen_suppresses_cursor_when_scrolled() {
    let mut s = Screen::new(5, 2);
    s.write(b"hi");
    let (rows, _) = s.render_buffers();
    let mut canvas = Canvas::new(10, 4);
    canvas.draw_screen(0, 0, 5, 2, &rows, s.cursor_col(), s.cursor_row(), true, 3);
    assert!(!canvas.cell(2, 0).unwrap().flags.contains(CellFlags::INVERSE));
}

#[test]
fn draw_screen_clears_stale_wide_halves() {
    let mut s = Screen::new(5, 1);
    s.write("你".as_bytes());
    let (rows, _) = s.render_buffers();
    let mut canvas = Canvas::new(10, 1);
    // Pre-fill with text that the spacer column must overwrite.
    canvas.draw_text(0, 0, "XYZ", &style());
    canvas.draw_screen(0, 0, 5, 1, &rows, 9, 0, false, 0);
    assert_eq!(canvas.cell(0, 0).unwrap().ch, '你');
    // The continuation landed as a plain blank.
    assert_eq!(canvas.cell(1, 0).unwrap().ch, ' ');
    assert!(!canvas.cell(1, 0).unwrap().flags.contains(CellFlags::WIDE_CHAR_SPACER));
}

#[test]
fn draw_snapshot_applies_selection_and_cursor() {
    let mut s = Screen::new(6, 2);
    s.write(b"abcdef");
    s.set_selection(0, 0, 1, 0, true, false);
    let snap = s.snapshot(None);

    let mut canvas = Canvas::new(6, 2);
    canvas.draw_snapshot(0, 0, 6, 2, &snap);
    assert!(canvas.cell(0, 0).unwrap().flags.contains(CellFlags::INVERSE));
    assert!(canvas.cell(1, 0).unwrap().flags.contains(CellFlags::INVERSE));
    assert!(!canvas.cell(2, 0).unwrap().flags.contains(CellFlags::INVERSE));
}

#[test]
fn render_emits_reset_per_line_and_final_reset() {
    let mut canvas = Canvas::new(3, 2);
    canvas.draw_text(0, 0, "ab", &style());
    let frame = canvas.render().to_string();
    assert_eq!(frame.matches("\x1b[0m").count(), 3);
    assert_eq!(strip_ansi(&frame), "ab \n   ");
    assert!(frame.ends_with("\x1b[0m"));
}

#[test]
fn render_emits_delta_sgr() {
    let mut canvas = Canvas::new(4, 1);
    let red = Style { fg: Color::Indexed(1), ..Style::default() };
    canvas.draw_text(0, 0, "ab", &red);
    canvas.draw_text(2, 0, "cd", &style());
    let frame = canvas.render().to_string();
    assert!(frame.contains("38;5;1"));
    assert!(frame.contains("\x1b[39m"), "missing fg reset: {frame:?}");
}

#[test]
fn double_buffering_keeps_previous_frame() {
    let mut canvas = Canvas::new(3, 1);
    canvas.draw_text(0, 0, "one", &style());
    let first = canvas.render().to_string();
    canvas.draw_text(0, 0, "two", &style());
    let second = canvas.render().to_string();
    assert_ne!(first, second);
    assert_eq!(canvas.previous_frame(), first);
}
