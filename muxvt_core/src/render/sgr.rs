//! SGR escape encoding.
//!
//! `style_to_ansi` asserts a style from the reset state; `style_to_delta_ansi`
//! emits the minimal transition between two styles. Applying the delta to a
//! terminal in `prev` state leaves it exactly where `ESC[0m` + the full
//! sequence for `next` would.

use vte::ansi::Color;

use crate::cell::{CellFlags, Style};

/// Attribute set codes.
const ON_CODES: [(CellFlags, &str); 8] = [
    (CellFlags::BOLD, "1"),
    (CellFlags::DIM, "2"),
    (CellFlags::ITALIC, "3"),
    (CellFlags::UNDERLINE, "4"),
    (CellFlags::BLINK, "5"),
    (CellFlags::INVERSE, "7"),
    (CellFlags::HIDDEN, "8"),
    (CellFlags::STRIKETHROUGH, "9"),
];

/// Attribute clear codes, excluding bold/dim which share `22`.
const OFF_CODES: [(CellFlags, &str); 6] = [
    (CellFlags::ITALIC, "23"),
    (CellFlags::UNDERLINE, "24"),
    (CellFlags::BLINK, "25"),
    (CellFlags::INVERSE, "27"),
    (CellFlags::HIDDEN, "28"),
    (CellFlags::STRIKETHROUGH, "29"),
];

fn color_code(color: Color, base: u8) -> Option<String> {
    match color {
        // Named colors render as the terminal default (handled by the
        // surrounding reset / 39 / 49).
        Color::Named(_) => None,
        Color::Indexed(i) => Some(format!("{base};5;{i}")),
        Color::Spec(rgb) => Some(format!("{base};2;{};{};{}", rgb.r, rgb.g, rgb.b)),
    }
}

fn finish(codes: &[String]) -> String {
    if codes.is_empty() {
        return String::new();
    }
    let mut out = String::with_capacity(8 + codes.iter().map(String::len).sum::<usize>());
    out.push_str("\x1b[");
    for (i, code) in codes.iter().enumerate() {
        if i > 0 {
            out.push(';');
        }
        out.push_str(code);
    }
    out.push('m');
    out
}

/// Full SGR assertion of `style`, assuming the terminal is in the reset
/// state. Empty when the style is default.
pub fn style_to_ansi(style: &Style) -> String {
    let mut codes: Vec<String> = Vec::new();
    for (flag, code) in ON_CODES {
        if style.flags.contains(flag) {
            codes.push((*code).to_string());
        }
    }
    if let Some(code) = color_code(style.fg, 38) {
        codes.push(code);
    }
    if let Some(code) = color_code(style.bg, 48) {
        codes.push(code);
    }
    finish(&codes)
}

/// Minimal SGR transition from `prev` to `next`.
///
/// When two or more attributes turn off, a reset plus full reassertion is
/// shorter and simpler than per-attribute clears; otherwise individual off
/// codes are used (`22` clears bold and dim together, so a surviving one
/// is immediately reasserted).
pub fn style_to_delta_ansi(prev: &Style, next: &Style) -> String {
    if prev == next {
        return String::new();
    }

    let off = prev.flags & !next.flags;
    if off.bits().count_ones() >= 2 {
        let mut out = String::from("\x1b[0m");
        out.push_str(&style_to_ansi(next));
        return out;
    }

    let mut codes: Vec<String> = Vec::new();
    let mut bold_dim_handled = false;
    if off.intersects(CellFlags::BOLD | CellFlags::DIM) {
        codes.push("22".to_string());
        if next.flags.contains(CellFlags::BOLD) {
            codes.push("1".to_string());
        }
        if next.flags.contains(CellFlags::DIM) {
            codes.push("2".to_string());
        }
        bold_dim_handled = true;
    }
    for (flag, code) in OFF_CODES {
        if off.contains(flag) {
            codes.push((*code).to_string());
        }
    }

    let on = next.flags & !prev.flags;
    for (flag, code) in ON_CODES {
        if bold_dim_handled && (flag == CellFlags::BOLD || flag == CellFlags::DIM) {
            continue;
        }
        if on.contains(flag) {
            codes.push((*code).to_string());
        }
    }

    if next.fg != prev.fg {
        match color_code(next.fg, 38) {
            Some(code) => codes.push(code),
            None => codes.push("39".to_string()),
        }
    }
    if next.bg != prev.bg {
        match color_code(next.bg, 48) {
            Some(code) => codes.push(code),
            None => codes.push("49".to_string()),
        }
    }

    finish(&codes)
}

#[cfg(test)]
mod tests;
