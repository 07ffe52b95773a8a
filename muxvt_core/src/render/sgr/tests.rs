use vte::ansi::{Color, NamedColor, Rgb};

use crate::cell::{CellFlags, Style};

use super::{style_to_ansi, style_to_delta_ansi};

fn style(fg: Color, bg: Color, flags: CellFlags) -> Style {
    Style { fg, bg, flags }
}

const FG: Color = Color::Named(NamedColor::Foreground);
const BG: Color = Color::Named(NamedColor::Background);

/// Apply an SGR byte string to a style, mimicking a terminal. Used to
/// verify that deltas land in the same state as a reset + full assert.
fn apply_codes(mut state: Style, seq: &str) -> Style {
    let mut rest = seq;
    while let Some(start) = rest.find("\x1b[") {
        let body_start = start + 2;
        let end = rest[body_start..].find('m').expect("SGR terminator") + body_start;
        let params: Vec<u16> = rest[body_start..end]
            .split(';')
            .map(|p| p.parse().unwrap_or(0))
            .collect();
        let mut i = 0;
        while i < params.len() {
            match params[i] {
                0 => state = Style::default(),
                1 => state.flags.insert(CellFlags::BOLD),
                2 => state.flags.insert(CellFlags::DIM),
                3 => state.flags.insert(CellFlags::ITALIC),
                4 => state.flags.insert(CellFlags::UNDERLINE),
                5 => state.flags.insert(CellFlags::BLINK),
                7 => state.flags.insert(CellFlags::INVERSE),
                8 => state.flags.insert(CellFlags::HIDDEN),
                9 => state.flags.insert(CellFlags::STRIKETHROUGH),
                22 => state.flags.remove(CellFlags::BOLD | CellFlags::DIM),
                23 => state.flags.remove(CellFlags::ITALIC),
                24 => state.flags.remove(CellFlags::UNDERLINE),
                25 => state.flags.remove(CellFlags::BLINK),
                27 => state.flags.remove(CellFlags::INVERSE),
                28 => state.flags.remove(CellFlags::HIDDEN),
                29 => state.flags.remove(CellFlags::STRIKETHROUGH),
                38 | 48 => {
                    let is_fg = params[i] == 38;
                    let color = match params.get(i + 1) {
                        Some(&5) => {
                            let c = Color::Indexed(params[i + 2] as u8);
                            i += 2;
                            c
                        }
                        Some(&2) => {
                            let c = Color::Spec(Rgb {
                                r: params[i + 2] as u8,
                                g: params[i + 3] as u8,
                                b: params[i + 4] as u8,
                            });
                            i += 4;
                            c
                        }
                        _ => panic!("bad extended color in {seq:?}"),
                    };
                    if is_fg {
                        state.fg = color;
                    } else {
                        state.bg = color;
                    }
                }
                39 => state.fg = FG,
                49 => state.bg = BG,
                n => panic!("unexpected SGR code {n} in {seq:?}"),
            }
            i += 1;
        }
        rest = &rest[end + 1..];
    }
    state
}

#[test]
fn full_assert_of_default_is_empty() {
    assert_eq!(style_to_ansi(&Style::default()), "");
}

#[test]
fn full_assert_emits_attrs_and_colors() {
    let s = style(Color::Indexed(1), Color::Spec(Rgb { r: 10, g: 20, b: 30 }), CellFlags::BOLD);
    assert_eq!(style_to_ansi(&s), "\x1b[1;38;5;1;48;2;10;20;30m");
}

#[test]
fn delta_between_equal_styles_is_empty() {
    let s = style(Color::Indexed(3), BG, CellFlags::ITALIC);
    assert_eq!(style_to_delta_ansi(&s, &s), "");
}

#[test]
fn delta_single_attr_off_uses_clear_code() {
    let prev = style(FG, BG, CellFlags::UNDERLINE);
    let next = style(FG, BG, CellFlags::empty());
    assert_eq!(style_to_delta_ansi(&prev, &next), "\x1b[24m");
}

#[test]
fn delta_two_attrs_off_resets_and_reasserts() {
    let prev = style(Color::Indexed(2), BG, CellFlags::BOLD | CellFlags::UNDERLINE);
    let next = style(Color::Indexed(2), BG, CellFlags::empty());
    let delta = style_to_delta_ansi(&prev, &next);
    assert!(delta.starts_with("\x1b[0m"), "expected reset, got {delta:?}");
    // The reassertion restores the surviving color.
    assert!(delta.contains("38;5;2"));
}

#[test]
fn delta_bold_off_reasserts_surviving_dim() {
    let prev = style(FG, BG, CellFlags::BOLD | CellFlags::DIM);
    let next = style(FG, BG, CellFlags::DIM);
    assert_eq!(style_to_delta_ansi(&prev, &next), "\x1b[22;2m");
}

#[test]
fn delta_color_to_default_uses_39_49() {
    let prev = style(Color::Indexed(5), Color::Indexed(6), CellFlags::empty());
    let next = Style::default();
    let delta = style_to_delta_ansi(&prev, &next);
    assert!(delta.contains("39"));
    assert!(delta.contains("49"));
    assert!(!delta.contains("38"));
}

#[test]
fn delta_equivalence_over_style_pairs() {
    let colors = [
        FG,
        Color::Indexed(1),
        Color::Indexed(14),
        Color::Indexed(231),
        Color::Spec(Rgb { r: 255, g: 128, b: 0 }),
    ];
    let flag_sets = [
        CellFlags::empty(),
        CellFlags::BOLD,
        CellFlags::DIM,
        CellFlags::BOLD | CellFlags::DIM,
        CellFlags::UNDERLINE | CellFlags::INVERSE,
        CellFlags::BOLD | CellFlags::ITALIC | CellFlags::STRIKETHROUGH,
        CellFlags::ATTRS,
    ];

    let mut styles = Vec::new();
    for &fg in &colors {
        for &flags in &flag_sets {
            styles.push(style(fg, BG, flags));
            styles.push(style(FG, fg, flags));
        }
    }

    for prev in &styles {
        for next in &styles {
            // A terminal in `prev` state fed the delta...
            let via_delta = apply_codes(*prev, &style_to_delta_ansi(prev, next));
            // ...must land where reset + full assert would.
            let via_full = apply_codes(
                Style::default(),
                &format!("\x1b[0m{}", style_to_ansi(next)),
            );
            assert_eq!(
                via_delta, via_full,
                "delta mismatch for {prev:?} -> {next:?}"
            );
        }
    }
}
