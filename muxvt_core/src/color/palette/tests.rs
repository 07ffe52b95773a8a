use vte::ansi::{Color, NamedColor, Rgb};

use super::Palette;

#[test]
fn ansi_base_colors() {
    let p = Palette::default();
    assert_eq!(p.resolve(Color::Indexed(0)), Rgb { r: 0x00, g: 0x00, b: 0x00 });
    assert_eq!(p.resolve(Color::Indexed(1)), Rgb { r: 0xcd, g: 0x31, b: 0x31 });
    assert_eq!(p.resolve(Color::Indexed(2)), Rgb { r: 0x0d, g: 0xbc, b: 0x79 });
    assert_eq!(p.resolve(Color::Indexed(7)), Rgb { r: 0xe5, g: 0xe5, b: 0xe5 });
    assert_eq!(p.resolve(Color::Indexed(8)), Rgb { r: 0x66, g: 0x66, b: 0x66 });
    assert_eq!(p.resolve(Color::Indexed(15)), Rgb { r: 0xff, g: 0xff, b: 0xff });
}

#[test]
fn cube_corners() {
    let p = Palette::default();
    // 16 = cube (0,0,0).
    assert_eq!(p.resolve(Color::Indexed(16)), Rgb { r: 0, g: 0, b: 0 });
    // 231 = cube (5,5,5).
    assert_eq!(p.resolve(Color::Indexed(231)), Rgb { r: 255, g: 255, b: 255 });
    // 196 = cube (5,0,0) = pure red.
    assert_eq!(p.resolve(Color::Indexed(196)), Rgb { r: 255, g: 0, b: 0 });
}

#[test]
fn cube_levels() {
    let p = Palette::default();
    // 17 = cube (0,0,1): first non-zero level is 95.
    assert_eq!(p.resolve(Color::Indexed(17)), Rgb { r: 0, g: 0, b: 95 });
    // 18 = cube (0,0,2): 135.
    assert_eq!(p.resolve(Color::Indexed(18)), Rgb { r: 0, g: 0, b: 135 });
}

#[test]
fn grayscale_ramp() {
    let p = Palette::default();
    assert_eq!(p.resolve(Color::Indexed(232)), Rgb { r: 8, g: 8, b: 8 });
    assert_eq!(p.resolve(Color::Indexed(255)), Rgb { r: 238, g: 238, b: 238 });
}

#[test]
fn rgb_passes_through() {
    let p = Palette::default();
    let rgb = Rgb { r: 1, g: 2, b: 3 };
    assert_eq!(p.resolve(Color::Spec(rgb)), rgb);
}

#[test]
fn named_slots() {
    let p = Palette::default();
    assert_eq!(p.resolve(Color::Named(NamedColor::Foreground)), p.foreground());
    assert_eq!(p.resolve(Color::Named(NamedColor::Background)), p.background());
    assert_eq!(p.cursor_color(), Rgb { r: 0xff, g: 0xff, b: 0xff });
}

#[test]
fn override_and_reset() {
    let mut p = Palette::default();
    let red = Rgb { r: 255, g: 0, b: 0 };
    p.set_indexed(4, red);
    assert_eq!(p.resolve(Color::Indexed(4)), red);

    p.reset_indexed(4);
    assert_eq!(p.resolve(Color::Indexed(4)), Rgb { r: 0x24, g: 0x72, b: 0xc8 });
}

#[test]
fn out_of_range_override_ignored() {
    let mut p = Palette::default();
    p.set_indexed(usize::MAX, Rgb { r: 1, g: 2, b: 3 });
    p.reset_indexed(10_000);
}
