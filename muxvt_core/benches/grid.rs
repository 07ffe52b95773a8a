//! Benchmarks for hot-path model operations.
//!
//! Models realistic terminal workloads: PTY byte bursts through the parser,
//! linefeeds triggering scroll + scrollback capture, and full-frame ANSI
//! rendering with the per-line cache warm and cold.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use muxvt_core::{Grid, Screen};

/// Terminal sizes that represent real usage.
const SIZES: [(usize, usize); 3] = [
    (80, 24),  // Classic VT100.
    (120, 50), // Modern split pane.
    (240, 80), // Full-screen 4K.
];

/// Mostly-ASCII line with occasional CJK, like compiler output or logs.
fn ascii_heavy_line(cols: usize) -> String {
    let mut line = String::with_capacity(cols);
    let mut width = 0;
    while width + 2 <= cols {
        if width % 20 == 18 {
            line.push('好');
            width += 2;
        } else {
            line.push((b'a' + (width % 26) as u8) as char);
            width += 1;
        }
    }
    line
}

/// `put_char` over a full line: the hottest path in the model.
fn bench_put_char_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("put_char/ascii_line");
    for &(cols, lines) in &SIZES {
        let chars: Vec<char> = ascii_heavy_line(cols).chars().collect();
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{cols}x{lines}")),
            &(cols, lines, &chars),
            |b, &(cols, lines, chars)| {
                let mut grid = Grid::new(cols, lines);
                b.iter(|| {
                    grid.cursor.row = 0;
                    grid.cursor.col = 0;
                    for &ch in black_box(chars) {
                        grid.put_char(ch);
                    }
                });
            },
        );
    }
    group.finish();
}

/// Parser + grid together: a burst of output lines through `write`,
/// scrolling at the bottom with scrollback capture.
fn bench_output_burst(c: &mut Criterion) {
    let mut group = c.benchmark_group("screen/output_burst");
    for &(cols, lines) in &SIZES {
        let mut burst = String::new();
        let line = ascii_heavy_line(cols - 1);
        for _ in 0..100 {
            burst.push_str(&line);
            burst.push_str("\r\n");
        }
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{cols}x{lines}")),
            &(cols, lines, burst.as_bytes()),
            |b, &(cols, lines, bytes)| {
                let mut screen = Screen::new(cols, lines);
                b.iter(|| {
                    screen.write(black_box(bytes));
                });
            },
        );
    }
    group.finish();
}

/// Styled output: SGR transitions on every word, the delta-encoder's load.
fn bench_styled_output(c: &mut Criterion) {
    let mut group = c.benchmark_group("screen/styled_output");
    for &(cols, lines) in &SIZES {
        let mut burst = String::new();
        for i in 0..50 {
            burst.push_str(&format!("\x1b[1;3{}mword\x1b[0m ", i % 8));
        }
        burst.push_str("\r\n");
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{cols}x{lines}")),
            &(cols, lines, burst.as_bytes()),
            |b, &(cols, lines, bytes)| {
                let mut screen = Screen::new(cols, lines);
                b.iter(|| {
                    screen.write(black_box(bytes));
                });
            },
        );
    }
    group.finish();
}

/// Full-frame render with a cold cache: every line re-encoded.
fn bench_render_cold(c: &mut Criterion) {
    let mut group = c.benchmark_group("render/cold_cache");
    for &(cols, lines) in &SIZES {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{cols}x{lines}")),
            &(cols, lines),
            |b, &(cols, lines)| {
                let mut screen = Screen::new(cols, lines);
                let line = ascii_heavy_line(cols - 1);
                for _ in 0..lines {
                    screen.write(line.as_bytes());
                    screen.write(b"\r\n");
                }
                b.iter(|| {
                    screen.grid_mut().dirty_mut().mark_all();
                    black_box(screen.render());
                });
            },
        );
    }
    group.finish();
}

/// Render with a warm cache and one dirty line: the steady-state frame.
fn bench_render_warm(c: &mut Criterion) {
    let mut group = c.benchmark_group("render/warm_cache");
    for &(cols, lines) in &SIZES {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{cols}x{lines}")),
            &(cols, lines),
            |b, &(cols, lines)| {
                let mut screen = Screen::new(cols, lines);
                let line = ascii_heavy_line(cols - 1);
                for _ in 0..lines {
                    screen.write(line.as_bytes());
                    screen.write(b"\r\n");
                }
                let _ = screen.render();
                b.iter(|| {
                    screen.write(b"\x1b[1;1Hx");
                    black_box(screen.render());
                });
            },
        );
    }
    group.finish();
}

/// Snapshot with clean-row reuse against the previous frame.
fn bench_snapshot_reuse(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot/clean_reuse");
    for &(cols, lines) in &SIZES {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{cols}x{lines}")),
            &(cols, lines),
            |b, &(cols, lines)| {
                let mut screen = Screen::new(cols, lines);
                let line = ascii_heavy_line(cols - 1);
                for _ in 0..lines {
                    screen.write(line.as_bytes());
                    screen.write(b"\r\n");
                }
                let mut prev = screen.snapshot(None);
                screen.clear_dirty_with_cursor(true);
                b.iter(|| {
                    screen.write(b"\x1b[1;1Hx");
                    let snap = screen.snapshot(Some(&prev));
                    screen.clear_dirty_with_cursor(true);
                    prev = snap;
                    black_box(&prev);
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_put_char_line,
    bench_output_burst,
    bench_styled_output,
    bench_render_cold,
    bench_render_warm,
    bench_snapshot_reuse,
);
criterion_main!(benches);
