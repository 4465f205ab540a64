//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Each indicator gets its own marker (`*`, `o`, `+`, ...). Line charts join
//! consecutive observations with `.`; bar charts draw one bar per indicator
//! inside each year slot, rising from zero (or the bottom edge).

use crate::domain::{ChartKind, CombinedTable, Year};

const MARKERS: [char; 8] = ['*', 'o', '+', 'x', '#', '@', '%', '&'];

/// Marker used for the `index`-th column.
pub fn marker(index: usize) -> char {
    MARKERS[index % MARKERS.len()]
}

/// Render the table as a chart with a header and a legend.
///
/// Returns an empty string for an empty table.
pub fn render_ascii_chart(table: &CombinedTable, kind: ChartKind, width: usize, height: usize) -> String {
    let years = table.years();
    let (Some(&first), Some(&last), Some((lo, hi))) = (years.first(), years.last(), table.value_range()) else {
        return String::new();
    };

    let width = width.max(10);
    let height = height.max(5);

    let (y_min, y_max) = match kind {
        // Bars rise from zero when zero is visible.
        ChartKind::Bar => (lo.min(0.0), hi.max(0.0)),
        ChartKind::Line => (lo, hi),
    };
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    match kind {
        ChartKind::Line => draw_lines(&mut grid, table, first, last, y_min, y_max),
        ChartKind::Bar => draw_bars(&mut grid, table, &years, y_min, y_max),
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: years=[{first}, {last}] | y=[{y_min:.2}, {y_max:.2}]\n"
    ));
    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }
    for (i, name) in table.column_names().enumerate() {
        out.push_str(&format!("  {} {name}\n", marker(i)));
    }
    out
}

fn draw_lines(grid: &mut [Vec<char>], table: &CombinedTable, first: Year, last: Year, y_min: f64, y_max: f64) {
    let height = grid.len();
    let width = grid[0].len();

    // Connectors first so markers overlay them.
    for column in table.columns() {
        let mut prev: Option<(usize, usize)> = None;
        for (year, value) in column.series.iter() {
            let p = (map_x(year, first, last, width), map_y(value, y_min, y_max, height));
            if let Some((x0, y0)) = prev {
                draw_line(grid, x0, y0, p.0, p.1, '.');
            }
            prev = Some(p);
        }
    }

    for (i, column) in table.columns().iter().enumerate() {
        for (year, value) in column.series.iter() {
            let x = map_x(year, first, last, width);
            let y = map_y(value, y_min, y_max, height);
            grid[y][x] = marker(i);
        }
    }
}

fn draw_bars(grid: &mut [Vec<char>], table: &CombinedTable, years: &[Year], y_min: f64, y_max: f64) {
    let height = grid.len();
    let width = grid[0].len();
    let n_cols = table.columns().len().max(1);
    let slot = (width / years.len().max(1)).max(1);
    let base = map_y(0.0_f64.clamp(y_min, y_max), y_min, y_max, height);

    for (slot_idx, &year) in years.iter().enumerate() {
        let slot_start = slot_idx * slot;
        for (i, column) in table.columns().iter().enumerate() {
            let Some(value) = column.series.get(year) else {
                continue;
            };
            // Spread indicators across the slot, leaving a gap between years.
            let x = slot_start + (i * slot.saturating_sub(1).max(1)) / n_cols;
            if x >= width {
                continue;
            }
            let top = map_y(value, y_min, y_max, height);
            let (from, to) = if top <= base { (top, base) } else { (base, top) };
            for row in grid.iter_mut().take(to + 1).skip(from) {
                row[x] = marker(i);
            }
        }
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = if span > 0.0 { span * frac } else { min.abs().max(1.0) * frac };
    (min - pad, max + pad)
}

fn map_x(year: Year, first: Year, last: Year, width: usize) -> usize {
    let width = width.max(2);
    if last <= first {
        return (width - 1) / 2;
    }
    let u = ((year - first) as f64 / (last - first) as f64).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish). Only fills blank cells.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
