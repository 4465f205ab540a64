//! Plotters-powered indicator chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
// `ratatui::style::Color` below shadows the prelude's trait; keep `.filled()`.
use plotters::style::Color as _;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::domain::ChartKind;

/// High-contrast palette, one entry per indicator (wraps around).
const PALETTE: [(u8, u8, u8); 8] = [
    (0, 255, 255),
    (255, 200, 0),
    (0, 255, 0),
    (255, 80, 80),
    (180, 120, 255),
    (255, 255, 255),
    (255, 140, 0),
    (80, 160, 255),
];

pub fn palette_rgb(index: usize) -> (u8, u8, u8) {
    PALETTE[index % PALETTE.len()]
}

/// Ratatui color matching the plotted series (for legends and list markers).
pub fn palette_color(index: usize) -> Color {
    let (r, g, b) = palette_rgb(index);
    Color::Rgb(r, g, b)
}

/// A render-only chart description: one `(year, value)` series per indicator.
///
/// Series and bounds are computed outside the render call.
pub struct SeriesChart<'a> {
    pub series: &'a [Vec<(f64, f64)>],
    pub kind: ChartKind,
    /// X bounds (years).
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl<'a> Widget for SeriesChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to build a chart in a tiny area.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(6)
                .y_labels(5)
                .x_label_formatter(&|v| format!("{v:.0}"))
                .y_label_formatter(&|v| format!("{v:.1}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let n = self.series.len().max(1) as f64;
            // Bars share a 0.8-year slot centered on each year.
            let bar_w = 0.8 / n;
            let base = 0.0_f64.clamp(y0, y1);

            for (i, points) in self.series.iter().enumerate() {
                let (r, g, b) = palette_rgb(i);
                let color = RGBColor(r, g, b);
                match self.kind {
                    ChartKind::Line => {
                        chart.draw_series(LineSeries::new(points.iter().copied(), &color))?;
                        // Single observations would otherwise be invisible.
                        chart.draw_series(points.iter().map(|&(x, y)| Pixel::new((x, y), color)))?;
                    }
                    ChartKind::Bar => {
                        let offset = -0.4 + bar_w * i as f64;
                        chart.draw_series(points.iter().map(|&(x, y)| {
                            Rectangle::new([(x + offset, base), (x + offset + bar_w, y)], color.filled())
                        }))?;
                    }
                }
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// X/Y bounds for the given series, padded so edge points stay visible.
///
/// Bars always include zero on the y axis.
pub fn chart_bounds(series: &[Vec<(f64, f64)>], kind: ChartKind) -> Option<([f64; 2], [f64; 2])> {
    let points = series.iter().flatten();
    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if !x_min.is_finite() || !y_min.is_finite() {
        return None;
    }

    let x_pad = match kind {
        ChartKind::Bar => 0.5,
        ChartKind::Line if x_max > x_min => 0.0,
        ChartKind::Line => 1.0,
    };
    if kind == ChartKind::Bar {
        y_min = y_min.min(0.0);
        y_max = y_max.max(0.0);
    }
    let span = y_max - y_min;
    let y_pad = if span > 0.0 { span * 0.05 } else { y_min.abs().max(1.0) * 0.05 };

    Some(([x_min - x_pad, x_max + x_pad], [y_min - y_pad, y_max + y_pad]))
}
