//! Ratatui-based terminal UI.
//!
//! The TUI provides an indicator picker and a year selector, then renders the
//! combined table and a line/bar chart for the current selection. Every change
//! re-runs the dashboard pipeline; the series cache keeps that cheap.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table},
};

use crate::app::pipeline::{Dashboard, DashboardView};
use crate::data::{Catalog, MessageLog};
use crate::domain::{ChartKind, CombinedTable, Indicator, TimeWindow, Year};
use crate::error::AppError;
use crate::report::{NO_DATA_MESSAGE, NO_SELECTION_MESSAGE};

mod plotters_chart;

use plotters_chart::{SeriesChart, chart_bounds, palette_color};

const MIN_YEAR: Year = 1950;
const MAX_YEAR: Year = 2100;
const EXPORT_FILE: &str = "mdash_export.csv";

/// Start the TUI.
pub fn run(catalog: Catalog, dashboard: Dashboard, window: TimeWindow) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| AppError::io(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(catalog, dashboard, window);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::io(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::io(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum YearMode {
    Range,
    Single,
}

/// Settings rows shown below the indicator list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Setting {
    Mode,
    Start,
    End,
    Chart,
}

const SETTINGS: [Setting; 4] = [Setting::Mode, Setting::Start, Setting::End, Setting::Chart];

struct App {
    catalog: Catalog,
    dashboard: Dashboard,
    log: MessageLog,
    /// Parallel to `catalog.indicators()`.
    selected: Vec<bool>,
    /// Index into indicators followed by settings rows.
    cursor: usize,
    mode: YearMode,
    start: Year,
    end: Year,
    chart: ChartKind,
    view: DashboardView,
    errors: Vec<String>,
    status: String,
    export_path: PathBuf,
}

impl App {
    fn new(catalog: Catalog, dashboard: Dashboard, window: TimeWindow) -> Self {
        let mut selected = vec![false; catalog.len()];
        if let Some(first) = selected.first_mut() {
            *first = true;
        }
        let mode = if window.is_point() { YearMode::Single } else { YearMode::Range };

        let mut app = Self {
            catalog,
            dashboard,
            log: MessageLog::new(),
            selected,
            cursor: 0,
            mode,
            start: window.start,
            end: window.end,
            chart: ChartKind::default(),
            view: DashboardView::NoSelection,
            errors: Vec::new(),
            status: String::new(),
            export_path: PathBuf::from(EXPORT_FILE),
        };
        app.recompute();
        app
    }

    fn window(&self) -> TimeWindow {
        match self.mode {
            YearMode::Range => TimeWindow::new(self.start, self.end),
            YearMode::Single => TimeWindow::point(self.start),
        }
    }

    fn selection(&self) -> Vec<Indicator> {
        self.catalog
            .indicators()
            .iter()
            .zip(&self.selected)
            .filter(|(_, on)| **on)
            .map(|(ind, _)| ind.clone())
            .collect()
    }

    fn setting_at_cursor(&self) -> Option<Setting> {
        self.cursor.checked_sub(self.catalog.len()).and_then(|i| SETTINGS.get(i).copied())
    }

    fn row_count(&self) -> usize {
        self.catalog.len() + SETTINGS.len()
    }

    /// Re-run the pipeline for the current selection and window.
    fn recompute(&mut self) {
        let window = self.window();
        let selection = self.selection();
        self.view = self.dashboard.view(&selection, window, &self.log);
        self.errors = self.log.drain();

        self.status = match &self.view {
            DashboardView::NoSelection => NO_SELECTION_MESSAGE.to_string(),
            DashboardView::NoData if window.is_empty() => "Start year is after end year.".to_string(),
            DashboardView::NoData => NO_DATA_MESSAGE.to_string(),
            DashboardView::Table(t) => format!(
                "{window}: {} indicator(s), {} year(s) with data",
                t.columns().len(),
                t.years().len()
            ),
        };
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::io(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100)).map_err(|e| AppError::io(format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::io(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down => {
                if self.cursor + 1 < self.row_count() {
                    self.cursor += 1;
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter => self.activate(),
            KeyCode::Left => self.adjust(-1),
            KeyCode::Right => self.adjust(1),
            KeyCode::Char('m') => self.toggle_mode(),
            KeyCode::Char('c') => {
                self.chart = self.chart.toggle();
            }
            KeyCode::Char('r') => {
                self.dashboard.cache().clear();
                self.recompute();
            }
            KeyCode::Char('e') => self.export(),
            _ => {}
        }
        false
    }

    fn activate(&mut self) {
        if let Some(on) = self.selected.get_mut(self.cursor) {
            *on = !*on;
            self.recompute();
            return;
        }
        match self.setting_at_cursor() {
            Some(Setting::Mode) => self.toggle_mode(),
            Some(Setting::Chart) => self.chart = self.chart.toggle(),
            _ => {}
        }
    }

    fn adjust(&mut self, delta: Year) {
        match self.setting_at_cursor() {
            Some(Setting::Start) => {
                self.start = (self.start + delta).clamp(MIN_YEAR, MAX_YEAR);
                self.recompute();
            }
            Some(Setting::End) if self.mode == YearMode::Range => {
                self.end = (self.end + delta).clamp(MIN_YEAR, MAX_YEAR);
                self.recompute();
            }
            Some(Setting::Mode) => self.toggle_mode(),
            Some(Setting::Chart) => self.chart = self.chart.toggle(),
            _ => {}
        }
    }

    fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            YearMode::Range => YearMode::Single,
            YearMode::Single => YearMode::Range,
        };
        self.recompute();
    }

    fn export(&mut self) {
        let Some(table) = self.view.table() else {
            self.status = "Nothing to export.".to_string();
            return;
        };
        self.status = match crate::io::export::write_table_csv_path(&self.export_path, table) {
            Ok(()) => format!("Exported {}", self.export_path.display()),
            Err(err) => format!("Export failed: {err}"),
        };
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(4)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mode = match self.mode {
            YearMode::Range => "range",
            YearMode::Single => "single year",
        };
        let chart = match self.chart {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
        };
        let lines = vec![
            Line::from(vec![
                Span::styled("mdash", Style::default().fg(Color::Cyan)),
                Span::raw(" - IMF / FRED macro indicators"),
            ]),
            Line::from(Span::styled(
                format!(
                    "years: {} ({mode}) | chart: {chart} | selected: {}/{}",
                    self.window(),
                    self.selected.iter().filter(|s| **s).count(),
                    self.catalog.len()
                ),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(40), Constraint::Min(0)])
            .split(area);

        self.draw_picker(frame, cols[0]);

        let table_height = self
            .view
            .table()
            .map(|t| (t.years().len() as u16).saturating_add(3).min(area.height / 2))
            .unwrap_or(3);
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(table_height)])
            .split(cols[1]);

        self.draw_chart(frame, right[0]);
        self.draw_table(frame, right[1]);
    }

    fn draw_picker(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut items: Vec<ListItem> = Vec::with_capacity(self.row_count());

        // Color swatches follow column order, i.e. the order of selected entries.
        let mut column = 0usize;
        for (ind, on) in self.catalog.indicators().iter().zip(&self.selected) {
            let mut spans = vec![Span::raw(if *on { "[x] " } else { "[ ] " })];
            if *on {
                spans.push(Span::styled("■ ", Style::default().fg(palette_color(column))));
                column += 1;
            }
            spans.push(Span::raw(ind.name.clone()));
            items.push(ListItem::new(Line::from(spans)));
        }

        for setting in SETTINGS {
            let text = match setting {
                Setting::Mode => format!(
                    "Years: {}",
                    match self.mode {
                        YearMode::Range => "range",
                        YearMode::Single => "single",
                    }
                ),
                Setting::Start if self.mode == YearMode::Single => format!("Year: {}", self.start),
                Setting::Start => format!("Start: {}", self.start),
                Setting::End if self.mode == YearMode::Single => "End: -".to_string(),
                Setting::End => format!("End: {}", self.end),
                Setting::Chart => format!("Chart: {:?}", self.chart),
            };
            items.push(ListItem::new(text).style(Style::default().fg(Color::Gray)));
        }

        let list = List::new(items)
            .block(Block::default().title("Indicators").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.cursor));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Chart").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let table = match &self.view {
            DashboardView::Table(t) => t,
            DashboardView::NoSelection => {
                let msg = Paragraph::new(NO_SELECTION_MESSAGE).style(Style::default().fg(Color::Cyan));
                frame.render_widget(msg, inner);
                return;
            }
            DashboardView::NoData => {
                let msg = Paragraph::new(NO_DATA_MESSAGE).style(Style::default().fg(Color::Yellow));
                frame.render_widget(msg, inner);
                return;
            }
        };

        let series = chart_series(table);
        let Some((x_bounds, y_bounds)) = chart_bounds(&series, self.chart) else {
            return;
        };

        let (chart_rect, insets) = chart_layout(inner);
        let widget = SeriesChart {
            series: &series,
            kind: self.chart,
            x_bounds,
            y_bounds,
        };
        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_legend(frame, inner, insets, table);
        }
    }

    fn draw_table(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Table").borders(Borders::ALL);
        let Some(table) = self.view.table() else {
            frame.render_widget(Paragraph::new("-").block(block), area);
            return;
        };

        let header = Row::new(
            std::iter::once(Cell::from("Year")).chain(table.column_names().map(|n| Cell::from(n.to_string()))),
        )
        .style(Style::default().add_modifier(Modifier::BOLD));

        let rows = table.rows().into_iter().map(|(year, values)| {
            Row::new(
                std::iter::once(Cell::from(year.to_string())).chain(
                    values
                        .into_iter()
                        .map(|v| Cell::from(v.map(|x| format!("{x:.2}")).unwrap_or_else(|| "-".to_string()))),
                ),
            )
        });

        let widths: Vec<Constraint> = std::iter::once(Constraint::Length(6))
            .chain(table.column_names().map(|n| Constraint::Length(n.chars().count().clamp(8, 24) as u16)))
            .collect();

        frame.render_widget(Table::new(rows, widths).header(header).block(block), area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ move  space toggle  ←/→ year  m mode  c chart  r refresh  e export  q quit";
        let mut lines = vec![Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ])];
        if let Some(last) = self.errors.last() {
            let more = if self.errors.len() > 1 {
                format!(" (+{} more)", self.errors.len() - 1)
            } else {
                String::new()
            };
            lines.push(Line::from(Span::styled(
                format!("{last}{more}"),
                Style::default().fg(Color::Red),
            )));
        }
        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// One `(year, value)` series per table column, in column order.
fn chart_series(table: &CombinedTable) -> Vec<Vec<(f64, f64)>> {
    table
        .columns()
        .iter()
        .map(|c| c.series.iter().map(|(y, v)| (y as f64, v)).collect())
        .collect()
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 1,
        right: 1,
        top: 1,
        bottom: 0,
    };

    if inner.width <= insets.left + insets.right + 10 || inner.height <= insets.top + insets.bottom + 5 {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

/// Legend in the top inset row, colored like the plotted series.
fn draw_legend(frame: &mut ratatui::Frame<'_>, inner: Rect, insets: AxisInsets, table: &CombinedTable) {
    let mut spans = Vec::new();
    for (i, name) in table.column_names().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled("■ ", Style::default().fg(palette_color(i))));
        spans.push(Span::raw(name.to_string()));
    }
    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y,
        width: inner.width.saturating_sub(insets.left + insets.right),
        height: insets.top,
    };
    frame.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Left), rect);
}
