//! Command-line parsing for the macro indicator dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the fetch/normalize pipeline.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{ChartKind, TimeWindow, Year};

pub const DEFAULT_START_YEAR: Year = 2015;
pub const DEFAULT_END_YEAR: Year = 2025;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "mdash", version, about = "Macroeconomic indicator dashboard (IMF SDMX + FRED)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the indicators in the catalog.
    List(CatalogArgs),
    /// Fetch indicators and print the combined table (plus an ASCII chart).
    Show(ShowArgs),
    /// Fetch indicators and write the combined table as CSV.
    Export(ExportArgs),
    /// Launch the interactive TUI.
    ///
    /// Pick indicators and years, then browse the table and chart. Uses the same
    /// pipeline as `mdash show`.
    Tui(TuiArgs),
}

/// Requested years.
#[derive(Debug, Args, Clone)]
pub struct WindowArgs {
    /// First year (inclusive).
    #[arg(long, default_value_t = DEFAULT_START_YEAR)]
    pub start: Year,

    /// Last year (inclusive).
    #[arg(long, default_value_t = DEFAULT_END_YEAR)]
    pub end: Year,

    /// Single year (point query); overrides --start/--end.
    #[arg(long, conflicts_with_all = ["start", "end"])]
    pub year: Option<Year>,
}

impl WindowArgs {
    pub fn window(&self) -> TimeWindow {
        match self.year {
            Some(y) => TimeWindow::point(y),
            None => TimeWindow::new(self.start, self.end),
        }
    }
}

/// Where indicators come from.
#[derive(Debug, Args, Clone)]
pub struct CatalogArgs {
    /// JSON catalog replacing the built-in indicators (default: $MDASH_CATALOG).
    #[arg(long, value_name = "JSON")]
    pub catalog: Option<PathBuf>,
}

/// Options shared by commands that fetch data.
#[derive(Debug, Args, Clone)]
pub struct FetchArgs {
    /// Indicator display name (repeatable). Defaults to the first catalog entry.
    #[arg(short = 'i', long = "indicator", value_name = "NAME")]
    pub indicators: Vec<String>,

    #[command(flatten)]
    pub window: WindowArgs,

    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Fetch indicators concurrently (column order is unchanged).
    #[arg(long)]
    pub parallel: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    #[command(flatten)]
    pub fetch: FetchArgs,

    /// Chart style.
    #[arg(long, value_enum, default_value_t = ChartKind::Line)]
    pub chart: ChartKind,

    /// Disable the terminal chart.
    #[arg(long)]
    pub no_plot: bool,

    /// Chart width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Chart height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Decimal places in the table.
    #[arg(long, default_value_t = 2)]
    pub precision: usize,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub fetch: FetchArgs,

    /// Output CSV path (`-` for stdout).
    #[arg(short = 'o', long, value_name = "CSV")]
    pub output: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    #[command(flatten)]
    pub window: WindowArgs,

    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Fetch indicators concurrently.
    #[arg(long)]
    pub parallel: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_parses_repeated_indicators_and_window() {
        let cli = Cli::parse_from([
            "mdash", "show", "-i", "Fed Funds Rate (%)", "-i", "Inflation (%) - World", "--start", "2000",
            "--end", "2010", "--chart", "bar",
        ]);
        let Command::Show(args) = cli.command else {
            panic!("expected show");
        };
        assert_eq!(args.fetch.indicators.len(), 2);
        assert_eq!(args.fetch.window.window(), TimeWindow::new(2000, 2010));
        assert_eq!(args.chart, ChartKind::Bar);
    }

    #[test]
    fn year_is_a_point_query() {
        let cli = Cli::parse_from(["mdash", "export", "--year", "2024", "-o", "-"]);
        let Command::Export(args) = cli.command else {
            panic!("expected export");
        };
        assert_eq!(args.fetch.window.window(), TimeWindow::point(2024));
        assert!(args.fetch.indicators.is_empty());
    }

    #[test]
    fn year_conflicts_with_explicit_range() {
        let res = Cli::try_parse_from(["mdash", "show", "--year", "2024", "--start", "2020"]);
        assert!(res.is_err());
    }

    #[test]
    fn defaults_match_dashboard_defaults() {
        let cli = Cli::parse_from(["mdash", "tui"]);
        let Command::Tui(args) = cli.command else {
            panic!("expected tui");
        };
        assert_eq!(args.window.window(), TimeWindow::new(DEFAULT_START_YEAR, DEFAULT_END_YEAR));
    }
}
