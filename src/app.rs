//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads configuration and sets up logging
//! - resolves indicators from the catalog
//! - runs the dashboard pipeline
//! - prints tables/charts or writes exports

use clap::Parser;

use crate::cli::{CatalogArgs, Command, ExportArgs, FetchArgs, ShowArgs, TuiArgs};
use crate::config::Config;
use crate::data::MessageLog;
use crate::domain::Indicator;
use crate::error::AppError;
use crate::logging::LogTarget;
use crate::report::{NO_DATA_MESSAGE, NO_SELECTION_MESSAGE};

pub mod pipeline;

use pipeline::{DashboardView, Session};

/// Entry point for the `mdash` binary.
pub fn run() -> Result<(), AppError> {
    // We want `mdash` and `mdash --start 2000` to behave like `mdash tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let config = Config::from_env()?;
    let target = match cli.command {
        Command::Tui(_) => LogTarget::Quiet,
        _ => LogTarget::Stderr,
    };
    crate::logging::init(&config, target);
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Command::List(args) => handle_list(&config, args),
        Command::Show(args) => handle_show(&config, args),
        Command::Export(args) => handle_export(&config, args),
        Command::Tui(args) => handle_tui(&config, args),
    }
}

fn handle_list(config: &Config, args: CatalogArgs) -> Result<(), AppError> {
    let catalog = crate::data::Catalog::load(args.catalog.as_deref().or(config.catalog_path.as_deref()))?;
    let width = catalog.indicators().iter().map(|i| i.name.chars().count()).max().unwrap_or(0);

    for ind in catalog.indicators() {
        let unit = ind.unit.as_deref().map(|u| format!(" [{u}]")).unwrap_or_default();
        println!("{:<width$}  {:<4}  {}{unit}", ind.name, ind.id.source(), ind.id);
    }
    Ok(())
}

fn handle_show(config: &Config, args: ShowArgs) -> Result<(), AppError> {
    let window = args.fetch.window.window();
    let (view, messages) = build_view(config, &args.fetch)?;
    print_messages(&messages);

    print!("{}", crate::report::format_view(&view, window, args.precision));

    if !args.no_plot
        && let Some(table) = view.table()
    {
        println!();
        print!(
            "{}",
            crate::plot::render_ascii_chart(table, args.chart, args.width, args.height)
        );
    }
    Ok(())
}

fn handle_export(config: &Config, args: ExportArgs) -> Result<(), AppError> {
    let (view, messages) = build_view(config, &args.fetch)?;
    print_messages(&messages);

    match view {
        DashboardView::Table(table) => {
            crate::io::export::write_table_csv_path(&args.output, &table)?;
            tracing::info!(
                path = %args.output.display(),
                rows = table.years().len(),
                columns = table.columns().len(),
                "exported table"
            );
            Ok(())
        }
        // Nothing is written; data problems are not process failures.
        DashboardView::NoSelection => {
            eprintln!("{NO_SELECTION_MESSAGE}");
            Ok(())
        }
        DashboardView::NoData => {
            eprintln!("Warning: {NO_DATA_MESSAGE}");
            Ok(())
        }
    }
}

fn handle_tui(config: &Config, args: TuiArgs) -> Result<(), AppError> {
    let session = Session::open(config, args.catalog.catalog.as_deref())?;
    let dashboard = session.dashboard.with_parallel(args.parallel);
    crate::tui::run(session.catalog, dashboard, args.window.window())
}

/// Open a session, resolve the selection and run the pipeline once.
fn build_view(config: &Config, args: &FetchArgs) -> Result<(DashboardView, Vec<String>), AppError> {
    let session = Session::open(config, args.catalog.catalog.as_deref())?;
    let selection = resolve_selection(&session.catalog, &args.indicators)?;
    let dashboard = session.dashboard.with_parallel(args.parallel);

    let log = MessageLog::new();
    let view = dashboard.view(&selection, args.window.window(), &log);
    Ok((view, log.drain()))
}

/// Named indicators in order, or the first catalog entry when none are given.
fn resolve_selection(catalog: &crate::data::Catalog, names: &[String]) -> Result<Vec<Indicator>, AppError> {
    if names.is_empty() {
        return Ok(catalog.indicators().iter().take(1).cloned().collect());
    }
    catalog.resolve(names)
}

fn print_messages(messages: &[String]) {
    for msg in messages {
        eprintln!("{msg}");
    }
}

/// Rewrite argv so `mdash` defaults to `mdash tui`.
///
/// Rules:
/// - `mdash`                      -> `mdash tui`
/// - `mdash --start 2000 ...`     -> `mdash tui --start 2000 ...`
/// - `mdash --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "list" | "show" | "export" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Catalog;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_opens_tui() {
        assert_eq!(rewrite_args(args(&["mdash"])), args(&["mdash", "tui"]));
    }

    #[test]
    fn leading_flags_go_to_tui() {
        assert_eq!(
            rewrite_args(args(&["mdash", "--start", "2000"])),
            args(&["mdash", "tui", "--start", "2000"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        for argv in [
            args(&["mdash", "show", "-i", "X"]),
            args(&["mdash", "list"]),
            args(&["mdash", "--help"]),
            args(&["mdash", "-V"]),
        ] {
            assert_eq!(rewrite_args(argv.clone()), argv);
        }
    }

    #[test]
    fn empty_selection_defaults_to_first_indicator() {
        let catalog = Catalog::builtin();
        let picked = resolve_selection(&catalog, &[]).unwrap();
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0], catalog.indicators()[0]);
    }

    #[test]
    fn unknown_indicator_is_usage_error() {
        let catalog = Catalog::builtin();
        let err = resolve_selection(&catalog, &["Nope".to_string()]).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_USAGE);
    }
}
