//! `tracing` subscriber setup.
//!
//! Filter comes from `RUST_LOG` (default `warn`). Output goes to `MDASH_LOG`
//! when set; otherwise to stderr for one-shot commands and nowhere for the TUI,
//! which owns the terminal.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    Quiet,
}

/// Install the global subscriber. Safe to call more than once.
pub fn init(config: &Config, target: LogTarget) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

    let result = match (&config.log_path, target) {
        (Some(path), _) => match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => builder.with_ansi(false).with_writer(Mutex::new(file)).try_init(),
            Err(e) => {
                eprintln!("Failed to open log file '{}': {e}", path.display());
                builder.with_writer(std::io::sink).try_init()
            }
        },
        (None, LogTarget::Stderr) => builder.with_writer(std::io::stderr).try_init(),
        (None, LogTarget::Quiet) => builder.with_writer(std::io::sink).try_init(),
    };

    // Already initialized (tests, repeated calls).
    let _ = result;
}
