//! Upstream data sources.
//!
//! - adapter contract + failure reporting (`source`)
//! - IMF SDMX adapter (`imf`) and FRED adapter (`fred`)
//! - normalized-series cache (`cache`)
//! - indicator catalog (`catalog`)

use reqwest::blocking::Client;

use crate::config::Config;
use crate::error::AppError;

pub mod cache;
pub mod catalog;
pub mod fred;
pub mod imf;
pub mod source;

pub use cache::SeriesCache;
pub use catalog::Catalog;
pub use fred::FredClient;
pub use imf::ImfClient;
pub use source::{ErrorSink, MessageLog, SeriesSource, fetch};

const USER_AGENT: &str = concat!("macro-dash/", env!("CARGO_PKG_VERSION"));

/// Shared blocking HTTP client; built once and cloned into each adapter.
pub fn http_client(config: &Config) -> Result<Client, AppError> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(config.http_timeout)
        .build()
        .map_err(|e| AppError::usage(format!("Failed to build HTTP client: {e}")))
}
