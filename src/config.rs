//! Runtime configuration from the environment (`.env` supported).

use std::path::PathBuf;
use std::time::Duration;

use crate::data::cache::MAX_CAPACITY;
use crate::error::AppError;

pub const DEFAULT_IMF_BASE_URL: &str = "https://api.imf.org/external/sdmx/2.1";
pub const DEFAULT_FRED_BASE_URL: &str = "https://api.stlouisfed.org/fred";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CACHE_TTL_SECS: u64 = 3600;
const DEFAULT_CACHE_CAPACITY: usize = 256;

/// One day.
const MAX_HTTP_TIMEOUT_SECS: u64 = 86_400;
/// One year.
const MAX_CACHE_TTL_SECS: u64 = 365 * 86_400;

#[derive(Clone)]
pub struct Config {
    /// FRED credential. FRED indicators resolve to no data without it.
    pub fred_api_key: Option<String>,
    pub imf_base_url: String,
    pub fred_base_url: String,
    pub http_timeout: Duration,
    pub cache_ttl: Duration,
    pub cache_capacity: usize,
    /// JSON catalog replacing the built-in indicator list.
    pub catalog_path: Option<PathBuf>,
    /// Log file; when unset the CLI logs to stderr and the TUI discards logs.
    pub log_path: Option<PathBuf>,
}

impl Config {
    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (used by `from_env` and tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Ok(Self {
            fred_api_key: non_empty("FRED_API_KEY"),
            imf_base_url: non_empty("MDASH_IMF_BASE_URL").unwrap_or_else(|| DEFAULT_IMF_BASE_URL.to_string()),
            fred_base_url: non_empty("MDASH_FRED_BASE_URL").unwrap_or_else(|| DEFAULT_FRED_BASE_URL.to_string()),
            http_timeout: Duration::from_secs(parse_number(
                "MDASH_HTTP_TIMEOUT_SECS",
                non_empty("MDASH_HTTP_TIMEOUT_SECS"),
                DEFAULT_HTTP_TIMEOUT_SECS,
                MAX_HTTP_TIMEOUT_SECS,
            )?),
            cache_ttl: Duration::from_secs(parse_number(
                "MDASH_CACHE_TTL_SECS",
                non_empty("MDASH_CACHE_TTL_SECS"),
                DEFAULT_CACHE_TTL_SECS,
                MAX_CACHE_TTL_SECS,
            )?),
            cache_capacity: parse_number(
                "MDASH_CACHE_CAPACITY",
                non_empty("MDASH_CACHE_CAPACITY"),
                DEFAULT_CACHE_CAPACITY,
                MAX_CAPACITY,
            )?,
            catalog_path: non_empty("MDASH_CATALOG").map(PathBuf::from),
            log_path: non_empty("MDASH_LOG").map(PathBuf::from),
        })
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("fred_api_key", &self.fred_api_key.as_ref().map(|_| "<redacted>"))
            .field("imf_base_url", &self.imf_base_url)
            .field("fred_base_url", &self.fred_base_url)
            .field("http_timeout", &self.http_timeout)
            .field("cache_ttl", &self.cache_ttl)
            .field("cache_capacity", &self.cache_capacity)
            .field("catalog_path", &self.catalog_path)
            .field("log_path", &self.log_path)
            .finish()
    }
}

fn parse_number<T>(key: &str, raw: Option<String>, default: T, max: T) -> Result<T, AppError>
where
    T: std::str::FromStr + PartialOrd + std::fmt::Display,
{
    let Some(v) = raw else {
        return Ok(default);
    };
    let n: T = v
        .parse()
        .map_err(|_| AppError::usage(format!("Invalid {key} value '{v}' (expected a non-negative integer).")))?;
    if n > max {
        return Err(AppError::usage(format!("{key} value {n} is too large (max {max}).")));
    }
    Ok(n)
}
