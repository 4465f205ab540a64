//! Error types.
//!
//! Two layers:
//!
//! - `AppError`: process-level failures (bad configuration, unknown indicator,
//!   export/terminal I/O). Carries the exit code `main` returns.
//! - `FetchError`: everything that can go wrong while talking to a data source.
//!   These never leave the adapter layer; they are reported and turned into
//!   `RawObservation::Absent`.

use thiserror::Error;

use crate::domain::SourceKind;

/// Exit code for configuration and usage errors.
pub const EXIT_USAGE: u8 = 2;
/// Exit code for runtime I/O failures (export files, terminal).
pub const EXIT_IO: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(EXIT_IO, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Failure while fetching one series from one source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// No adapter is available for the source (e.g. missing API key).
    #[error("{} source is not configured{}", .0, .0.config_hint())]
    NotConfigured(SourceKind),

    /// The identifier does not belong to the adapter it was sent to, or is malformed.
    #[error("invalid series identifier: {0}")]
    InvalidIdentifier(String),

    /// Transport, HTTP status, or payload decoding failure.
    #[error("{kind} request failed: {reason}")]
    SourceUnavailable { kind: SourceKind, reason: String },

    /// Upstream answered but returned no usable observations.
    #[error("{kind} returned no observations for {series}")]
    EmptyResult { kind: SourceKind, series: String },
}

impl FetchError {
    pub fn unavailable(kind: SourceKind, reason: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            kind,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_messages_are_readable() {
        let err = FetchError::unavailable(SourceKind::Imf, "status 404 Not Found");
        assert_eq!(err.to_string(), "IMF request failed: status 404 Not Found");

        let err = FetchError::NotConfigured(SourceKind::Fred);
        assert_eq!(
            err.to_string(),
            "FRED source is not configured (set FRED_API_KEY)"
        );
        assert_eq!(
            FetchError::NotConfigured(SourceKind::Imf).to_string(),
            "IMF source is not configured"
        );

        let err = FetchError::EmptyResult {
            kind: SourceKind::Fred,
            series: "FEDFUNDS".to_string(),
        };
        assert_eq!(err.to_string(), "FRED returned no observations for FEDFUNDS");
    }

    #[test]
    fn app_error_keeps_exit_code() {
        let err = AppError::usage("Unknown indicator 'x'.");
        assert_eq!(err.exit_code(), EXIT_USAGE);
        assert_eq!(err.to_string(), "Unknown indicator 'x'.");
    }
}
