//! Fatal pipeline errors.
//!
//! Every failure in the run is fatal: the pipeline has no partial-success
//! mode, so the error type's job is to carry enough context (stage, city,
//! cause) for one useful message plus a process exit code.

use std::path::PathBuf;

use crate::data::source::SourceError;
use crate::stats::ReduceError;

/// Top-level error for a pipeline run.
#[derive(Debug)]
pub enum AppError {
    /// Registry, CLI, or environment problems.
    Config(String),
    /// The forecast source failed for one city; the whole run aborts.
    FetchFailed { city: String, cause: SourceError },
    /// Statistics reduction failed for one city; the whole run aborts.
    ReduceFailed { city: String, cause: ReduceError },
    /// Hand-off channel invariant break (read after close, missing
    /// sentinel). Never expected in correct operation.
    ChannelProtocol(String),
    /// Failed to write an output artifact.
    Artifact { path: PathBuf, cause: std::io::Error },
}

impl AppError {
    /// Process exit code for this error class.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Config(_) => 2,
            AppError::ReduceFailed { .. } => 3,
            AppError::FetchFailed { .. } => 4,
            AppError::ChannelProtocol(_) => 5,
            AppError::Artifact { .. } => 2,
        }
    }

    /// The city the error originates from, when there is one.
    pub fn city(&self) -> Option<&str> {
        match self {
            AppError::FetchFailed { city, .. } | AppError::ReduceFailed { city, .. } => {
                Some(city.as_str())
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "Configuration error: {msg}"),
            AppError::FetchFailed { city, cause } => {
                write!(f, "Forecast fetch failed for '{city}': {cause}")
            }
            AppError::ReduceFailed { city, cause } => {
                write!(f, "Statistics reduction failed for '{city}': {cause}")
            }
            AppError::ChannelProtocol(msg) => {
                write!(f, "Hand-off channel protocol violation: {msg}")
            }
            AppError::Artifact { path, cause } => {
                write!(f, "Failed to write artifact '{}': {cause}", path.display())
            }
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::FetchFailed { cause, .. } => Some(cause),
            AppError::ReduceFailed { cause, .. } => Some(cause),
            AppError::Artifact { cause, .. } => Some(cause),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_distinguish_error_classes() {
        let fetch = AppError::FetchFailed {
            city: "PARIS".to_string(),
            cause: SourceError::Unavailable("timeout".to_string()),
        };
        let reduce = AppError::ReduceFailed {
            city: "CAIRO".to_string(),
            cause: ReduceError::NoValidDays,
        };
        assert_eq!(fetch.exit_code(), 4);
        assert_eq!(reduce.exit_code(), 3);
        assert_eq!(AppError::Config(String::new()).exit_code(), 2);
        assert_eq!(AppError::ChannelProtocol(String::new()).exit_code(), 5);
    }

    #[test]
    fn display_names_the_originating_city() {
        let err = AppError::FetchFailed {
            city: "MOSCOW".to_string(),
            cause: SourceError::Unavailable("HTTP 503".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("MOSCOW"), "{msg}");
        assert!(msg.contains("503"), "{msg}");
        assert_eq!(err.city(), Some("MOSCOW"));
    }
}
