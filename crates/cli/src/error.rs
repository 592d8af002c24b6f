//! CLI error types.

use std::fmt;

use error_stack::Report;
use freakout_bidder_common::error::AdapterError;

#[derive(Debug)]
pub enum CliError {
    /// Configuration file error
    Config(String),
    /// Adapter input or output error
    Adapter(String),
    /// IO error
    Io(std::io::Error),
    /// JSON parsing error
    Json(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Adapter(msg) => write!(f, "Adapter error: {}", msg),
            CliError::Io(err) => write!(f, "IO error: {}", err),
            CliError::Json(msg) => write!(f, "JSON error: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io(err)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Json(err.to_string())
    }
}

impl From<Report<AdapterError>> for CliError {
    fn from(report: Report<AdapterError>) -> Self {
        CliError::Config(format!("{report:?}"))
    }
}
