//! Core error types for sportsguide-core.
//!
//! Fatal conditions (bad configuration, a page that cannot be fetched, an
//! output file that cannot be written) are errors. Per-record outcomes such
//! as a discarded event are not; see [`crate::normalize::Discard`].

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for sportsguide-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Page fetch errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Record extraction setup errors
    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    /// Guide output errors
    #[error("Emit error: {0}")]
    Emit(#[from] EmitError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// No usable configuration directory
    #[error("Cannot determine configuration directory")]
    NoConfigDir,
}

/// Page fetch errors.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure (DNS, TLS, timeout, body read)
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },

    /// The async runtime could not be started
    #[error("Failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),

    /// Reading a saved page from disk failed
    #[error("Failed to read page {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Extraction setup errors.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// A configured CSS selector does not parse
    #[error("Invalid selector for '{field}': {selector} ({message})")]
    InvalidSelector {
        field: &'static str,
        selector: String,
        message: String,
    },
}

/// Guide writer errors.
#[derive(Error, Debug)]
pub enum EmitError {
    /// Underlying write failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// XML serialization failed
    #[error("XML error: {0}")]
    Xml(String),

    /// Writing an output file failed
    #[error("Failed to write {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    fn read_missing(path: &std::path::Path) -> Result<String> {
        Ok(std::fs::read_to_string(path)?)
    }

    fn parse_report(text: &str) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(text)?)
    }

    fn reject_key() -> Result<()> {
        Err(ConfigError::UnknownKey("schedule.nope".into()).into())
    }

    #[test]
    fn question_mark_wraps_sub_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(read_missing(&dir.path().join("absent")), Err(CoreError::Io(_))));
        assert!(matches!(parse_report("{"), Err(CoreError::Json(_))));

        let err = reject_key().unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::UnknownKey(_))));
        assert_eq!(
            err.to_string(),
            "Configuration error: Unknown configuration key: schedule.nope"
        );
    }

    #[test]
    fn fetch_read_error_names_the_path() {
        let err: CoreError = FetchError::Read {
            path: PathBuf::from("page.html"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        }
        .into();
        assert!(err.to_string().starts_with("Fetch error: Failed to read page page.html"));
    }
}
