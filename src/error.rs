//! Error types for the tap.
//!
//! One crate-wide error enum; every fallible operation returns [`Result`]
//! and propagates with `?`. Only missing configuration keys get special
//! treatment at the process boundary (exit code 1, see `main`).

use thiserror::Error;

/// Result type alias for tap operations.
pub type Result<T> = std::result::Result<T, TapError>;

/// Main error type for all tap operations.
#[derive(Debug, Error)]
pub enum TapError {
    /// Required configuration keys absent from the config file.
    #[error("Missing required configuration keys: {0:?}")]
    MissingConfigKeys(Vec<String>),

    /// Invalid or unexpected JSON content.
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// Asana returned a non-success HTTP status.
    #[error("Asana API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// Transport-level HTTP failure (connection, timeout).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Filesystem or sink I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
