//! Error types and handling for postcode-resolver.
//!
//! Only the address sources produce errors. Tokenizing, scoring and resolving
//! are infallible: an empty candidate list or an ambiguous tie is a normal
//! [`Resolution`](crate::Resolution), never an `Err`.

use std::path::PathBuf;

/// Result type alias for postcode-resolver operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for address lookups.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No stored lookup exists for the postcode
    #[error("No address data for postcode {postcode} at {}", .path.display())]
    DataNotFound {
        /// Postcode as supplied by the caller
        postcode: String,
        /// File that was expected to hold the lookup
        path: PathBuf,
    },

    /// The postcode cannot name a stored lookup
    #[error("Invalid postcode: {postcode:?}")]
    InvalidPostcode {
        /// Postcode as supplied by the caller
        postcode: String,
    },

    /// I/O errors
    #[error("I/O error: {source}")]
    IoError {
        /// Source error
        #[from]
        source: std::io::Error,
    },

    /// The lookup envelope could not be decoded
    #[error("Decode error: {source}")]
    DecodeError {
        /// Source error
        #[from]
        source: serde_json::Error,
    },

    /// The lookup service rejected the request
    #[error("Lookup failed ({code}): {message}")]
    LookupFailed {
        /// Service or HTTP status code
        code: i64,
        /// Message reported by the service
        message: String,
    },

    /// Network errors talking to the lookup service
    #[cfg(feature = "remote")]
    #[error("Network error: {message}")]
    NetworkError {
        /// Error message
        message: String,
    },

    /// Invalid or missing configuration
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Error message
        message: String,
    },
}

impl Error {
    /// Create a new data-not-found error
    pub fn data_not_found(postcode: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::DataNotFound {
            postcode: postcode.into(),
            path: path.into(),
        }
    }

    /// Create a new invalid-postcode error
    pub fn invalid_postcode(postcode: impl Into<String>) -> Self {
        Self::InvalidPostcode {
            postcode: postcode.into(),
        }
    }

    /// Create a new lookup error
    pub fn lookup_failed(code: i64, message: impl Into<String>) -> Self {
        Self::LookupFailed {
            code,
            message: message.into(),
        }
    }

    /// Create a new network error
    #[cfg(feature = "remote")]
    pub fn network_error(message: impl Into<String>) -> Self {
        Self::NetworkError {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Whether this error came from fetching candidates rather than from setup.
    pub fn is_lookup_failure(&self) -> bool {
        !matches!(self, Self::ConfigError { .. })
    }
}
