//! Error types for connstat.

use std::path::{Path, PathBuf};

/// Errors that can occur while building, connecting or testing networks.
///
/// All error variants are marked with `#[non_exhaustive]` to allow
/// adding new error types without breaking changes.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A kernel or network parameter is out of range or unknown.
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name
        name: String,
        /// What went wrong
        message: String,
    },

    /// A backend does not support the requested feature.
    #[error("{backend} does not support {feature}")]
    Unsupported {
        /// Backend that rejected the request
        backend: String,
        /// Description of the unsupported feature
        feature: String,
    },

    /// Generic validation failure.
    #[error("Validation error: {message}")]
    Validation {
        /// What went wrong
        message: String,
    },

    /// A statistical test was given no observations.
    #[error("Cannot run {test} on an empty sample")]
    EmptySample {
        /// Name of the test
        test: &'static str,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// I/O error without path context
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error on a specific file
    #[error("I/O error on {path}: {source}")]
    IoWithPath {
        /// File that caused the error
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// CSV output error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience `Result` type alias for connstat operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a new invalid-parameter error.
    pub fn invalid_parameter<N, M>(name: N, message: M) -> Self
    where
        N: Into<String>,
        M: Into<String>,
    {
        Error::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a new unsupported-feature error.
    pub fn unsupported<B, F>(backend: B, feature: F) -> Self
    where
        B: Into<String>,
        F: Into<String>,
    {
        Error::Unsupported {
            backend: backend.into(),
            feature: feature.into(),
        }
    }

    /// Creates a new validation error.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Error::Validation {
            message: message.into(),
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Wraps an I/O error with the path it occurred on.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::IoWithPath {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
