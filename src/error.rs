use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the pagegen library.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// IO error with context about the file path.
    #[error("IO error accessing '{path}': {message}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// Configuration validation error.
    #[error("Invalid configuration: {message}")]
    Config {
        /// Detailed error message
        message: String,
    },

    /// Plan file could not be parsed or has the wrong shape.
    #[error("Failed to load plan '{path}': {message}")]
    Plan {
        /// Path to the plan file
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// A request record lacks a required field.
    #[error("request #{index} is missing required field '{field}'")]
    MissingField {
        /// Zero-based position of the record in the plan
        index: usize,
        /// Name of the missing field
        field: String,
    },

    /// A request record carries a field of the wrong shape or type.
    #[error("request #{index} has invalid field '{field}': {message}")]
    InvalidField {
        /// Zero-based position of the record in the plan
        index: usize,
        /// Name of the offending field
        field: String,
        /// Error message
        message: String,
    },

    /// Completion API failure: transport, non-success status, or a
    /// malformed response body.
    #[error("completion API error: {message}")]
    Api {
        /// Error message
        message: String,
    },

    /// A title no path segment can be derived from.
    #[error("cannot derive a path segment from hyphenated title '{title}'")]
    Slug {
        /// The offending title
        title: String,
    },
}

impl Error {
    /// Creates an IO error with path context.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a plan loading error.
    #[must_use]
    pub fn plan(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Plan {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a missing-field error for a request record.
    #[must_use]
    pub fn missing_field(index: usize, field: impl Into<String>) -> Self {
        Self::MissingField {
            index,
            field: field.into(),
        }
    }

    /// Creates an invalid-field error for a request record.
    #[must_use]
    pub fn invalid_field(
        index: usize,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidField {
            index,
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a completion API error.
    #[must_use]
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Creates a slug derivation error.
    #[must_use]
    pub fn slug(title: impl Into<String>) -> Self {
        Self::Slug {
            title: title.into(),
        }
    }

    /// Returns true if this is an IO error.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }

    /// Returns true if this is a completion API error.
    #[must_use]
    pub const fn is_api(&self) -> bool {
        matches!(self, Self::Api { .. })
    }
}

// Conversion implementations for convenient error handling
impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Api {
            message: e.to_string(),
        }
    }
}
