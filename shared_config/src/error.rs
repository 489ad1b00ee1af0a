//! Error types produced by the configuration store.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading, mutating, or saving configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("configuration file not found: '{}'", .path.display())]
    NotFound {
        /// Path that was requested.
        path: PathBuf,
    },

    /// The file extension does not name a supported format.
    #[error(
        "unsupported configuration format for '{}': expected .yaml, .yml or .json",
        .path.display()
    )]
    Format {
        /// Path whose extension was rejected.
        path: PathBuf,
    },

    /// The file content is not valid for its declared format, or its top
    /// level is not a mapping.
    #[error("failed to parse configuration file '{}': {source}", .path.display())]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying parser error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A key path descends through a value that is not a mapping.
    #[error("type conflict at '{path}': expected a mapping, found {found}")]
    Type {
        /// Key path of the conflicting value.
        path: String,
        /// Kind of value found where a mapping was required.
        found: &'static str,
    },

    /// The key path is empty or contains an empty segment.
    #[error("invalid key path '{key}': {reason}")]
    InvalidKey {
        /// Key path as supplied by the caller.
        key: String,
        /// Why the key path was rejected.
        reason: &'static str,
    },

    /// Reading the configuration file failed for a reason other than absence.
    #[error("failed to read configuration file '{}': {source}", .path.display())]
    Read {
        /// File being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Writing the configuration file failed.
    #[error("failed to write configuration file '{}': {source}", .path.display())]
    Write {
        /// Destination file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration could not be rendered in the destination format.
    #[error("failed to serialise configuration for '{}': {source}", .path.display())]
    Serialize {
        /// Destination file.
        path: PathBuf,
        /// Underlying serialiser error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The `.env` file exists but could not be read or parsed.
    #[error("failed to load environment file '{}': {source}", .path.display())]
    Dotenv {
        /// Location of the `.env` file.
        path: PathBuf,
        /// Underlying `dotenvy` error.
        #[source]
        source: dotenvy::Error,
    },

    /// Stored data could not be deserialised into the requested type.
    #[error("failed to extract configuration: {0}")]
    Extract(#[from] serde_json::Error),
}

impl ConfigError {
    /// Construct a [`ConfigError::Parse`] for `path`.
    pub(crate) fn parse(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Parse {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Construct a [`ConfigError::Serialize`] for `path`.
    pub(crate) fn serialize(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Serialize {
            path: path.into(),
            source: source.into(),
        }
    }
}
