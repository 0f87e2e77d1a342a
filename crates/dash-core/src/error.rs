//! Error types for the dashboard pipeline
//!
//! Provides error handling for:
//! - Upstream listing calls (network, auth, deadline, decode)
//! - Configuration loading and validation
//! - Snapshot file loading

use std::path::PathBuf;

/// Failure of one upstream listing call
///
/// Never escapes the degradation policy: a failing call turns into a zeroed
/// analytics record plus [`SourceError::diagnostic`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    /// Network failure or 5xx from the media server
    #[error("media server unavailable: {0}")]
    Unavailable(String),

    /// Credentials rejected
    #[error("media server rejected credentials: {0}")]
    Unauthorized(String),

    /// No response before the configured deadline
    #[error("{call} timed out after {after_ms}ms")]
    Timeout {
        /// Listing call that timed out
        call: &'static str,
        /// Deadline in milliseconds
        after_ms: u64,
    },

    /// Response did not decode into records, e.g. a negative participant count
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl SourceError {
    /// Short operator-facing description
    #[must_use]
    pub fn diagnostic(&self) -> String {
        self.to_string()
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`DashboardConfig`](crate::DashboardConfig)
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value failed validation
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
}

impl ConfigError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create validation error
    pub fn invalid(key: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key,
            message: message.into(),
        }
    }
}

/// Errors loading a snapshot file
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}
