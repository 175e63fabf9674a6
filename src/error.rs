//! Error types for the mattertime library
//!
//! The upsert core never fails. Everything around it (reading front matter
//! values, loading settings, touching files) reports through [`MatterTimeError`].

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for all library operations
#[derive(Error, Debug)]
pub enum MatterTimeError {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File not found or invalid path
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Front matter that exists but cannot be read as a YAML mapping
    #[error("Malformed front matter: {reason}")]
    MalformedFrontMatter { reason: String },

    /// Key that the line-oriented upsert cannot represent
    #[error("Invalid key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },

    /// Value that the line-oriented upsert cannot represent
    #[error("Invalid value {value:?}: {reason}")]
    InvalidValue { value: String, reason: String },

    /// strftime pattern chrono cannot render
    #[error("Invalid date format: {format:?}")]
    InvalidDateFormat { format: String },

    /// Settings that parse but make no sense
    #[error("Invalid settings: {message}")]
    InvalidSettings { message: String },

    /// Path resolution errors
    #[error("Path resolution error: {reason}")]
    PathResolution { reason: String },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, MatterTimeError>;

impl MatterTimeError {
    /// Create a new file not found error
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a new malformed front matter error
    pub fn malformed_front_matter(reason: impl Into<String>) -> Self {
        Self::MalformedFrontMatter {
            reason: reason.into(),
        }
    }

    /// Create a new invalid key error
    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a new invalid value error
    pub fn invalid_value(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a new invalid date format error
    pub fn invalid_date_format(format: impl Into<String>) -> Self {
        Self::InvalidDateFormat {
            format: format.into(),
        }
    }

    /// Create a new invalid settings error
    pub fn invalid_settings(message: impl Into<String>) -> Self {
        Self::InvalidSettings {
            message: message.into(),
        }
    }

    /// Create a new path resolution error
    pub fn path_resolution(reason: impl Into<String>) -> Self {
        Self::PathResolution {
            reason: reason.into(),
        }
    }

    /// Whether a bulk run should keep going after this error
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(io_err) => !matches!(
                io_err.kind(),
                std::io::ErrorKind::PermissionDenied | std::io::ErrorKind::OutOfMemory
            ),
            Self::FileNotFound { .. } | Self::MalformedFrontMatter { .. } => true,
            Self::Json(_)
            | Self::InvalidKey { .. }
            | Self::InvalidValue { .. }
            | Self::InvalidDateFormat { .. }
            | Self::InvalidSettings { .. }
            | Self::PathResolution { .. } => false,
        }
    }
}
