//! FRZ-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, FrzError>;

/// Top-level error type for the freezer tracker.
#[derive(Debug, Error)]
pub enum FrzError {
    #[error("[FRZ-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[FRZ-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[FRZ-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[FRZ-2001] freezer index {index} out of range (have {count})")]
    FreezerOutOfRange { index: usize, count: usize },

    #[error("[FRZ-2002] slot index {index} out of range (have {count})")]
    SlotOutOfRange { index: usize, count: usize },

    #[error("[FRZ-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[FRZ-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[FRZ-3900] runtime failure: {details}")]
    Runtime { details: String },
}

impl FrzError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "FRZ-1001",
            Self::MissingConfig { .. } => "FRZ-1002",
            Self::ConfigParse { .. } => "FRZ-1003",
            Self::FreezerOutOfRange { .. } => "FRZ-2001",
            Self::SlotOutOfRange { .. } => "FRZ-2002",
            Self::Serialization { .. } => "FRZ-2101",
            Self::Io { .. } => "FRZ-3002",
            Self::Runtime { .. } => "FRZ-3900",
        }
    }

    /// Whether the failure came from caller-supplied configuration or
    /// coordinates rather than the environment.
    #[must_use]
    pub const fn is_user_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig { .. }
                | Self::MissingConfig { .. }
                | Self::ConfigParse { .. }
                | Self::FreezerOutOfRange { .. }
                | Self::SlotOutOfRange { .. }
        )
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for FrzError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for FrzError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}
