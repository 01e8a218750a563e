//! Structured error types for fragment loading and merging.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Fragment loading
    FragmentUnreadable,
    FragmentParseFailed,
    FragmentNotMapping,
    UnsupportedFormat,

    // Input shape
    InvalidInput,

    // Internal errors
    InternalError,
}

/// Failure to turn a file into a fragment.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path} does not contain a mapping at its root (found {found})")]
    NotAMapping { path: PathBuf, found: &'static str },

    #[error("no loader for {path}")]
    UnsupportedFormat { path: PathBuf },
}

impl LoadError {
    pub fn path(&self) -> &Path {
        match self {
            LoadError::Read { path, .. }
            | LoadError::Yaml { path, .. }
            | LoadError::Json { path, .. }
            | LoadError::NotAMapping { path, .. }
            | LoadError::UnsupportedFormat { path } => path,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            LoadError::Read { .. } => ErrorCode::FragmentUnreadable,
            LoadError::Yaml { .. } | LoadError::Json { .. } => ErrorCode::FragmentParseFailed,
            LoadError::NotAMapping { .. } => ErrorCode::FragmentNotMapping,
            LoadError::UnsupportedFormat { .. } => ErrorCode::UnsupportedFormat,
        }
    }
}

/// Failure of a merge-many call.
#[derive(Debug, Error)]
pub enum MergeError {
    /// A fragment could not be loaded; processing stopped at `root`.
    #[error("aborted merging {root}: {source}")]
    Load {
        root: PathBuf,
        #[source]
        source: LoadError,
    },

    #[error("{0}")]
    InvalidInput(String),
}

impl MergeError {
    pub fn code(&self) -> ErrorCode {
        match self {
            MergeError::Load { source, .. } => source.code(),
            MergeError::InvalidInput(_) => ErrorCode::InvalidInput,
        }
    }
}

/// Serializable error summary for structured CLI output.
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl ErrorReport {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn internal(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::InternalError, err.to_string())
    }
}

impl From<&MergeError> for ErrorReport {
    fn from(err: &MergeError) -> Self {
        let report = ErrorReport::new(err.code(), err.to_string());
        match err {
            MergeError::Load { source, .. } => report.with_path(source.path()),
            MergeError::InvalidInput(_) => report,
        }
    }
}

impl From<anyhow::Error> for ErrorReport {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<MergeError>() {
            Ok(merge_err) => ErrorReport::from(&merge_err),
            Err(err) => ErrorReport::internal(format!("{:#}", err)),
        }
    }
}

/// Result type for engine operations.
pub type MergeResult<T> = std::result::Result<T, MergeError>;
