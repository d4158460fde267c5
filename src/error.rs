//! Custom error types for Waypoint.
//!
//! This module provides structured error types that enable better
//! error handling, reporting, and recovery throughout the application.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Waypoint operations
#[derive(Error, Debug)]
pub enum WaypointError {
    // =========================================================================
    // Input Errors
    // =========================================================================
    /// Missing required file
    #[error("Missing required file: {path}")]
    MissingFile { path: PathBuf },

    /// Checkpoint filename doesn't follow the expected naming convention
    #[error("Invalid checkpoint filename format: {filename}")]
    InvalidCheckpointFilename { filename: String },

    // =========================================================================
    // Merge Errors
    // =========================================================================
    /// Index document lacks the entry insertion anchor
    #[error("Could not find '{anchor}' section in index document")]
    MissingAnchor { anchor: String },

    // =========================================================================
    // Report Errors
    // =========================================================================
    /// Target report file already exists
    #[error("Report already exists, refusing to overwrite: {path}")]
    ReportExists { path: PathBuf },

    /// Template problem
    #[error("Template error: {message}")]
    Template { message: String },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Failed to load project settings
    #[error("Settings error: {message}")]
    Settings {
        message: String,
        path: Option<PathBuf>,
    },

    // =========================================================================
    // Wrapped Errors
    // =========================================================================
    /// IO error wrapper
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON error wrapper
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WaypointError {
    // =========================================================================
    // Constructor helpers
    // =========================================================================

    /// Create a missing-file error
    pub fn missing_file(path: impl Into<PathBuf>) -> Self {
        Self::MissingFile { path: path.into() }
    }

    /// Create an invalid checkpoint filename error
    pub fn invalid_checkpoint_filename(filename: impl Into<String>) -> Self {
        Self::InvalidCheckpointFilename {
            filename: filename.into(),
        }
    }

    /// Create a missing-anchor error
    pub fn missing_anchor(anchor: impl Into<String>) -> Self {
        Self::MissingAnchor {
            anchor: anchor.into(),
        }
    }

    /// Create a report-exists error
    pub fn report_exists(path: impl Into<PathBuf>) -> Self {
        Self::ReportExists { path: path.into() }
    }

    /// Create a template error
    pub fn template(message: impl Into<String>) -> Self {
        Self::Template {
            message: message.into(),
        }
    }

    /// Create a settings error
    pub fn settings(message: impl Into<String>) -> Self {
        Self::Settings {
            message: message.into(),
            path: None,
        }
    }

    /// Create a settings error with path
    pub fn settings_with_path(message: impl Into<String>, path: PathBuf) -> Self {
        Self::Settings {
            message: message.into(),
            path: Some(path),
        }
    }

    // =========================================================================
    // Classification helpers
    // =========================================================================

    /// Check if this error indicates malformed structure in an input document
    pub fn is_malformed_structure(&self) -> bool {
        matches!(
            self,
            Self::InvalidCheckpointFilename { .. } | Self::MissingAnchor { .. }
        )
    }

    /// Get error code for exit status
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidCheckpointFilename { .. } | Self::MissingAnchor { .. } => 2,
            Self::ReportExists { .. } => 3,
            Self::MissingFile { .. } => 6,
            Self::Template { .. } | Self::Settings { .. } => 7,
            _ => 1,
        }
    }
}

/// Type alias for Waypoint results
pub type Result<T> = std::result::Result<T, WaypointError>;
