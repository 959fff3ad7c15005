//! Error handling for soundbank.
//!
//! Import-time errors are per-file and never abort a batch; build-time and
//! settings-load errors abort their single operation.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for soundbank operations
pub type Result<T> = std::result::Result<T, SoundbankError>;

/// Main error type for soundbank operations
#[derive(Error, Debug)]
pub enum SoundbankError {
    // Import Errors
    #[error("Unsupported file format: {extension} (only .wav and .mp3 files are allowed)")]
    UnsupportedFormat { extension: String },

    #[error("Failed to decode {path}: {reason}")]
    DecodeError {
        path: PathBuf,
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Settings Errors
    #[error("Invalid settings document: {source}")]
    FormatError {
        #[source]
        source: serde_json::Error,
    },

    #[error("Missing audio file: {name} (expected at {path})")]
    MissingFile { name: String, path: PathBuf },

    // Entry Errors
    #[error("Invalid {field} range: begin {begin} is past end {end}")]
    InvalidRange {
        field: &'static str,
        begin: u32,
        end: u32,
    },

    // Build Errors
    #[error("Bank build failed: {reason}")]
    BuildError { reason: String },

    #[error("Invalid bank file {path}: {reason}")]
    InvalidBank { path: PathBuf, reason: String },

    // I/O Errors
    #[error("Failed to read file: {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}: {source}")]
    FileWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SoundbankError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            SoundbankError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            SoundbankError::DecodeError { .. } => "DECODE_ERROR",
            SoundbankError::FormatError { .. } => "FORMAT_ERROR",
            SoundbankError::MissingFile { .. } => "MISSING_FILE",
            SoundbankError::InvalidRange { .. } => "INVALID_RANGE",
            SoundbankError::BuildError { .. } => "BUILD_ERROR",
            SoundbankError::InvalidBank { .. } => "INVALID_BANK",
            SoundbankError::FileReadError { .. } => "FILE_READ_ERROR",
            SoundbankError::FileWriteError { .. } => "FILE_WRITE_ERROR",
            SoundbankError::Io(_) => "IO_ERROR",
        }
    }

    /// Whether this error is confined to a single file within a batch.
    ///
    /// Per-file errors are collected and reported while the rest of the
    /// batch continues; everything else aborts its operation.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            SoundbankError::UnsupportedFormat { .. }
                | SoundbankError::DecodeError { .. }
                | SoundbankError::MissingFile { .. }
        )
    }
}
