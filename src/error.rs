//! Error handling for imgprep
//!
//! Per-file errors (`Decode`, `Write`) are recoverable: the dataset walker
//! logs them and moves on. Everything else means the pipeline itself is
//! misconfigured and aborts the run.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for imgprep operations
pub type Result<T> = std::result::Result<T, PrepError>;

/// Main error type for imgprep operations
#[derive(Error, Debug)]
pub enum PrepError {
    // File Errors
    #[error("Failed to decode image {path}: {reason}")]
    Decode {
        path: PathBuf,
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Failed to write image {path}: {reason}")]
    Write {
        path: PathBuf,
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Transform Errors
    #[error("Shape error in {operation}: {reason}")]
    Shape {
        operation: &'static str,
        reason: String,
    },

    // Configuration Errors
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PrepError {
    /// Shorthand for a `Shape` error.
    pub fn shape(operation: &'static str, reason: impl Into<String>) -> Self {
        PrepError::Shape {
            operation,
            reason: reason.into(),
        }
    }

    /// Shorthand for a `Config` error.
    pub fn config(reason: impl Into<String>) -> Self {
        PrepError::Config {
            reason: reason.into(),
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            PrepError::Decode { .. } => "DECODE_ERROR",
            PrepError::Write { .. } => "WRITE_ERROR",
            PrepError::Shape { .. } => "SHAPE_ERROR",
            PrepError::Config { .. } => "CONFIG_ERROR",
            PrepError::Io(_) => "IO_ERROR",
            PrepError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error only concerns a single file.
    ///
    /// Recoverable errors are skipped by the dataset walker; the rest abort
    /// the batch.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PrepError::Decode { .. } | PrepError::Write { .. })
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            PrepError::Decode { .. } => vec![
                "Check that the file is a valid JPEG or PNG image",
                "The file may be truncated - try re-downloading the dataset",
            ],
            PrepError::Write { .. } => vec![
                "Check write permissions on the destination root",
                "Free up disk space",
            ],
            PrepError::Shape { .. } => vec![
                "Add a grayscale step before any denoise step",
                "Check kernel channel counts against the input image",
            ],
            PrepError::Config { .. } => vec![
                "Run 'imgprep init-config' to generate a valid configuration",
                "Known tiers: 64, 128, 256, original-images (optionally -gray/-bw)",
            ],
            _ => vec![],
        }
    }
}
