//! Core error types for the post-processing engine.
//!
//! This module defines the fundamental error types used by every stage:
//! the main [`OCRError`] enum and the [`ProcessingStage`] marker used to tag
//! where a processing failure happened.

use thiserror::Error;

/// Enum representing different stages of post-processing.
///
/// Used to identify which stage an error occurred in, providing context for
/// logging and error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Error occurred while detecting text regions.
    Detection,
    /// Error occurred while decoding a recognition sequence.
    Recognition,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::Detection => write!(f, "text detection"),
            ProcessingStage::Recognition => write!(f, "text recognition"),
        }
    }
}

/// Enum representing the errors that can occur in the post-processing engine.
///
/// Initialization errors (configuration, charset) are fatal for the caller.
/// Per-frame stages surface the remaining variants only through their pure
/// APIs; the ROI-level entry points log them and produce no results.
#[derive(Error, Debug)]
pub enum OCRError {
    /// Error occurred during processing.
    #[error("{kind} failed: {context}")]
    Processing {
        /// The stage of processing where the error occurred.
        kind: ProcessingStage,
        /// Additional context about the error.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration error.
        message: String,
    },

    /// Error indicating a tensor buffer is smaller than its declared shape.
    #[error("buffer too small: expected at least {expected} bytes, got {actual} bytes")]
    BufferTooSmall {
        /// The expected minimum buffer size.
        expected: usize,
        /// The actual buffer size.
        actual: usize,
    },

    /// A named tensor could not be found on a region of interest.
    #[error("tensor '{name}' not found (available: {available:?})")]
    TensorNotFound {
        /// The requested tensor name.
        name: String,
        /// Names of the tensors that were present.
        available: Vec<String>,
    },
}

impl From<crate::core::config::ConfigError> for OCRError {
    /// Converts a ConfigError to OCRError::ConfigError.
    fn from(error: crate::core::config::ConfigError) -> Self {
        Self::ConfigError {
            message: error.to_string(),
        }
    }
}
