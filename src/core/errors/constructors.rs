//! Error constructor utilities.
//!
//! Ergonomic helpers for creating [`OCRError`] instances with consistent
//! context strings.
//!
//! ```rust
//! use ocr_postprocess::core::OCRError;
//!
//! let err = OCRError::config_error_detailed("charset", "cannot read dict.txt");
//! assert!(err.to_string().contains("charset"));
//! assert!(err.is_fatal());
//! ```

use super::types::{OCRError, ProcessingStage};

impl OCRError {
    /// Creates an OCRError tagged with an explicit processing stage.
    pub fn processing_error(
        kind: ProcessingStage,
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind,
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates an OCRError for invalid input.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates an OCRError for configuration errors.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Creates a configuration error with enhanced context and details.
    ///
    /// # Arguments
    ///
    /// * `context` - High-level description of what was being configured
    /// * `details` - Specific details about what went wrong
    pub fn config_error_detailed(context: impl Into<String>, details: impl Into<String>) -> Self {
        Self::ConfigError {
            message: format!("{}: {}", context.into(), details.into()),
        }
    }

    /// Returns true if this error should abort initialization.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ConfigError { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_detailed_message() {
        let err = OCRError::config_error_detailed("charset", "file is not valid UTF-8");
        assert_eq!(
            err.to_string(),
            "configuration: charset: file is not valid UTF-8"
        );
        assert!(err.is_fatal());
    }

    #[test]
    fn test_processing_error_carries_stage() {
        let io = std::io::Error::other("short read");
        let err = OCRError::processing_error(ProcessingStage::Recognition, "decode", io);
        assert_eq!(err.to_string(), "text recognition failed: decode");
        assert!(!err.is_fatal());
    }
}
