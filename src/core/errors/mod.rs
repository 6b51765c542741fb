//! Error types for the post-processing engine.
//!
//! # Usage
//!
//! ```rust
//! use ocr_postprocess::core::errors::{OCRError, ProcessingStage};
//!
//! let error = OCRError::processing_error(
//!     ProcessingStage::Recognition,
//!     "Failed to reshape recognition tensor",
//!     std::io::Error::new(std::io::ErrorKind::InvalidData, "Invalid tensor shape"),
//! );
//! assert!(matches!(
//!     error,
//!     OCRError::Processing { kind: ProcessingStage::Recognition, .. }
//! ));
//! assert!(!error.is_fatal());
//! ```

pub mod constructors;
pub mod types;

pub use types::{OCRError, ProcessingStage};

/// Convenient result alias for post-processing operations.
pub type OcrResult<T> = Result<T, OCRError>;
