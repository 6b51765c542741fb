//! The core module of the post-processing engine.
//!
//! This module contains the fundamental components shared by every stage:
//! - Configuration management
//! - Error handling
//! - Raw tensor representation
//! - Input validation helpers
//! - The initialization context

pub mod config;
pub mod context;
pub mod errors;
pub mod tensor;
pub mod validation;

pub use config::{ConfigError, ConfigLoader, ConfigValidator, OcrParams};
pub use context::OcrContext;
pub use errors::{OCRError, OcrResult, ProcessingStage};
pub use tensor::Tensor;
