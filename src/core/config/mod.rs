//! Configuration management for the post-processing engine.
//!
//! This module provides the parameter type, validation traits, and the file
//! loader used at initialization.

pub mod errors;
pub mod loader;
pub mod params;

// Re-export commonly used types
pub use errors::{ConfigError, ConfigValidator, ConfigValidatorExt};
pub use loader::{ConfigFormat, ConfigLoader};
pub use params::OcrParams;
