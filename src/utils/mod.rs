//! Utility functions for the OCR post-processing stages.
//!
//! This module provides the charset loader, tensor-to-array conversions and
//! logging setup.

pub mod dict;
pub mod tensor;

pub use dict::{BLANK_TOKEN, Charset};
pub use tensor::{MapShape, probability_map, resolve_map_shape};

/// Initializes the tracing subscriber for logging.
///
/// This function sets up the tracing subscriber with environment filter and formatting layer.
/// It's typically called at the start of an application to enable logging.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
