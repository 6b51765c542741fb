//! Input Validation Utilities
//!
//! Checks applied to tensor metadata before a stage indexes into raw
//! buffers.

use crate::core::OCRError;

/// Validates tensor rank.
pub fn validate_tensor_shape(
    shape: &[usize],
    expected_dims: usize,
    tensor_name: &str,
) -> Result<(), OCRError> {
    if shape.len() != expected_dims {
        return Err(OCRError::InvalidInput {
            message: format!(
                "Tensor '{}' expected {}D shape, got {}D: {:?}",
                tensor_name,
                expected_dims,
                shape.len(),
                shape
            ),
        });
    }
    Ok(())
}

/// Validates that a buffer holds at least `expected` elements.
pub fn validate_buffer_len(actual: usize, expected: usize) -> Result<(), OCRError> {
    if actual < expected {
        return Err(OCRError::BufferTooSmall { expected, actual });
    }
    Ok(())
}
