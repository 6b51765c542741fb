//! Raw inference output buffers.

use crate::core::OcrResult;
use crate::core::validation::validate_buffer_len;

/// Scale applied to 8-bit tensor elements.
pub const U8_SCALE: f32 = 1.0 / 255.0;

/// A named, read-only buffer produced by the inference stage.
///
/// Elements are unsigned 8-bit values linearly scaled to `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tensor {
    /// Output layer name.
    pub name: String,
    /// Dimensions, outermost first.
    pub shape: Vec<usize>,
    /// Row-major element data.
    pub data: Vec<u8>,
}

impl Tensor {
    /// Creates a tensor.
    pub fn new(name: impl Into<String>, shape: Vec<usize>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            shape,
            data,
        }
    }

    /// Returns the first `len` elements, failing when the buffer is shorter.
    pub fn require_len(&self, len: usize) -> OcrResult<&[u8]> {
        validate_buffer_len(self.data.len(), len)?;
        Ok(&self.data[..len])
    }

    /// Returns the first `len` elements scaled to `[0, 1]`.
    pub fn dequantized(&self, len: usize) -> OcrResult<Vec<f32>> {
        Ok(self
            .require_len(len)?
            .iter()
            .map(|&v| f32::from(v) * U8_SCALE)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OCRError;

    #[test]
    fn test_dequantized() {
        let t = Tensor::new("det_output", vec![1, 3], vec![0, 51, 255]);
        let values = t.dequantized(3).unwrap();
        assert_eq!(values[0], 0.0);
        assert!((values[1] - 0.2).abs() < 1e-6);
        assert_eq!(values[2], 1.0);
        assert_eq!(t.dequantized(2).unwrap().len(), 2);
        assert!(t.dequantized(4).is_err());
    }

    #[test]
    fn test_require_len() {
        let t = Tensor::new("rec_output", vec![1, 2, 2], vec![1, 2, 3]);
        assert!(matches!(
            t.require_len(4),
            Err(OCRError::BufferTooSmall {
                expected: 4,
                actual: 3
            })
        ));
        assert_eq!(t.require_len(2).unwrap(), &[1, 2]);
    }
}
