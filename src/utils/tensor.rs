//! Conversions from raw tensors to dense arrays.

use crate::core::{OCRError, OcrResult, ProcessingStage, Tensor};
use crate::processors::ProbabilityMap;
use ndarray::Array2;
use tracing::debug;

/// Height and width of a likelihood map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapShape {
    pub height: usize,
    pub width: usize,
}

impl MapShape {
    pub const fn new(height: usize, width: usize) -> Self {
        Self { height, width }
    }

    /// `height * width`, or `None` when the product overflows.
    pub fn pixel_count(&self) -> Option<usize> {
        self.height.checked_mul(self.width)
    }
}

/// Resolves the spatial dimensions of a likelihood-map tensor.
///
/// - rank 4: NCHW when dim 1 is 1, NHWC when dim 3 is 1, otherwise dims 2 and 3.
/// - rank 3: `[H, W, 1]` or `[1, H, W]`; with no singleton at either end the
///   two largest dims are taken in ascending order as H and W.
/// - rank 2: `[H, W]`.
/// - anything else: `fallback`.
///
/// A resolved width of at most 4 with a height above 16 is treated as a
/// transposed map and swapped.
pub fn resolve_map_shape(shape: &[usize], fallback: MapShape) -> MapShape {
    let (height, width) = match *shape {
        [_, 1, h, w] => (h, w),
        [_, h, w, 1] => (h, w),
        [_, _, h, w] => (h, w),
        [h, w, 1] => (h, w),
        [1, h, w] => (h, w),
        [a, b, c] => {
            let mut dims = [a, b, c];
            dims.sort_unstable();
            (dims[1], dims[2])
        }
        [h, w] => (h, w),
        _ => (fallback.height, fallback.width),
    };

    if width <= 4 && height > 16 {
        debug!("map shape {height}x{width} looks transposed, swapping");
        MapShape::new(width, height)
    } else {
        MapShape::new(height, width)
    }
}

/// Builds an H×W probability map from the first `H*W` elements of `tensor`.
///
/// # Errors
///
/// `InvalidInput` for an empty or oversized map, `BufferTooSmall` when the buffer holds
/// fewer than `H*W` bytes.
pub fn probability_map(tensor: &Tensor, shape: MapShape) -> OcrResult<ProbabilityMap> {
    let pixels = shape.pixel_count().ok_or_else(|| {
        OCRError::invalid_input(format!(
            "tensor '{}' declares an oversized map ({}x{})",
            tensor.name, shape.height, shape.width
        ))
    })?;
    if pixels == 0 {
        return Err(OCRError::invalid_input(format!(
            "tensor '{}' resolves to an empty map ({}x{})",
            tensor.name, shape.height, shape.width
        )));
    }
    let values = tensor.dequantized(pixels)?;
    Array2::from_shape_vec((shape.height, shape.width), values).map_err(|e| {
        OCRError::processing_error(ProcessingStage::Detection, "reshape likelihood map", e)
    })
}
