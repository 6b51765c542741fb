//! Likelihood map to candidate rectangles: thresholding, closing and
//! external contour extraction.

use crate::processors::ProbabilityMap;
use crate::processors::geometry::Rect;
use crate::utils::tensor::MapShape;
use image::{GrayImage, Luma};
use imageproc::contours::{BorderType, find_contours};
use imageproc::morphology::{Mask, grayscale_close};

/// Below this foreground ratio the map counts as sparse.
const SPARSE_RATIO: f32 = 0.003;
/// Above this foreground ratio the map counts as dense.
const DENSE_RATIO: f32 = 0.08;
/// Largest kernel side accepted by a morphology mask.
const MAX_KERNEL_SIDE: u32 = 255;

/// Picks the binarization threshold from the map's foreground density.
///
/// Returns `(threshold, foreground_ratio)` where the ratio is the fraction
/// of pixels strictly above `base`. Sparse maps lower the threshold to
/// `max(0.15, base * 0.8)`; dense maps raise it to `min(0.75, base * 1.2)`.
pub fn adaptive_threshold(map: &ProbabilityMap, base: f32) -> (f32, f32) {
    if map.is_empty() {
        return (base, 0.0);
    }
    let above = map.iter().filter(|&&v| v > base).count();
    let ratio = above as f32 / map.len() as f32;

    let threshold = if ratio < SPARSE_RATIO {
        (base * 0.8).max(0.15)
    } else if ratio > DENSE_RATIO {
        (base * 1.2).min(0.75)
    } else {
        base
    };
    (threshold, ratio)
}

#[inline]
fn odd_at_least(v: i32) -> i32 {
    if v % 2 == 0 { v + 1 } else { v }
}

/// Rectangular closing kernel `(kx, ky)` for a map, both odd.
///
/// Roughly 1.2% of the width by 0.6% of the height, scaled by 1.0 for
/// foreground ratios under 1%, 1.5 above 6% and 1.2 in between.
pub fn closing_kernel(shape: MapShape, foreground_ratio: f32) -> (u32, u32) {
    let kscale = if foreground_ratio < 0.01 {
        1.0
    } else if foreground_ratio > 0.06 {
        1.5
    } else {
        1.2
    };
    let kx = odd_at_least(((shape.width as f32 * 0.012 * kscale).round() as i32).max(3));
    let ky = odd_at_least(((shape.height as f32 * 0.006 * kscale).round() as i32).max(1));
    (
        (kx as u32).min(MAX_KERNEL_SIDE),
        (ky as u32).min(MAX_KERNEL_SIDE),
    )
}

/// Binarizes `map` at `threshold` (strictly greater is foreground) and closes
/// the result with a `kx`×`ky` rectangle.
pub fn binarize_and_close(map: &ProbabilityMap, threshold: f32, kernel: (u32, u32)) -> GrayImage {
    let (height, width) = map.dim();
    let binary = GrayImage::from_fn(width as u32, height as u32, |x, y| {
        if map[[y as usize, x as usize]] > threshold {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    });

    let (kx, ky) = kernel;
    if kx <= 1 && ky <= 1 {
        return binary;
    }
    let footprint = GrayImage::from_pixel(kx, ky, Luma([255u8]));
    let mask = Mask::from_image(&footprint, (kx / 2) as u8, (ky / 2) as u8);
    grayscale_close(&binary, &mask)
}

/// Bounding rects of the outermost contours in a binary mask.
///
/// Hole borders and contours nested inside holes are ignored. Empty rects
/// are dropped.
pub fn external_rects(mask: &GrayImage) -> Vec<Rect> {
    find_contours::<u32>(mask)
        .iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .filter_map(Rect::from_contour)
        .filter(|r| !r.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn map_with_block(h: usize, w: usize, block: Rect, value: f32) -> ProbabilityMap {
        let mut map = Array2::<f32>::zeros((h, w));
        for y in block.y..block.bottom() {
            for x in block.x..block.right() {
                map[[y as usize, x as usize]] = value;
            }
        }
        map
    }

    #[test]
    fn test_adaptive_threshold_sparse() {
        // 1 foreground pixel of 4000 -> ratio 0.00025.
        let map = map_with_block(40, 100, Rect::new(0, 0, 1, 1), 0.9);
        let (thr, ratio) = adaptive_threshold(&map, 0.3);
        assert!(ratio < SPARSE_RATIO);
        assert!((thr - 0.24).abs() < 1e-6);

        // The floor applies when base * 0.8 is small.
        let (thr, _) = adaptive_threshold(&map, 0.1);
        assert_eq!(thr, 0.15);
    }

    #[test]
    fn test_adaptive_threshold_dense() {
        // 1000 of 4000 pixels -> ratio 0.25.
        let map = map_with_block(40, 100, Rect::new(0, 0, 100, 10), 0.9);
        let (thr, ratio) = adaptive_threshold(&map, 0.3);
        assert_eq!(ratio, 0.25);
        assert!((thr - 0.36).abs() < 1e-6);

        let (thr, _) = adaptive_threshold(&map, 0.7);
        assert_eq!(thr, 0.75);
    }

    #[test]
    fn test_adaptive_threshold_unchanged() {
        let map = map_with_block(40, 100, Rect::new(5, 10, 30, 10), 0.9);
        let (thr, ratio) = adaptive_threshold(&map, 0.3);
        assert_eq!(ratio, 0.075);
        assert_eq!(thr, 0.3);
    }

    #[test]
    fn test_closing_kernel() {
        assert_eq!(closing_kernel(MapShape::new(544, 960), 0.005), (13, 3));
        assert_eq!(closing_kernel(MapShape::new(544, 960), 0.03), (15, 5));
        assert_eq!(closing_kernel(MapShape::new(544, 960), 0.07), (17, 5));
        assert_eq!(closing_kernel(MapShape::new(40, 100), 0.075), (3, 1));
    }

    #[test]
    fn test_closing_joins_characters() {
        // Two glyph blocks separated by a 2px gap become one blob.
        let mut map = map_with_block(20, 60, Rect::new(10, 5, 8, 8), 0.9);
        for y in 5..13 {
            for x in 20..28 {
                map[[y, x]] = 0.9;
            }
        }
        let mask = binarize_and_close(&map, 0.3, (5, 1));
        let rects = external_rects(&mask);
        assert_eq!(rects, vec![Rect::new(10, 5, 18, 8)]);

        let open = binarize_and_close(&map, 0.3, (1, 1));
        assert_eq!(external_rects(&open).len(), 2);
    }

    #[test]
    fn test_external_rects_ignore_holes() {
        // A ring with a filled dot inside its hole.
        let mut map = map_with_block(30, 30, Rect::new(5, 5, 20, 20), 0.9);
        for y in 8..22 {
            for x in 8..22 {
                map[[y, x]] = 0.0;
            }
        }
        map[[15, 15]] = 0.9;
        let mask = binarize_and_close(&map, 0.3, (1, 1));
        assert_eq!(external_rects(&mask), vec![Rect::new(5, 5, 20, 20)]);
    }

    #[test]
    fn test_external_rects_empty_mask() {
        let mask = GrayImage::new(10, 10);
        assert!(external_rects(&mask).is_empty());
    }
}
