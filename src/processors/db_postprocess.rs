//! Post-processing for DB-style text likelihood maps.
//!
//! [`TextRegionDetector`] turns a per-pixel text likelihood map into
//! normalized `text_region` detections: adaptive binarization, rectangular
//! closing, external contours, same-row merging, box growth, filtering and
//! a non-empty fallback. Supporting functionality (bitmap extraction,
//! merging and growth, scoring) is split across helper modules within this
//! directory.

#[path = "db_bitmap.rs"]
mod db_bitmap;
#[path = "db_merge.rs"]
mod db_merge;
#[path = "db_score.rs"]
mod db_score;

pub use db_bitmap::{adaptive_threshold, binarize_and_close, closing_kernel, external_rects};
pub use db_merge::{
    MIN_VERTICAL_OVERLAP, fallback_rect, grow_rect, median_height, merge_gap, merge_horizontal,
};
pub use db_score::region_score;

use crate::core::{OcrParams, OcrResult};
use crate::domain::{BBox, Detection, Roi};
use crate::processors::ProbabilityMap;
use crate::processors::geometry::Rect;
use crate::utils::tensor::{MapShape, probability_map, resolve_map_shape};
use tracing::{debug, warn};

/// Accepted aspect ratio range for candidate boxes.
const ASPECT_RANGE: (f32, f32) = (0.6, 80.0);
/// Aspect ratio above which the score floor is relaxed.
const ELONGATED_ASPECT: f32 = 16.0;
/// Number of rects kept when every candidate is filtered out.
const FALLBACK_KEEP: usize = 2;

/// Result of running the detector on one ROI.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectionOutcome {
    /// Detections in ROI-normalized frame coordinates.
    pub detections: Vec<Detection>,
    /// True when the detections come from the fallback path.
    pub used_fallback: bool,
    /// The ROI's scaling bbox should be cleared after attaching.
    pub clear_scaling_bbox: bool,
}

/// A candidate surviving geometry and score filters, in map pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ScoredRect {
    rect: Rect,
    score: f32,
}

/// Per-map filter thresholds.
#[derive(Debug, Clone, Copy)]
struct CandidateFilter {
    min_height: i32,
    min_area: f32,
    min_side: f32,
    box_thresh: f32,
}

impl CandidateFilter {
    fn new(shape: MapShape, median_h: i32, min_side: f32, box_thresh: f32) -> Self {
        let mh = median_h as f32;
        Self {
            min_height: ((shape.height as f32 * 0.01).round() as i32).max(3),
            min_area: (mh * mh * 0.4).max(80.0),
            min_side,
            box_thresh,
        }
    }

    /// Score floor for a rect of the given aspect ratio.
    fn score_floor(&self, aspect: f32) -> f32 {
        if aspect > ELONGATED_ASPECT {
            (self.box_thresh - 0.15).max(0.45)
        } else {
            self.box_thresh
        }
    }

    /// Reason the candidate is rejected, if any.
    fn rejection(&self, rect: &Rect, score: f32) -> Option<String> {
        let aspect = rect.aspect_ratio();
        let area = rect.area() as f32;
        if rect.height < self.min_height {
            return Some(format!("height {} < {}", rect.height, self.min_height));
        }
        if area < self.min_area {
            return Some(format!("area {} < {}", area, self.min_area));
        }
        if !(ASPECT_RANGE.0..=ASPECT_RANGE.1).contains(&aspect) {
            return Some(format!("aspect {aspect:.2}"));
        }
        if (rect.width.min(rect.height) as f32) < self.min_side {
            return Some(format!("short side < {}", self.min_side));
        }
        let floor = self.score_floor(aspect);
        if score < floor {
            return Some(format!("score {score:.3} < {floor:.3}"));
        }
        None
    }
}

/// Text region detector for DB-style likelihood maps.
#[derive(Debug, Clone)]
pub struct TextRegionDetector {
    /// Base binarization threshold (default: 0.3).
    pub bin_thresh: f32,
    /// Base box score threshold (default: 0.6).
    pub box_thresh: f32,
    /// Maximum number of detections per map (default: 1000).
    pub max_candidates: usize,
    /// Minimum shorter side of an accepted box, in map pixels (default: 3.0).
    pub min_box_size: f32,
    /// Name of the likelihood-map tensor.
    pub output_name: String,
    /// Map shape used when the tensor shape cannot be resolved.
    pub fallback_shape: MapShape,
    /// Clear the ROI scaling bbox after attaching detections.
    pub letterbox_fix: bool,
}

impl TextRegionDetector {
    /// Creates a detector from shared parameters.
    pub fn new(params: &OcrParams) -> Self {
        Self {
            bin_thresh: params.det_bin_thresh,
            box_thresh: params.det_box_thresh,
            max_candidates: params.det_max_candidates.max(1),
            min_box_size: params.det_min_box_size,
            output_name: params.det_output_name.clone(),
            fallback_shape: MapShape::new(params.det_map_h, params.det_map_w),
            letterbox_fix: params.letterbox_fix,
        }
    }

    /// Detects text regions on a probability map.
    ///
    /// `roi_box` is the ROI's placement in frame coordinates; map pixels are
    /// scaled into it.
    pub fn detect_map(&self, map: &ProbabilityMap, roi_box: &BBox) -> Vec<Detection> {
        self.detect_in_map(map, roi_box).0
    }

    /// Detects text regions on the ROI's likelihood-map tensor.
    ///
    /// A ROI without tensors yields an empty outcome. A missing named tensor
    /// falls back to the ROI's first tensor with a warning.
    ///
    /// # Errors
    ///
    /// Fails when the tensor buffer is shorter than the resolved map.
    pub fn detect(&self, roi: &Roi) -> OcrResult<DetectionOutcome> {
        if !roi.has_tensors() {
            debug!("no tensors in ROI, skipping text detection");
            return Ok(DetectionOutcome::default());
        }
        let tensor = roi.tensor(&self.output_name).into_result()?;
        let shape = resolve_map_shape(&tensor.shape, self.fallback_shape);
        debug!(
            "det tensor '{}' shape {:?} resolved to {}x{}",
            tensor.name, tensor.shape, shape.height, shape.width
        );
        let map = probability_map(tensor, shape)?;

        let (detections, used_fallback) = self.detect_in_map(&map, &roi.flattened_bbox());
        let clear_scaling_bbox = self.letterbox_fix && !detections.is_empty();
        Ok(DetectionOutcome {
            detections,
            used_fallback,
            clear_scaling_bbox,
        })
    }

    /// Runs detection and attaches the results to `roi`.
    ///
    /// Failures are logged and produce no detections. Returns the number of
    /// detections added.
    pub fn apply(&self, roi: &mut Roi) -> usize {
        match self.detect(roi) {
            Ok(outcome) => {
                let count = outcome.detections.len();
                roi.add_detections(outcome.detections);
                if outcome.clear_scaling_bbox {
                    roi.clear_scaling_bbox();
                }
                count
            }
            Err(e) => {
                warn!("text detection skipped: {}", e);
                0
            }
        }
    }

    fn detect_in_map(&self, map: &ProbabilityMap, roi_box: &BBox) -> (Vec<Detection>, bool) {
        let (height, width) = map.dim();
        if height == 0 || width == 0 {
            return (Vec::new(), false);
        }
        let shape = MapShape::new(height, width);

        let (threshold, fg_ratio) = adaptive_threshold(map, self.bin_thresh);
        let kernel = closing_kernel(shape, fg_ratio);
        debug!(
            "bin_thr={:.3} (base {:.3}, fg_ratio {:.4}) close kernel {}x{}",
            threshold, self.bin_thresh, fg_ratio, kernel.0, kernel.1
        );
        let mask = binarize_and_close(map, threshold, kernel);

        let rects = external_rects(&mask);
        if rects.is_empty() {
            debug!("no contours found");
            return (Vec::new(), false);
        }

        let median_h = median_height(&rects);
        let gap = merge_gap(width, median_h);
        let cores = merge_horizontal(rects, gap, MIN_VERTICAL_OVERLAP);
        debug!(
            "{} rects after merge (gap {}, median_h {})",
            cores.len(),
            gap,
            median_h
        );

        let grown: Vec<(Rect, Rect)> = cores
            .iter()
            .map(|core| (*core, grow_rect(*core, median_h, shape)))
            .collect();

        let filter = CandidateFilter::new(shape, median_h, self.min_box_size, self.box_thresh);
        let mut kept = Vec::new();
        for (i, (core, rect)) in grown.iter().enumerate() {
            let score = region_score(map, core);
            if let Some(reason) = filter.rejection(rect, score) {
                debug!("drop rect#{} {:?}: {}", i, rect, reason);
                continue;
            }
            kept.push(ScoredRect { rect: *rect, score });
            if kept.len() >= self.max_candidates {
                debug!("reached max_candidates={}", self.max_candidates);
                break;
            }
        }

        let used_fallback = kept.is_empty();
        if used_fallback {
            kept = Self::fallback(map, shape, grown.iter().map(|(_, r)| *r), self.max_candidates);
            debug!("no survivors, fallback kept {} rects", kept.len());
        }

        let detections = kept
            .iter()
            .map(|c| Detection::text_region(Self::to_bbox(&c.rect, roi_box, shape), c.score))
            .collect();
        (detections, used_fallback)
    }

    /// Keeps up to two of the widest rects, minimally padded.
    fn fallback(
        map: &ProbabilityMap,
        shape: MapShape,
        rects: impl Iterator<Item = Rect>,
        max_candidates: usize,
    ) -> Vec<ScoredRect> {
        let mut rects: Vec<Rect> = rects.collect();
        rects.sort_by(|a, b| b.width.cmp(&a.width));
        rects
            .into_iter()
            .take(FALLBACK_KEEP.min(max_candidates))
            .map(|r| {
                let rect = fallback_rect(r, shape);
                ScoredRect {
                    rect,
                    score: region_score(map, &rect),
                }
            })
            .collect()
    }

    /// Maps a map-pixel rect into the ROI's frame coordinates.
    fn to_bbox(rect: &Rect, roi_box: &BBox, shape: MapShape) -> BBox {
        let sx = roi_box.width() / shape.width as f32;
        let sy = roi_box.height() / shape.height as f32;
        BBox::from_xywh(
            rect.x as f32 * sx + roi_box.xmin(),
            rect.y as f32 * sy + roi_box.ymin(),
            rect.width as f32 * sx,
            rect.height as f32 * sy,
        )
    }
}
