//! Pre-crop adjustment of detected text regions.
//!
//! Before the surrounding pipeline crops each `text_region` out of the
//! frame, its box is optionally mapped back through the model letterbox,
//! checked against a minimum pixel size, stretched to a readable height and
//! padded.

use crate::domain::{BBox, Detection, Roi};
use tracing::{debug, warn};

#[inline]
fn clamp01(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}

/// Refinement limits, in image pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefineConfig {
    /// Maximum number of regions refined per ROI.
    pub max_regions: usize,
    /// Regions narrower than this are skipped.
    pub min_width_px: f32,
    /// Regions shorter than this are skipped.
    pub min_height_px: f32,
    /// Regions shorter than this are stretched vertically around their center.
    pub target_min_height_px: f32,
    pub pad_x_px: f32,
    pub pad_y_px: f32,
    /// Undo the square letterbox applied at model input.
    pub use_letterbox: bool,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            max_regions: 8,
            min_width_px: 4.0,
            min_height_px: 2.0,
            target_min_height_px: 12.0,
            pad_x_px: 4.0,
            pad_y_px: 2.0,
            use_letterbox: false,
        }
    }
}

/// Letterbox scale and offset derived from an image's aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetterboxTransform {
    pub scale: f32,
    pub pad_x: f32,
    pub pad_y: f32,
}

impl LetterboxTransform {
    /// Wide images (aspect >= 1) are offset horizontally, tall ones vertically.
    pub fn for_image(width: u32, height: u32) -> Self {
        let aspect = width as f32 / height as f32;
        if aspect >= 1.0 {
            let scale = 1.0 / aspect;
            Self {
                scale,
                pad_x: (1.0 - scale) * 0.5,
                pad_y: 0.0,
            }
        } else {
            Self {
                scale: aspect,
                pad_x: 0.0,
                pad_y: (1.0 - aspect) * 0.5,
            }
        }
    }

    /// Maps a letterboxed box back to image-relative coordinates.
    pub fn invert(&self, bbox: &BBox) -> BBox {
        BBox::new(
            clamp01((bbox.xmin() - self.pad_x) / self.scale),
            clamp01((bbox.ymin() - self.pad_y) / self.scale),
            clamp01((bbox.xmax() - self.pad_x) / self.scale),
            clamp01((bbox.ymax() - self.pad_y) / self.scale),
        )
    }
}

/// A refined box and the position of its detection in the source list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefinedRegion {
    pub index: usize,
    pub bbox: BBox,
}

/// Prepares text regions for cropping.
#[derive(Debug, Clone, Default)]
pub struct RegionRefiner {
    pub config: RefineConfig,
}

impl RegionRefiner {
    pub fn new(config: RefineConfig) -> Self {
        Self { config }
    }

    /// Refines `text_region` detections for an `img_w`×`img_h` image.
    ///
    /// Other labels and regions below the minimum pixel size are skipped.
    /// At most `max_regions` regions are returned, in input order.
    pub fn refine(&self, detections: &[Detection], img_w: u32, img_h: u32) -> Vec<RefinedRegion> {
        if img_w == 0 || img_h == 0 {
            warn!("cannot refine regions for a {}x{} image", img_w, img_h);
            return Vec::new();
        }
        let cfg = &self.config;
        let letterbox = cfg
            .use_letterbox
            .then(|| LetterboxTransform::for_image(img_w, img_h));
        let (w, h) = (img_w as f32, img_h as f32);

        let mut refined = Vec::new();
        for (index, det) in detections.iter().enumerate() {
            if refined.len() >= cfg.max_regions {
                break;
            }
            if !det.is_text_region() {
                continue;
            }

            let bbox = match &letterbox {
                Some(lb) => lb.invert(&det.bbox),
                None => det.bbox,
            };
            let (nx, nw) = (bbox.xmin(), bbox.width());
            let (mut ny, mut nh) = (bbox.ymin(), bbox.height());

            if nw * w < cfg.min_width_px || nh * h < cfg.min_height_px {
                debug!(
                    "skipping region #{} ({:.1}x{:.1} px)",
                    index,
                    nw * w,
                    nh * h
                );
                continue;
            }

            if nh * h < cfg.target_min_height_px {
                let center_y = ny + nh * 0.5;
                let target_h = cfg.target_min_height_px / h;
                ny = clamp01(center_y - target_h * 0.5);
                nh = (1.0 - ny).min(target_h);
            }

            let pad_x = cfg.pad_x_px / w;
            let pad_y = cfg.pad_y_px / h;
            refined.push(RefinedRegion {
                index,
                bbox: BBox::new(
                    clamp01(nx - pad_x),
                    clamp01(ny - pad_y),
                    clamp01(nx + nw + pad_x),
                    clamp01(ny + nh + pad_y),
                ),
            });
        }
        refined
    }

    /// Writes refined boxes back onto the ROI's detections.
    ///
    /// Skipped detections stay untouched. Returns the number refined.
    pub fn apply(&self, roi: &mut Roi, img_w: u32, img_h: u32) -> usize {
        let refined = self.refine(&roi.detections, img_w, img_h);
        for region in &refined {
            if let Some(det) = roi.detections.get_mut(region.index) {
                det.bbox = region.bbox;
            }
        }
        debug!("refined {} text regions", refined.len());
        refined.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_letterbox_transform() {
        let wide = LetterboxTransform::for_image(200, 100);
        assert_eq!(wide.scale, 0.5);
        assert_eq!(wide.pad_x, 0.25);
        assert_eq!(wide.pad_y, 0.0);

        let tall = LetterboxTransform::for_image(100, 200);
        assert_eq!(tall.scale, 0.5);
        assert_eq!(tall.pad_y, 0.25);

        let inv = wide.invert(&BBox::new(0.25, 0.1, 0.5, 0.3));
        assert!(approx(inv.xmin(), 0.0));
        assert!(approx(inv.xmax(), 0.5));
        assert!(approx(inv.ymin(), 0.2));
        assert!(approx(inv.ymax(), 0.6));

        let square = LetterboxTransform::for_image(64, 64);
        let b = BBox::new(0.1, 0.2, 0.3, 0.4);
        assert_eq!(square.invert(&b), b);
    }

    #[test]
    fn test_refine_pads_box() {
        let dets = vec![Detection::text_region(BBox::new(0.2, 0.2, 0.6, 0.5), 0.9)];
        let refined = RegionRefiner::default().refine(&dets, 100, 100);
        assert_eq!(refined.len(), 1);
        let b = refined[0].bbox;
        assert!(approx(b.xmin(), 0.16));
        assert!(approx(b.xmax(), 0.64));
        assert!(approx(b.ymin(), 0.18));
        assert!(approx(b.ymax(), 0.52));
    }

    #[test]
    fn test_refine_expands_short_regions() {
        // 5px tall on a 100px image: stretched to 12px around its center.
        let dets = vec![Detection::text_region(BBox::new(0.1, 0.5, 0.5, 0.55), 0.9)];
        let refined = RegionRefiner::default().refine(&dets, 100, 100);
        let b = refined[0].bbox;
        assert!(approx(b.ymin(), 0.445), "{b:?}");
        assert!(approx(b.ymax(), 0.605), "{b:?}");
        assert!(approx(b.xmin(), 0.06));
        assert!(approx(b.xmax(), 0.54));
    }

    #[test]
    fn test_refine_skips_tiny_and_foreign() {
        let dets = vec![
            Detection::text_region(BBox::new(0.1, 0.1, 0.13, 0.5), 0.9), // 3px wide
            Detection::new(BBox::new(0.1, 0.1, 0.9, 0.9), "vehicle", 0.9),
            Detection::text_region(BBox::new(0.1, 0.1, 0.5, 0.5), 0.9),
        ];
        let refined = RegionRefiner::default().refine(&dets, 100, 100);
        assert_eq!(refined.len(), 1);
        assert_eq!(refined[0].index, 2);
    }

    #[test]
    fn test_refine_caps_region_count() {
        let dets: Vec<Detection> = (0..10)
            .map(|_| Detection::text_region(BBox::new(0.1, 0.1, 0.5, 0.5), 0.9))
            .collect();
        let refined = RegionRefiner::default().refine(&dets, 100, 100);
        assert_eq!(refined.len(), 8);
        assert_eq!(refined.last().map(|r| r.index), Some(7));
    }

    #[test]
    fn test_refine_with_letterbox() {
        let refiner = RegionRefiner::new(RefineConfig {
            use_letterbox: true,
            ..Default::default()
        });
        let dets = vec![Detection::text_region(BBox::new(0.25, 0.1, 0.5, 0.3), 0.9)];
        let refined = refiner.refine(&dets, 200, 100);
        let b = refined[0].bbox;
        // Inverted to x 0..0.5, y 0.2..0.6, then padded 4px/200 and 2px/100.
        assert!(approx(b.xmin(), 0.0));
        assert!(approx(b.xmax(), 0.52));
        assert!(approx(b.ymin(), 0.18));
        assert!(approx(b.ymax(), 0.62));
    }

    #[test]
    fn test_apply_writes_back_in_place() {
        let mut roi = Roi::new();
        roi.add_detections([
            Detection::text_region(BBox::new(0.2, 0.2, 0.6, 0.5), 0.9),
            Detection::text_region(BBox::new(0.0, 0.0, 0.01, 0.01), 0.9),
        ]);
        let tiny = roi.detections[1].clone();

        assert_eq!(RegionRefiner::default().apply(&mut roi, 100, 100), 1);
        assert_eq!(roi.detections.len(), 2);
        assert!(approx(roi.detections[0].bbox.xmin(), 0.16));
        assert_eq!(roi.detections[1], tiny);
    }

    #[test]
    fn test_zero_survivors_leave_roi_unchanged() {
        let mut roi = Roi::new();
        roi.add_detections([Detection::text_region(BBox::new(0.0, 0.0, 0.01, 0.01), 0.9)]);
        let before = roi.detections.clone();
        assert_eq!(RegionRefiner::default().apply(&mut roi, 100, 100), 0);
        assert_eq!(roi.detections, before);
        assert_eq!(RegionRefiner::default().apply(&mut roi, 0, 100), 0);
    }
}
