//! Shared data model: normalized boxes, detections and the ROI container.

pub mod bbox;
pub mod roi;

pub use bbox::BBox;
pub use roi::{
    Classification, Detection, Roi, TEXT_CATEGORY, TEXT_REGION_LABEL, TensorLookup,
    retain_text_regions,
};
