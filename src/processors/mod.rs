//! Post-processing stages for detection and recognition outputs.
//!
//! # Modules
//!
//! * `db_postprocess` - DB-style text region detection on a likelihood map
//! * `decode` - CTC greedy decoding of recognition sequences
//! * `geometry` - Pixel-space rectangles used by the detector
//! * `recognition` - Text recognition and attachment to detections
//! * `region_refine` - Pre-crop adjustment of detected text regions

pub mod db_postprocess;
pub mod decode;
pub mod geometry;
pub mod recognition;
pub mod region_refine;

/// Dense H×W likelihood map with values in [0, 1].
pub type ProbabilityMap = ndarray::Array2<f32>;

pub use crate::utils::tensor::{MapShape, probability_map, resolve_map_shape};
pub use db_postprocess::{DetectionOutcome, TextRegionDetector};
pub use decode::{
    CtcGreedyDecoder, DecodedText, SequenceLayout, UNKNOWN_CHAR, resolve_sequence_layout,
    sequence_probabilities, softmax_in_place,
};
pub use geometry::Rect;
pub use recognition::{CropLink, TextRecognizer};
pub use region_refine::{LetterboxTransform, RefineConfig, RefinedRegion, RegionRefiner};
