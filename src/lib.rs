//! # OCR Postprocess
//!
//! Post-processing for a streaming OCR pipeline. Model inference happens
//! elsewhere; this crate turns its raw 8-bit output tensors into text regions
//! and recognized strings.
//!
//! ## Components
//!
//! - **Text Detection**: Turn a DB-style text likelihood map into `text_region` boxes
//! - **Region Refinement**: Undo letterbox, enforce minimum size and pad boxes before cropping
//! - **Text Recognition**: CTC greedy decoding of per-timestep class scores
//! - **Configuration**: JSON/TOML parameters and the recognition charset
//!
//! ## Modules
//!
//! * [`core`] - Configuration, error handling, tensors and validation
//! * [`domain`] - Normalized boxes, detections and the ROI container
//! * [`processors`] - Detection, refinement and recognition stages
//! * [`utils`] - Charset loading, tensor conversions and logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ocr_postprocess::prelude::*;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = OcrContext::init(Some(Path::new("ocr_config.json")))?;
//!
//! // A likelihood map produced by the detection model.
//! let map = Tensor::new("det_output", vec![1, 1, 544, 960], vec![0u8; 544 * 960]);
//! let mut roi = Roi::with_tensors(vec![map]);
//!
//! let detector = TextRegionDetector::new(&ctx.params);
//! detector.apply(&mut roi);
//! RegionRefiner::default().apply(&mut roi, 1920, 1080);
//!
//! // One recognition output per cropped region, linked to its detection.
//! let recognizer = TextRecognizer::new(&ctx.params, ctx.charset.clone());
//! let crops: Vec<CropLink> = Vec::new();
//! recognizer.recognize_crops(&mut roi, &crops);
//!
//! for det in &roi.detections {
//!     if let Some(text) = &det.classification {
//!         println!("{:?}: {}", det.bbox, text.text);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod domain;
pub mod processors;
pub mod utils;

/// Prelude module for convenient imports.
///
/// ```rust
/// use ocr_postprocess::prelude::*;
/// ```
///
/// Included items cover the three stages, their shared data model and the
/// essential error types. Lower-level helpers (map shape resolution,
/// binarization, merging) live in [`crate::processors`].
pub mod prelude {
    // Stages
    pub use crate::processors::{
        CropLink, DetectionOutcome, RefineConfig, RegionRefiner, TextRecognizer,
        TextRegionDetector,
    };

    // Data model
    pub use crate::core::{OcrContext, OcrParams, Tensor};
    pub use crate::domain::{BBox, Classification, Detection, Roi, retain_text_regions};
    pub use crate::utils::Charset;

    // Error Handling (essential)
    pub use crate::core::{OCRError, OcrResult};
}
