//! Region-of-interest container and the detections attached to it.
//!
//! A [`Roi`] carries the raw tensors produced for one frame or one crop,
//! plus the detections stages have attached so far. Stages read from it
//! through explicit lookups and hand back new detection lists; the
//! `apply`-style helpers in `processors` do the in-place writes.

use super::bbox::BBox;
use crate::core::{OCRError, OcrResult, Tensor};
use serde::Serialize;
use tracing::warn;

/// Label carried by detections emitted by the text region detector.
pub const TEXT_REGION_LABEL: &str = "text_region";

/// Category carried by recognizer classifications.
pub const TEXT_CATEGORY: &str = "text";

/// Decoded text attached to a detection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub category: String,
    pub text: String,
    pub confidence: f32,
}

impl Classification {
    /// Creates a text classification.
    pub fn text(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            category: TEXT_CATEGORY.to_string(),
            text: text.into(),
            confidence,
        }
    }
}

/// A labeled box with a confidence, optionally carrying decoded text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    pub bbox: BBox,
    pub label: String,
    pub confidence: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<Classification>,
}

impl Detection {
    pub fn new(bbox: BBox, label: impl Into<String>, confidence: f32) -> Self {
        Self {
            bbox,
            label: label.into(),
            confidence,
            classification: None,
        }
    }

    /// Creates a `text_region` detection.
    pub fn text_region(bbox: BBox, confidence: f32) -> Self {
        Self::new(bbox, TEXT_REGION_LABEL, confidence)
    }

    pub fn is_text_region(&self) -> bool {
        self.label == TEXT_REGION_LABEL
    }
}

/// Result of looking up a tensor by name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TensorLookup<'a> {
    /// The named tensor exists.
    Found(&'a Tensor),
    /// The named tensor is absent; the first tensor stands in for it.
    Substituted {
        requested: &'a str,
        used: &'a Tensor,
    },
    /// The ROI holds no tensors at all.
    Missing { requested: &'a str },
}

impl<'a> TensorLookup<'a> {
    /// The tensor to read, if any.
    pub fn tensor(&self) -> Option<&'a Tensor> {
        match *self {
            Self::Found(t) | Self::Substituted { used: t, .. } => Some(t),
            Self::Missing { .. } => None,
        }
    }

    pub fn is_substituted(&self) -> bool {
        matches!(self, Self::Substituted { .. })
    }

    /// Accepts a substitution with a warning and turns `Missing` into an error.
    pub fn into_result(self) -> OcrResult<&'a Tensor> {
        match self {
            Self::Found(t) => Ok(t),
            Self::Substituted { requested, used } => {
                warn!(
                    "tensor '{}' not found, substituting first tensor '{}'",
                    requested, used.name
                );
                Ok(used)
            }
            Self::Missing { requested } => Err(OCRError::TensorNotFound {
                name: requested.to_string(),
                available: Vec::new(),
            }),
        }
    }
}

/// Per-frame or per-crop container of tensors and detections.
#[derive(Debug, Clone, Default)]
pub struct Roi {
    /// Placement of this region inside its parent frame.
    pub bbox: BBox,
    /// Letterbox placement used to undo model-input padding.
    pub scaling_bbox: Option<BBox>,
    pub detections: Vec<Detection>,
    pub tensors: Vec<Tensor>,
}

impl Roi {
    /// Creates a full-frame ROI without a scaling box.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a full-frame ROI holding `tensors`.
    pub fn with_tensors(tensors: Vec<Tensor>) -> Self {
        Self {
            tensors,
            ..Self::default()
        }
    }

    pub fn has_tensors(&self) -> bool {
        !self.tensors.is_empty()
    }

    /// Looks up a tensor by name, falling back to the first tensor.
    pub fn tensor<'a>(&'a self, name: &'a str) -> TensorLookup<'a> {
        if let Some(t) = self.tensors.iter().find(|t| t.name == name) {
            return TensorLookup::Found(t);
        }
        match self.tensors.first() {
            Some(used) => TensorLookup::Substituted {
                requested: name,
                used,
            },
            None => TensorLookup::Missing { requested: name },
        }
    }

    pub fn add_detections(&mut self, detections: impl IntoIterator<Item = Detection>) {
        self.detections.extend(detections);
    }

    pub fn clear_scaling_bbox(&mut self) {
        self.scaling_bbox = None;
    }

    /// The ROI box expressed in outer-frame coordinates.
    pub fn flattened_bbox(&self) -> BBox {
        match &self.scaling_bbox {
            Some(scaling) => self.bbox.flatten(scaling),
            None => self.bbox,
        }
    }
}

/// Drops every detection that is not a `text_region`. Returns how many were removed.
pub fn retain_text_regions(roi: &mut Roi) -> usize {
    let before = roi.detections.len();
    roi.detections.retain(Detection::is_text_region);
    before - roi.detections.len()
}
