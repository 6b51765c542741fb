//! Tunable parameters shared by the detector, refiner and recognizer.

use super::errors::{ConfigError, ConfigValidator};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default base binarization threshold.
pub const DEFAULT_BIN_THRESH: f32 = 0.3;
/// Default base box-score threshold.
pub const DEFAULT_BOX_THRESH: f32 = 0.6;
/// Default name of the detection likelihood-map tensor.
pub const DEFAULT_DET_OUTPUT_NAME: &str = "det_output";
/// Default name of the recognition sequence tensor.
pub const DEFAULT_REC_OUTPUT_NAME: &str = "rec_output";

/// Post-processing parameters.
///
/// Loaded once at initialization and shared read-only afterwards. Every field
/// is optional in the serialized form; absent keys keep their default and
/// unknown keys are ignored. A key holding a value of the wrong type fails
/// deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrParams {
    /// Base binarization threshold for the likelihood map.
    pub det_bin_thresh: f32,
    /// Base score threshold a candidate box must reach.
    pub det_box_thresh: f32,
    /// Legacy polygon unclip ratio. Informational only.
    pub det_unclip_ratio: f32,
    /// Maximum number of text regions emitted per map.
    pub det_max_candidates: usize,
    /// Minimum length of a box's shorter side, in map pixels.
    pub det_min_box_size: f32,
    /// Name of the likelihood-map tensor.
    pub det_output_name: String,
    /// Fallback map height when the tensor shape cannot be resolved.
    pub det_map_h: usize,
    /// Fallback map width when the tensor shape cannot be resolved.
    pub det_map_w: usize,
    /// Clear the ROI scaling bbox once detections are in frame coordinates.
    pub letterbox_fix: bool,
    /// Name of the recognition tensor.
    pub rec_output_name: String,
    /// Newline-delimited charset file. `None` selects the built-in table.
    pub charset_path: Option<PathBuf>,
    /// CTC blank token index.
    pub blank_index: usize,
    /// Recognition values are already probabilities; skip softmax.
    pub logits_are_softmax: bool,
    /// Layout hint for square recognition tensors.
    pub time_major: bool,
    /// Reserved confidence smoothing factor.
    pub text_conf_smooth: f32,
    /// Reserved flag for attaching the crop box to the classification.
    pub attach_caption_box: bool,
}

impl Default for OcrParams {
    fn default() -> Self {
        Self {
            det_bin_thresh: DEFAULT_BIN_THRESH,
            det_box_thresh: DEFAULT_BOX_THRESH,
            det_unclip_ratio: 1.5,
            det_max_candidates: 1000,
            det_min_box_size: 3.0,
            det_output_name: DEFAULT_DET_OUTPUT_NAME.to_string(),
            det_map_h: 544,
            det_map_w: 960,
            letterbox_fix: true,
            rec_output_name: DEFAULT_REC_OUTPUT_NAME.to_string(),
            charset_path: None,
            blank_index: 0,
            logits_are_softmax: false,
            time_major: false,
            text_conf_smooth: 0.0,
            attach_caption_box: false,
        }
    }
}

impl ConfigValidator for OcrParams {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_confidence_threshold(self.det_bin_thresh)?;
        self.validate_non_negative_f32(self.det_box_thresh, "det_box_thresh")?;
        self.validate_non_negative_f32(self.det_unclip_ratio, "det_unclip_ratio")?;
        self.validate_positive_usize(self.det_max_candidates, "det_max_candidates")?;
        self.validate_non_negative_f32(self.det_min_box_size, "det_min_box_size")?;

        let map_w = u32::try_from(self.det_map_w).map_err(|_| ConfigError::InvalidConfig {
            message: format!("det_map_w out of range: {}", self.det_map_w),
        })?;
        let map_h = u32::try_from(self.det_map_h).map_err(|_| ConfigError::InvalidConfig {
            message: format!("det_map_h out of range: {}", self.det_map_h),
        })?;
        self.validate_image_dimensions(map_w, map_h)?;

        if !(0.0..=1.0).contains(&self.text_conf_smooth) {
            return Err(ConfigError::ValidationFailed {
                message: format!(
                    "text_conf_smooth must be between 0.0 and 1.0, got {}",
                    self.text_conf_smooth
                ),
            });
        }
        if self.det_output_name.is_empty() || self.rec_output_name.is_empty() {
            return Err(ConfigError::ValidationFailed {
                message: "tensor output names must not be empty".to_string(),
            });
        }
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let params = OcrParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.det_output_name, "det_output");
        assert_eq!(params.blank_index, 0);
        assert!(params.letterbox_fix);
        assert!(params.charset_path.is_none());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let params: OcrParams =
            serde_json::from_value(serde_json::json!({ "det_box_thresh": 0.5 })).unwrap();
        assert_eq!(params.det_box_thresh, 0.5);
        assert_eq!(params.det_bin_thresh, DEFAULT_BIN_THRESH);
        assert_eq!(params.det_max_candidates, 1000);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let params: OcrParams = serde_json::from_value(serde_json::json!({
            "det_map_w": 640,
            "vendor_extension": { "enabled": true }
        }))
        .unwrap();
        assert_eq!(params.det_map_w, 640);
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let result: Result<OcrParams, _> =
            serde_json::from_value(serde_json::json!({ "det_max_candidates": "many" }));
        assert!(result.is_err());

        let result: Result<OcrParams, _> =
            serde_json::from_value(serde_json::json!({ "letterbox_fix": 1 }));
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_rejects_out_of_range() {
        let params = OcrParams {
            det_bin_thresh: 1.5,
            ..Default::default()
        };
        assert!(params.validate().is_err());

        let params = OcrParams {
            det_max_candidates: 0,
            ..Default::default()
        };
        assert!(params.validate().is_err());

        let params = OcrParams {
            det_map_h: 0,
            ..Default::default()
        };
        assert!(params.validate().is_err());

        let params = OcrParams {
            text_conf_smooth: 2.0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_box_thresh_above_one_is_allowed() {
        // Thresholds above 1.0 are legal and force the detector fallback.
        let params = OcrParams {
            det_box_thresh: 1.5,
            ..Default::default()
        };
        assert!(params.validate().is_ok());
    }
}
