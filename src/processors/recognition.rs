//! Text recognition on cropped regions.
//!
//! [`TextRecognizer`] decodes a crop's recognition tensor and attaches the
//! result to the detection the crop was cut from. The caller links each
//! crop to its source detection with a [`CropLink`].

use super::decode::{
    CtcGreedyDecoder, DecodedText, resolve_sequence_layout, sequence_probabilities,
};
use super::region_refine::RefinedRegion;
use crate::core::{OcrParams, OcrResult, Tensor};
use crate::domain::{Classification, Detection, Roi};
use crate::utils::dict::Charset;
use std::sync::Arc;
use tracing::{debug, warn};

/// A cropped sub-ROI and the index of the detection it was cropped from.
#[derive(Debug, Clone)]
pub struct CropLink {
    pub detection_index: usize,
    pub crop: Roi,
}

impl CropLink {
    pub fn new(detection_index: usize, crop: Roi) -> Self {
        Self {
            detection_index,
            crop,
        }
    }

    /// Builds the crop ROI for a refined region from its inference outputs.
    pub fn for_region(region: &RefinedRegion, tensors: Vec<Tensor>) -> Self {
        Self {
            detection_index: region.index,
            crop: Roi {
                bbox: region.bbox,
                tensors,
                ..Roi::default()
            },
        }
    }
}

/// CTC text recognizer.
#[derive(Debug, Clone)]
pub struct TextRecognizer {
    /// Name of the recognition tensor.
    pub output_name: String,
    pub decoder: CtcGreedyDecoder,
    /// Skip per-timestep softmax.
    pub logits_are_softmax: bool,
    /// Layout hint for square tensors.
    pub time_major: bool,
    charset: Arc<Charset>,
}

impl TextRecognizer {
    pub fn new(params: &OcrParams, charset: Arc<Charset>) -> Self {
        Self {
            output_name: params.rec_output_name.clone(),
            decoder: CtcGreedyDecoder::new(params.blank_index),
            logits_are_softmax: params.logits_are_softmax,
            time_major: params.time_major,
            charset,
        }
    }

    pub fn charset(&self) -> &Charset {
        &self.charset
    }

    /// Decodes one recognition tensor.
    ///
    /// # Errors
    ///
    /// Fails when the tensor is not `[1, D1, D2]` or its buffer is short.
    pub fn decode(&self, tensor: &Tensor) -> OcrResult<DecodedText> {
        let layout = resolve_sequence_layout(&tensor.shape, self.time_major)?;
        let probs = sequence_probabilities(tensor, layout, self.logits_are_softmax)?;
        let decoded = self.decoder.decode(&probs, &self.charset);
        debug!(
            "decoded '{}' (confidence {:.3}) from {}x{} sequence",
            decoded.text, decoded.confidence, layout.timesteps, layout.classes
        );
        Ok(decoded)
    }

    /// Decodes a tensor into a classification, or `None` for blank text.
    pub fn recognize(&self, tensor: &Tensor) -> OcrResult<Option<Classification>> {
        let decoded = self.decode(tensor)?;
        if decoded.is_blank() {
            return Ok(None);
        }
        Ok(Some(Classification::text(decoded.text, decoded.confidence)))
    }

    /// Recognizes the crop ROI's recognition tensor.
    ///
    /// A ROI without tensors yields `None`. A missing named tensor falls
    /// back to the first tensor with a warning.
    pub fn recognize_roi(&self, crop: &Roi) -> OcrResult<Option<Classification>> {
        if !crop.has_tensors() {
            debug!("no tensors in crop, skipping recognition");
            return Ok(None);
        }
        let tensor = crop.tensor(&self.output_name).into_result()?;
        self.recognize(tensor)
    }

    /// Recognizes `crop` and attaches the text to `target`.
    ///
    /// Returns true when a classification was attached. Errors are logged.
    pub fn attach(&self, crop: &Roi, target: &mut Detection) -> bool {
        match self.recognize_roi(crop) {
            Ok(Some(classification)) => {
                target.classification = Some(classification);
                true
            }
            Ok(None) => false,
            Err(e) => {
                warn!("text recognition skipped: {}", e);
                false
            }
        }
    }

    /// Recognizes every linked crop and attaches each result to its own
    /// source detection in `roi`. Returns the number attached.
    pub fn recognize_crops(&self, roi: &mut Roi, crops: &[CropLink]) -> usize {
        let mut attached = 0;
        for link in crops {
            let Some(target) = roi.detections.get_mut(link.detection_index) else {
                warn!(
                    "crop linked to detection #{} but ROI has {} detections",
                    link.detection_index,
                    roi.detections.len()
                );
                continue;
            };
            if self.attach(&link.crop, target) {
                attached += 1;
            }
        }
        attached
    }

    /// Recognizes `roi`'s own tensor and attaches the text to its first
    /// detection, whichever crop produced it.
    ///
    /// Kept for pipelines that run one crop per ROI. With several crops every
    /// result lands on the same detection; use
    /// [`recognize_crops`](Self::recognize_crops) instead.
    pub fn attach_to_first_detection(&self, roi: &mut Roi) -> bool {
        let classification = match self.recognize_roi(roi) {
            Ok(Some(c)) => c,
            Ok(None) => return false,
            Err(e) => {
                warn!("text recognition skipped: {}", e);
                return false;
            }
        };
        match roi.detections.first_mut() {
            Some(first) => {
                first.classification = Some(classification);
                true
            }
            None => {
                debug!("no detections to attach '{}' to", classification.text);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BBox;

    /// Time-major `[1, T, C]` tensor whose argmax path is `path`, one-hot.
    ///
    /// The path is padded with blanks until `T > C` so the layout resolves
    /// as time-major.
    fn rec_tensor(path: &[usize], classes: usize) -> Tensor {
        let steps = path.len().max(classes + 1);
        let mut data = vec![0u8; steps * classes];
        for t in 0..steps {
            let c = path.get(t).copied().unwrap_or(0);
            data[t * classes + c] = 255;
        }
        Tensor::new("rec_output", vec![1, steps, classes], data)
    }

    #[test]
    fn test_fixture_resolves_time_major() {
        let t = rec_tensor(&[2, 0, 3], 20);
        assert_eq!(t.shape, vec![1, 21, 20]);
        let layout = resolve_sequence_layout(&t.shape, false).unwrap();
        assert!(layout.time_major);
        assert_eq!((layout.timesteps, layout.classes), (21, 20));
    }

    #[test]
    fn test_classes_major_tensor() {
        // [1, C=4, T=6]: rows are classes, path 1 1 0 2 0 3.
        let path = [1usize, 1, 0, 2, 0, 3];
        let mut data = vec![0u8; 4 * path.len()];
        for (t, &c) in path.iter().enumerate() {
            data[c * path.len() + t] = 255;
        }
        let t = Tensor::new("rec_output", vec![1, 4, path.len()], data);
        let c = recognizer().recognize(&t).unwrap().unwrap();
        assert_eq!(c.text, "012");
    }

    fn recognizer() -> TextRecognizer {
        let params = OcrParams {
            logits_are_softmax: true,
            ..Default::default()
        };
        TextRecognizer::new(&params, Arc::new(Charset::default_table()))
    }

    fn crop_with(path: &[usize]) -> Roi {
        Roi::with_tensors(vec![rec_tensor(path, 20)])
    }

    fn text_regions(n: usize) -> Roi {
        let mut roi = Roi::new();
        roi.add_detections((0..n).map(|_| Detection::text_region(BBox::full(), 0.9)));
        roi
    }

    #[test]
    fn test_recognize_digits() {
        // Default table: index 1 is "0", index 2 is "1".
        let t = rec_tensor(&[2, 2, 0, 3, 0, 4, 4], 20);
        let c = recognizer().recognize(&t).unwrap().unwrap();
        assert_eq!(c.text, "123");
        assert_eq!(c.category, "text");
        assert_eq!(c.confidence, 1.0);
    }

    #[test]
    fn test_recognize_with_softmax() {
        let params = OcrParams::default();
        let rec = TextRecognizer::new(&params, Arc::new(Charset::default_table()));
        let t = rec_tensor(&[2, 0, 3], 20);
        let c = rec.recognize(&t).unwrap().unwrap();
        assert_eq!(c.text, "12");
        // exp(1) / (exp(1) + 19) after dequantizing 255 -> 1.0.
        let expected = std::f32::consts::E / (std::f32::consts::E + 19.0);
        assert!((c.confidence - expected).abs() < 1e-5);
    }

    #[test]
    fn test_blank_or_space_text_is_dropped() {
        assert!(recognizer().recognize(&rec_tensor(&[0, 0], 20)).unwrap().is_none());

        let mut charset = vec!["blank".to_string(), " ".to_string()];
        charset.extend((2..20).map(|i| i.to_string()));
        let rec = TextRecognizer::new(
            &OcrParams {
                logits_are_softmax: true,
                ..Default::default()
            },
            Arc::new(Charset::new(charset)),
        );
        assert!(rec.recognize(&rec_tensor(&[1, 0, 1], 20)).unwrap().is_none());
    }

    #[test]
    fn test_bad_rank_is_an_error() {
        let t = Tensor::new("rec_output", vec![40, 97], vec![0; 40 * 97]);
        assert!(recognizer().recognize(&t).is_err());
        let t = Tensor::new("rec_output", vec![2, 20, 40], vec![0; 1600]);
        assert!(recognizer().recognize(&t).is_err());
    }

    #[test]
    fn test_attach_to_linked_detection() {
        let mut roi = text_regions(3);
        let crops = vec![
            CropLink::new(2, crop_with(&[2, 0])),
            CropLink::new(0, crop_with(&[3, 0])),
            CropLink::new(7, crop_with(&[4, 0])),
        ];
        assert_eq!(recognizer().recognize_crops(&mut roi, &crops), 2);

        let texts: Vec<Option<&str>> = roi
            .detections
            .iter()
            .map(|d| d.classification.as_ref().map(|c| c.text.as_str()))
            .collect();
        assert_eq!(texts, vec![Some("2"), None, Some("1")]);
    }

    #[test]
    fn test_attach_failures_are_silent() {
        let mut det = Detection::text_region(BBox::full(), 0.9);
        let rec = recognizer();
        assert!(!rec.attach(&Roi::new(), &mut det));
        let bad = Roi::with_tensors(vec![Tensor::new("rec_output", vec![1, 2], vec![0, 0])]);
        assert!(!rec.attach(&bad, &mut det));
        assert!(det.classification.is_none());
    }

    #[test]
    fn test_legacy_policy_attaches_to_first_detection() {
        // Two crops processed through the legacy entry point both land on
        // detection 0; the second overwrites the first.
        let mut roi = text_regions(2);
        roi.tensors = vec![rec_tensor(&[2, 0], 20)];
        assert!(recognizer().attach_to_first_detection(&mut roi));
        roi.tensors = vec![rec_tensor(&[3, 0], 20)];
        assert!(recognizer().attach_to_first_detection(&mut roi));

        assert_eq!(
            roi.detections[0].classification.as_ref().map(|c| c.text.as_str()),
            Some("2")
        );
        assert!(roi.detections[1].classification.is_none());
    }

    #[test]
    fn test_legacy_policy_without_detections() {
        let mut roi = crop_with(&[2, 0]);
        assert!(!recognizer().attach_to_first_detection(&mut roi));
    }

    #[test]
    fn test_crop_link_for_region() {
        let region = RefinedRegion {
            index: 4,
            bbox: BBox::new(0.1, 0.1, 0.5, 0.3),
        };
        let link = CropLink::for_region(&region, vec![rec_tensor(&[2], 20)]);
        assert_eq!(link.detection_index, 4);
        assert_eq!(link.crop.bbox, region.bbox);
        assert!(link.crop.has_tensors());
    }
}
