//! CTC (Connectionist Temporal Classification) greedy decoding.
//!
//! This module resolves the layout of a recognition tensor, converts it into
//! per-timestep class probabilities and collapses the best path into text
//! with a confidence score.

use crate::core::validation::validate_tensor_shape;
use crate::core::{OCRError, OcrResult, ProcessingStage, Tensor};
use crate::utils::dict::Charset;
use ndarray::{Array2, ArrayViewMut1, Axis, ShapeError};

/// Emitted in place of class indices outside the charset.
pub const UNKNOWN_CHAR: &str = "?";

/// Shape of a `[1, D1, D2]` recognition tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceLayout {
    /// Number of classes per timestep.
    pub classes: usize,
    /// Number of timesteps.
    pub timesteps: usize,
    /// True for `[1, T, C]`, false for `[1, C, T]`.
    pub time_major: bool,
}

/// Resolves the class and time axes of a recognition tensor.
///
/// The smaller of the two trailing dims is the class axis. When both are
/// equal, `time_major_hint` decides.
///
/// # Errors
///
/// `InvalidInput` unless the shape is rank 3 with batch 1 and non-zero dims.
pub fn resolve_sequence_layout(shape: &[usize], time_major_hint: bool) -> OcrResult<SequenceLayout> {
    validate_tensor_shape(shape, 3, "recognition")?;
    let (n, d1, d2) = (shape[0], shape[1], shape[2]);
    if n != 1 {
        return Err(OCRError::invalid_input(format!(
            "recognition tensor must have batch 1, got shape {shape:?}"
        )));
    }
    if d1 == 0 || d2 == 0 {
        return Err(OCRError::invalid_input(format!(
            "recognition tensor has an empty axis: {shape:?}"
        )));
    }
    let classes = d1.min(d2);
    let timesteps = d1.max(d2);
    let time_major = if d1 == d2 { time_major_hint } else { d1 == timesteps };
    Ok(SequenceLayout {
        classes,
        timesteps,
        time_major,
    })
}

/// Numerically stable softmax over one timestep.
pub fn softmax_in_place(mut row: ArrayViewMut1<'_, f32>) {
    let max = row.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let sum: f64 = row.iter().map(|&x| f64::from(x - max).exp()).sum();
    if sum <= 0.0 || !sum.is_finite() {
        return;
    }
    row.mapv_inplace(|x| (f64::from(x - max).exp() / sum) as f32);
}

/// Builds a T×C probability matrix from a recognition tensor.
///
/// Values are dequantized from 8 bits; softmax is applied per timestep
/// unless `logits_are_softmax` is set.
pub fn sequence_probabilities(
    tensor: &Tensor,
    layout: SequenceLayout,
    logits_are_softmax: bool,
) -> OcrResult<Array2<f32>> {
    let (t, c) = (layout.timesteps, layout.classes);
    let len = t.checked_mul(c).ok_or_else(|| {
        OCRError::invalid_input(format!(
            "recognition tensor '{}' declares an oversized sequence ({t}x{c})",
            tensor.name
        ))
    })?;
    let values = tensor.dequantized(len)?;
    let reshape_err = |e: ShapeError| {
        OCRError::processing_error(ProcessingStage::Recognition, "reshape sequence", e)
    };

    let mut probs = if layout.time_major {
        Array2::from_shape_vec((t, c), values).map_err(reshape_err)?
    } else {
        Array2::from_shape_vec((c, t), values)
            .map_err(reshape_err)?
            .reversed_axes()
            .as_standard_layout()
            .into_owned()
    };

    if !logits_are_softmax {
        for row in probs.axis_iter_mut(Axis(0)) {
            softmax_in_place(row);
        }
    }
    Ok(probs)
}

/// Text decoded from one sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedText {
    pub text: String,
    /// Mean probability of the emitting steps, 0 when nothing was emitted.
    pub confidence: f32,
    /// Probability of each emitting step, in order.
    pub char_confidences: Vec<f32>,
}

impl DecodedText {
    /// True when the text is empty or only whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Best-path CTC decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CtcGreedyDecoder {
    pub blank_index: usize,
}

impl CtcGreedyDecoder {
    pub fn new(blank_index: usize) -> Self {
        Self { blank_index }
    }

    /// Decodes a T×C probability matrix.
    ///
    /// A step emits when its argmax is neither blank nor equal to the
    /// previous step's argmax. The previous index is tracked across every
    /// step, blanks included, so a blank between two equal classes keeps
    /// both.
    pub fn decode(&self, probs: &Array2<f32>, charset: &Charset) -> DecodedText {
        let mut text = String::new();
        let mut char_confidences = Vec::new();
        let mut prev: Option<usize> = None;

        for row in probs.axis_iter(Axis(0)) {
            // First maximum wins on ties.
            let Some((idx, p)) = row.iter().enumerate().fold(None, |best, (i, &v)| match best {
                Some((_, bv)) if v <= bv => best,
                _ => Some((i, v)),
            }) else {
                continue;
            };

            if idx != self.blank_index && Some(idx) != prev {
                text.push_str(charset.get(idx).unwrap_or(UNKNOWN_CHAR));
                char_confidences.push(p);
            }
            prev = Some(idx);
        }

        let confidence = if char_confidences.is_empty() {
            0.0
        } else {
            char_confidences.iter().sum::<f32>() / char_confidences.len() as f32
        };
        DecodedText {
            text,
            confidence,
            char_confidences,
        }
    }
}
