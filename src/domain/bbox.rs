//! Normalized bounding boxes.

use serde::Serialize;

#[inline]
fn clamp01(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Axis-aligned box in `[0, 1]` coordinates relative to a frame.
///
/// Construction clamps every edge into `[0, 1]` and keeps `min <= max` on
/// both axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BBox {
    xmin: f32,
    ymin: f32,
    xmax: f32,
    ymax: f32,
}

impl BBox {
    /// Creates a box from its edges.
    pub fn new(xmin: f32, ymin: f32, xmax: f32, ymax: f32) -> Self {
        let xmin = clamp01(xmin);
        let ymin = clamp01(ymin);
        Self {
            xmin,
            ymin,
            xmax: clamp01(xmax).max(xmin),
            ymax: clamp01(ymax).max(ymin),
        }
    }

    /// Creates a box from its top-left corner and size.
    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y, x + width.max(0.0), y + height.max(0.0))
    }

    /// The whole frame.
    pub fn full() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }

    pub fn xmin(&self) -> f32 {
        self.xmin
    }

    pub fn ymin(&self) -> f32 {
        self.ymin
    }

    pub fn xmax(&self) -> f32 {
        self.xmax
    }

    pub fn ymax(&self) -> f32 {
        self.ymax
    }

    pub fn width(&self) -> f32 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f32 {
        self.ymax - self.ymin
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Returns true when `other` lies entirely inside this box.
    pub fn contains(&self, other: &BBox) -> bool {
        other.xmin >= self.xmin
            && other.ymin >= self.ymin
            && other.xmax <= self.xmax
            && other.ymax <= self.ymax
    }

    /// Maps this box through a scaling box.
    ///
    /// The scaling box describes where the frame this box is relative to
    /// sits inside the outer frame, so the result is relative to the outer
    /// frame.
    pub fn flatten(&self, scaling: &BBox) -> BBox {
        BBox::from_xywh(
            scaling.xmin + self.xmin * scaling.width(),
            scaling.ymin + self.ymin * scaling.height(),
            self.width() * scaling.width(),
            self.height() * scaling.height(),
        )
    }
}

impl Default for BBox {
    fn default() -> Self {
        Self::full()
    }
}
