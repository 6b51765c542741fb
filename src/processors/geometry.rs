//! Pixel-space rectangle primitives used by the text region detector.
//!
//! Rectangles follow the half-open convention: a rect at `x` with width `w`
//! covers columns `x..x + w`.

use imageproc::contours::Contour;
use itertools::Itertools;
use serde::Serialize;

/// Axis-aligned rectangle in likelihood-map pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bounding rectangle of a contour's points.
    ///
    /// A single-pixel contour yields a 1×1 rect.
    pub fn from_contour(contour: &Contour<u32>) -> Option<Self> {
        let (x0, x1) = contour.points.iter().map(|p| p.x).minmax().into_option()?;
        let (y0, y1) = contour.points.iter().map(|p| p.y).minmax().into_option()?;
        Some(Self::new(
            x0 as i32,
            y0 as i32,
            (x1 - x0 + 1) as i32,
            (y1 - y0 + 1) as i32,
        ))
    }

    /// Exclusive right edge.
    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    #[inline]
    pub fn area(&self) -> i64 {
        i64::from(self.width) * i64::from(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Width over height, with the height floored at one pixel.
    #[inline]
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Smallest rect covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }

    /// Overlapping part of both rects, or `None` when they do not overlap.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let r = self.right().min(other.right());
        let b = self.bottom().min(other.bottom());
        (r > x && b > y).then(|| Rect::new(x, y, r - x, b - y))
    }

    /// Grows the rect by `dx` on the left and right and `dy` on top and bottom.
    pub fn inflate(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(
            self.x - dx,
            self.y - dy,
            self.width + 2 * dx,
            self.height + 2 * dy,
        )
    }

    /// Forces the rect onto a `width`×`height` map.
    ///
    /// The origin is clamped into the map and the size into `[1, remaining]`,
    /// so the result is never empty and never leaves the map.
    pub fn clamp_to(&self, width: i32, height: i32) -> Rect {
        let x = self.x.clamp(0, (width - 1).max(0));
        let y = self.y.clamp(0, (height - 1).max(0));
        Rect::new(
            x,
            y,
            self.width.min(width - x).max(1),
            self.height.min(height - y).max(1),
        )
    }

    /// Shared row count divided by the smaller height (floored at one).
    pub fn vertical_overlap_ratio(&self, other: &Rect) -> f32 {
        let top = self.y.max(other.y);
        let bottom = self.bottom().min(other.bottom());
        let inter = (bottom - top).max(0);
        let min_h = self.height.min(other.height).max(1);
        inter as f32 / min_h as f32
    }
}
