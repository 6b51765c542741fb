//! Rectangle merging and growth.
//!
//! Closing joins glyphs into blobs, but word gaps still split a line into
//! several rects. These helpers join same-row neighbours and then pad each
//! result back out to cover the stroke pixels lost to thresholding.

use crate::processors::geometry::Rect;
use crate::utils::tensor::MapShape;

/// Minimum vertical overlap for two rects to join.
pub const MIN_VERTICAL_OVERLAP: f32 = 0.45;
/// Number of anisotropic growth steps after the base pad.
const GROW_ITERS: usize = 2;
/// Per-step horizontal growth relative to the current height.
const GROW_X_PER_H: f32 = 0.15;
/// Per-step vertical growth relative to the current height.
const GROW_Y_PER_H: f32 = 0.12;
/// Cap on total per-side growth from the steps, as a fraction of map width.
const MAX_GROW_X_FRAC: f32 = 0.15;
/// Cap on total per-side growth from the steps, as a fraction of map height.
const MAX_GROW_Y_FRAC: f32 = 0.08;
/// Aspect ratio above which a line gets extra vertical padding.
const THIN_LINE_ASPECT: f32 = 10.0;

/// Upper median of the rect heights, or 0 for no rects.
pub fn median_height(rects: &[Rect]) -> i32 {
    let mut heights: Vec<i32> = rects.iter().map(|r| r.height).collect();
    if heights.is_empty() {
        return 0;
    }
    let mid = heights.len() / 2;
    let (_, median, _) = heights.select_nth_unstable(mid);
    *median
}

/// Largest horizontal gap bridged by [`merge_horizontal`] on a map of `map_width`.
///
/// `max(3, min(floor(2% of width), round(median height)))`.
pub fn merge_gap(map_width: usize, median_h: i32) -> i32 {
    let by_width = (map_width as f32 * 0.02) as i32;
    by_width.min(median_h).max(3)
}

/// Joins left-to-right neighbours on the same text row.
///
/// Rects are sorted by `x` and scanned once. The running rect absorbs the
/// next one when the gap between the running right edge and the next left
/// edge is at most `max_gap` and their vertical overlap ratio is at least
/// `min_overlap`.
pub fn merge_horizontal(mut rects: Vec<Rect>, max_gap: i32, min_overlap: f32) -> Vec<Rect> {
    if rects.len() <= 1 {
        return rects;
    }
    rects.sort_by_key(|r| r.x);

    let mut merged = Vec::with_capacity(rects.len());
    let mut run = rects[0];
    for next in &rects[1..] {
        let gap = next.x - run.right();
        if gap <= max_gap && run.vertical_overlap_ratio(next) >= min_overlap {
            run = run.union(next);
        } else {
            merged.push(run);
            run = *next;
        }
    }
    merged.push(run);
    merged
}

#[inline]
fn round_px(v: f32) -> i32 {
    v.round() as i32
}

/// Pads a merged rect out to the final candidate box.
///
/// The base pad is `max(2, round(0.6 * median_h))` horizontally and
/// `max(1, round(0.35 * median_h))` vertically. Thin lines (aspect above 10
/// after the base pad) get extra height. Two growth steps then add about
/// 15% and 12% of the current height on each side, limited so the steps
/// together add at most 15% of the map width and 8% of the map height per
/// side. Every step is clamped to the map.
pub fn grow_rect(rect: Rect, median_h: i32, shape: MapShape) -> Rect {
    let (w, h) = (shape.width as i32, shape.height as i32);
    let pad_x = round_px(median_h as f32 * 0.6).max(2);
    let pad_y = round_px(median_h as f32 * 0.35).max(1);

    let mut r = rect.inflate(pad_x, pad_y).clamp_to(w, h);

    if r.aspect_ratio() > THIN_LINE_ASPECT {
        let add_y = pad_y.max(round_px(r.height as f32 * 0.5));
        r = Rect::new(r.x, r.y - add_y / 2, r.width, r.height + add_y).clamp_to(w, h);
    }

    let max_gx = round_px(w as f32 * MAX_GROW_X_FRAC).max(1);
    let max_gy = round_px(h as f32 * MAX_GROW_Y_FRAC).max(1);
    let (mut acc_x, mut acc_y) = (0, 0);
    for _ in 0..GROW_ITERS {
        let gx = round_px((r.height as f32 * GROW_X_PER_H).max(2.0)).max(1);
        let gy = round_px((r.height as f32 * GROW_Y_PER_H).max(1.0)).max(1);
        let dx = gx.min(max_gx - acc_x);
        let dy = gy.min(max_gy - acc_y);
        if dx == 0 && dy == 0 {
            break;
        }
        r = r.inflate(dx, dy).clamp_to(w, h);
        acc_x += dx;
        acc_y += dy;
    }
    r
}

/// Minimal pad applied to rects kept by the fallback path.
pub fn fallback_rect(rect: Rect, shape: MapShape) -> Rect {
    let g = round_px(rect.height as f32 * 0.1).max(1);
    rect.inflate(g, g)
        .clamp_to(shape.width as i32, shape.height as i32)
}
