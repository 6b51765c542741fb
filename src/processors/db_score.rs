//! Box scoring on the likelihood map.
//!
//! A candidate's score is the mean map value inside its rect.

use crate::processors::ProbabilityMap;
use crate::processors::geometry::Rect;
use ndarray::s;

/// Mean map value inside `rect`, clipped to the map. Returns 0 when the
/// rect does not overlap the map.
pub fn region_score(map: &ProbabilityMap, rect: &Rect) -> f32 {
    let (height, width) = map.dim();
    let bounds = Rect::new(0, 0, width as i32, height as i32);
    let Some(r) = rect.intersect(&bounds) else {
        return 0.0;
    };

    let region = map.slice(s![
        r.y as usize..r.bottom() as usize,
        r.x as usize..r.right() as usize
    ]);
    let sum: f64 = region.iter().map(|&v| f64::from(v)).sum();
    (sum / region.len() as f64) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn test_region_score() {
        let mut map = Array2::<f32>::zeros((10, 10));
        for y in 2..4 {
            for x in 2..6 {
                map[[y, x]] = 1.0;
            }
        }
        assert_eq!(region_score(&map, &Rect::new(2, 2, 4, 2)), 1.0);
        assert_eq!(region_score(&map, &Rect::new(2, 2, 8, 2)), 0.5);
        assert_eq!(region_score(&map, &Rect::new(0, 0, 2, 2)), 0.0);
    }

    #[test]
    fn test_region_score_clips_to_map() {
        let map = Array2::<f32>::from_elem((4, 4), 0.25);
        assert_eq!(region_score(&map, &Rect::new(-3, -3, 10, 10)), 0.25);
        assert_eq!(region_score(&map, &Rect::new(10, 10, 3, 3)), 0.0);
    }
}
