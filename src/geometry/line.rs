//! Straight segment distance and stroke tests.

use super::distance;

/// Closest point to `(x, y)` on the segment `(x1, y1)-(x2, y2)`.
pub fn nearest_point(x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) -> (f64, f64) {
    let dx = x2 - x1;
    let dy = y2 - y1;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return (x1, y1);
    }
    let t = (((x - x1) * dx + (y - y1) * dy) / len_sq).clamp(0.0, 1.0);
    (x1 + dx * t, y1 + dy * t)
}

/// Distance from `(x, y)` to the segment.
pub fn point_distance(x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) -> f64 {
    let (px, py) = nearest_point(x1, y1, x2, y2, x, y);
    distance(px, py, x, y)
}

/// Returns true when `(x, y)` lies within the stroke of the segment.
pub fn in_stroke(x1: f64, y1: f64, x2: f64, y2: f64, line_width: f64, x: f64, y: f64) -> bool {
    let half = line_width / 2.0;
    let min_x = x1.min(x2) - half;
    let max_x = x1.max(x2) + half;
    let min_y = y1.min(y2) - half;
    let max_y = y1.max(y2) + half;
    if x < min_x || x > max_x || y < min_y || y > max_y {
        return false;
    }
    point_distance(x1, y1, x2, y2, x, y) <= half
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_to_segment_interior_and_ends() {
        assert_eq!(point_distance(0.0, 0.0, 10.0, 0.0, 5.0, 3.0), 3.0);
        assert_eq!(point_distance(0.0, 0.0, 10.0, 0.0, 13.0, 4.0), 5.0);
    }

    #[test]
    fn stroke_respects_half_width() {
        assert!(in_stroke(0.0, 0.0, 10.0, 0.0, 4.0, 5.0, 2.0));
        assert!(!in_stroke(0.0, 0.0, 10.0, 0.0, 4.0, 5.0, 2.5));
    }

    #[test]
    fn degenerate_segment_is_a_point() {
        assert_eq!(point_distance(2.0, 2.0, 2.0, 2.0, 5.0, 6.0), 5.0);
    }
}
