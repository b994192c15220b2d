//! Point-in-shape and point-in-stroke primitives.
//!
//! Every function works in the shape's local coordinate frame. Stroke tests
//! take the full line width and compare distances against half of it.

pub mod arc;
pub mod bezier;
pub mod ellipse;
pub mod line;
pub mod polygon;
pub mod rect;

/// Euclidean distance between two points.
pub fn distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt()
}

/// Returns true when `(x, y)` lies inside the box, edges included.
pub fn in_box(min_x: f64, min_y: f64, width: f64, height: f64, x: f64, y: f64) -> bool {
    min_x <= x && x <= min_x + width && min_y <= y && y <= min_y + height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        assert_eq!(distance(0.0, 0.0, 3.0, 4.0), 5.0);
    }

    #[test]
    fn in_box_includes_edges() {
        assert!(in_box(0.0, 0.0, 10.0, 10.0, 10.0, 0.0));
        assert!(!in_box(0.0, 0.0, 10.0, 10.0, 10.1, 0.0));
    }
}
