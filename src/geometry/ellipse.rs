//! Circle and ellipse fill/stroke tests.

use super::distance;

/// Fill/stroke test for a circle. A shape that is both filled and stroked
/// hits anywhere out to the outer edge of the stroke.
pub fn in_circle(
    cx: f64,
    cy: f64,
    r: f64,
    is_stroke: bool,
    is_fill: bool,
    line_width: f64,
    x: f64,
    y: f64,
) -> bool {
    let half = line_width / 2.0;
    let d = distance(cx, cy, x, y);
    match (is_fill, is_stroke) {
        (true, true) => d <= r + half,
        (true, false) => d <= r,
        (false, true) => d >= r - half && d <= r + half,
        (false, false) => false,
    }
}

/// Returns true when `(x, y)` is inside the axis-aligned ellipse.
pub fn in_ellipse_area(cx: f64, cy: f64, rx: f64, ry: f64, x: f64, y: f64) -> bool {
    if rx <= 0.0 || ry <= 0.0 {
        return false;
    }
    let nx = (x - cx) / rx;
    let ny = (y - cy) / ry;
    nx * nx + ny * ny <= 1.0
}

/// Fill/stroke test for an axis-aligned ellipse.
///
/// The stroke band is approximated by the region between the ellipses shrunk
/// and grown by half the line width.
pub fn in_ellipse(
    cx: f64,
    cy: f64,
    rx: f64,
    ry: f64,
    is_stroke: bool,
    is_fill: bool,
    line_width: f64,
    x: f64,
    y: f64,
) -> bool {
    let half = line_width / 2.0;
    let outer = in_ellipse_area(cx, cy, rx + half, ry + half, x, y);
    match (is_fill, is_stroke) {
        (true, true) => outer,
        (true, false) => in_ellipse_area(cx, cy, rx, ry, x, y),
        (false, true) => outer && !in_ellipse_area(cx, cy, rx - half, ry - half, x, y),
        (false, false) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filled_circle_hits_up_to_radius() {
        assert!(in_circle(0.0, 0.0, 10.0, false, true, 0.0, 10.0, 0.0));
        assert!(!in_circle(0.0, 0.0, 10.0, false, true, 0.0, 10.01, 0.0));
    }

    #[test]
    fn stroked_circle_is_a_ring() {
        assert!(!in_circle(0.0, 0.0, 10.0, true, false, 4.0, 5.0, 0.0));
        assert!(in_circle(0.0, 0.0, 10.0, true, false, 4.0, 8.0, 0.0));
        assert!(in_circle(0.0, 0.0, 10.0, true, false, 4.0, 12.0, 0.0));
        assert!(!in_circle(0.0, 0.0, 10.0, true, false, 4.0, 12.5, 0.0));
    }

    #[test]
    fn ellipse_stroke_band() {
        assert!(in_ellipse(0.0, 0.0, 20.0, 10.0, true, false, 2.0, 20.5, 0.0));
        assert!(!in_ellipse(0.0, 0.0, 20.0, 10.0, true, false, 2.0, 10.0, 0.0));
        assert!(in_ellipse(0.0, 0.0, 20.0, 10.0, false, true, 0.0, 10.0, 0.0));
    }
}
