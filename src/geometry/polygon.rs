//! Polygon fill (even-odd ray casting) and polyline stroke tests.

use super::line;

/// Ray-casting test that toggles on every edge crossing, so it implements the
/// even-odd rule.
fn crossings(points: &[(f64, f64)], x: f64, y: f64) -> usize {
    let n = points.len();
    if n < 3 {
        return 0;
    }
    let mut count = 0;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = points[i];
        let (xj, yj) = points[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            count += 1;
        }
        j = i;
    }
    count
}

/// Returns true when `(x, y)` is inside the polygon (even-odd rule).
pub fn in_polygon(points: &[(f64, f64)], x: f64, y: f64) -> bool {
    crossings(points, x, y) % 2 == 1
}

/// Even-odd test across several sub-polygons, as produced by a path with more
/// than one subpath. Crossings are summed so holes cut out of outer rings.
pub fn in_polygons(polygons: &[Vec<(f64, f64)>], x: f64, y: f64) -> bool {
    let total: usize = polygons.iter().map(|poly| crossings(poly, x, y)).sum();
    total % 2 == 1
}

/// Returns true when `(x, y)` is within the stroke of the polyline.
///
/// A closed polyline also tests the edge from the last point back to the first.
pub fn in_polyline(points: &[(f64, f64)], closed: bool, line_width: f64, x: f64, y: f64) -> bool {
    match points {
        [] => false,
        [only] => super::distance(only.0, only.1, x, y) <= line_width / 2.0,
        _ => {
            let hit_open = points
                .windows(2)
                .any(|w| line::in_stroke(w[0].0, w[0].1, w[1].0, w[1].1, line_width, x, y));
            if hit_open || !closed {
                return hit_open;
            }
            let first = points[0];
            let last = points[points.len() - 1];
            line::in_stroke(last.0, last.1, first.0, first.1, line_width, x, y)
        }
    }
}
