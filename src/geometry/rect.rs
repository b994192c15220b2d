//! Rectangle fill/stroke tests, with optional rounded corners.

use super::arc::{self, ArcParams};
use super::{distance, in_box, line};
use std::f64::consts::{FRAC_PI_2, PI};

/// Stroke test for the four edges of a plain rectangle.
pub fn in_rect_stroke(x: f64, y: f64, width: f64, height: f64, line_width: f64, px: f64, py: f64) -> bool {
    let half = line_width / 2.0;
    in_box(x - half, y - half, width, line_width, px, py)
        || in_box(x + width - half, y - half, line_width, height, px, py)
        || in_box(x + half, y + height - half, width, line_width, px, py)
        || in_box(x - half, y + half, line_width, height, px, py)
}

fn corner_arcs(x: f64, y: f64, width: f64, height: f64, r: f64) -> [ArcParams; 4] {
    [
        ArcParams::circle(x + r, y + r, r, PI, 1.5 * PI, true),
        ArcParams::circle(x + width - r, y + r, r, 1.5 * PI, 2.0 * PI, true),
        ArcParams::circle(x + width - r, y + height - r, r, 0.0, FRAC_PI_2, true),
        ArcParams::circle(x + r, y + height - r, r, FRAC_PI_2, PI, true),
    ]
}

/// Stroke test for a rounded rectangle: four shortened edges plus four
/// quarter arcs.
pub fn in_rounded_stroke(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    radius: f64,
    line_width: f64,
    px: f64,
    py: f64,
) -> bool {
    let r = clamp_radius(width, height, radius);
    let edges = [
        (x + r, y, x + width - r, y),
        (x + width, y + r, x + width, y + height - r),
        (x + width - r, y + height, x + r, y + height),
        (x, y + height - r, x, y + r),
    ];
    edges
        .iter()
        .any(|&(x1, y1, x2, y2)| line::in_stroke(x1, y1, x2, y2, line_width, px, py))
        || corner_arcs(x, y, width, height, r)
            .iter()
            .any(|a| arc::in_stroke(a, line_width, px, py))
}

/// Fill test for a rounded rectangle: inside the box and, within a corner
/// square, inside that corner's circle.
pub fn in_rounded_area(x: f64, y: f64, width: f64, height: f64, radius: f64, px: f64, py: f64) -> bool {
    if !in_box(x, y, width, height, px, py) {
        return false;
    }
    let r = clamp_radius(width, height, radius);
    let cx = if px < x + r {
        x + r
    } else if px > x + width - r {
        x + width - r
    } else {
        return true;
    };
    let cy = if py < y + r {
        y + r
    } else if py > y + height - r {
        y + height - r
    } else {
        return true;
    };
    distance(cx, cy, px, py) <= r
}

/// Radius never exceeds half of the shorter side.
pub fn clamp_radius(width: f64, height: f64, radius: f64) -> f64 {
    radius.max(0.0).min(width.abs() / 2.0).min(height.abs() / 2.0)
}

/// Combined fill/stroke test for a rectangle with optional corner radius.
pub fn in_rect(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    radius: f64,
    is_stroke: bool,
    is_fill: bool,
    line_width: f64,
    px: f64,
    py: f64,
) -> bool {
    if radius <= 0.0 {
        let half = line_width / 2.0;
        return match (is_fill, is_stroke) {
            (true, true) => in_box(x - half, y - half, width + line_width, height + line_width, px, py),
            (true, false) => in_box(x, y, width, height, px, py),
            (false, true) => in_rect_stroke(x, y, width, height, line_width, px, py),
            (false, false) => false,
        };
    }
    (is_stroke && in_rounded_stroke(x, y, width, height, radius, line_width, px, py))
        || (is_fill && in_rounded_area(x, y, width, height, radius, px, py))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_stroke_misses_interior() {
        assert!(in_rect(0.0, 0.0, 100.0, 50.0, 0.0, true, false, 4.0, 1.0, 25.0));
        assert!(!in_rect(0.0, 0.0, 100.0, 50.0, 0.0, true, false, 4.0, 50.0, 25.0));
        assert!(in_rect(0.0, 0.0, 100.0, 50.0, 0.0, false, true, 0.0, 50.0, 25.0));
    }

    #[test]
    fn rounded_corner_excludes_square_tip() {
        assert!(!in_rounded_area(0.0, 0.0, 100.0, 100.0, 20.0, 1.0, 1.0));
        assert!(in_rounded_area(0.0, 0.0, 100.0, 100.0, 20.0, 10.0, 10.0));
        assert!(in_rounded_area(0.0, 0.0, 100.0, 100.0, 20.0, 50.0, 2.0));
    }

    #[test]
    fn rounded_stroke_follows_corner_arc() {
        let on_arc = 20.0 - 20.0 * std::f64::consts::FRAC_1_SQRT_2;
        assert!(in_rounded_stroke(0.0, 0.0, 100.0, 100.0, 20.0, 2.0, on_arc, on_arc));
        assert!(!in_rounded_stroke(0.0, 0.0, 100.0, 100.0, 20.0, 2.0, 1.0, 1.0));
    }
}
