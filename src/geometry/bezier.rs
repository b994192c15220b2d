//! Quadratic and cubic Bézier evaluation, bounds, and nearest distance.

use super::distance;
use crate::math::BBox;

const SAMPLE_SEGMENTS: usize = 20;
const REFINE_EPSILON: f64 = 1e-4;
const MAX_REFINE_STEPS: usize = 64;

pub fn quadratic_at(p0: f64, p1: f64, p2: f64, t: f64) -> f64 {
    let mt = 1.0 - t;
    mt * mt * p0 + 2.0 * mt * t * p1 + t * t * p2
}

pub fn cubic_at(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let mt = 1.0 - t;
    mt * mt * mt * p0 + 3.0 * mt * mt * t * p1 + 3.0 * mt * t * t * p2 + t * t * t * p3
}

/// Parameters in (0, 1) where the quadratic's derivative vanishes.
fn quadratic_extrema(p0: f64, p1: f64, p2: f64) -> Vec<f64> {
    let denom = p0 - 2.0 * p1 + p2;
    if denom.abs() < f64::EPSILON {
        return Vec::new();
    }
    let t = (p0 - p1) / denom;
    if t > 0.0 && t < 1.0 { vec![t] } else { Vec::new() }
}

/// Parameters in (0, 1) where the cubic's derivative vanishes.
fn cubic_extrema(p0: f64, p1: f64, p2: f64, p3: f64) -> Vec<f64> {
    let a = -3.0 * p0 + 9.0 * p1 - 9.0 * p2 + 3.0 * p3;
    let b = 6.0 * p0 - 12.0 * p1 + 6.0 * p2;
    let c = 3.0 * p1 - 3.0 * p0;
    let mut roots = Vec::with_capacity(2);
    if a.abs() < 1e-12 {
        if b.abs() > 1e-12 {
            roots.push(-c / b);
        }
    } else {
        let disc = b * b - 4.0 * a * c;
        if disc >= 0.0 {
            let sq = disc.sqrt();
            roots.push((-b + sq) / (2.0 * a));
            roots.push((-b - sq) / (2.0 * a));
        }
    }
    roots.retain(|t| *t > 0.0 && *t < 1.0);
    roots
}

/// Tight bounds of a quadratic curve.
pub fn quadratic_bbox(x0: f64, y0: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> BBox {
    let mut bbox = BBox::from_min_max(x0.min(x2), y0.min(y2), x0.max(x2), y0.max(y2));
    for t in quadratic_extrema(x0, x1, x2) {
        bbox.include_point(quadratic_at(x0, x1, x2, t), y0);
    }
    for t in quadratic_extrema(y0, y1, y2) {
        bbox.include_point(x0, quadratic_at(y0, y1, y2, t));
    }
    bbox
}

/// Tight bounds of a cubic curve.
pub fn cubic_bbox(x0: f64, y0: f64, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) -> BBox {
    let mut bbox = BBox::from_min_max(x0.min(x3), y0.min(y3), x0.max(x3), y0.max(y3));
    for t in cubic_extrema(x0, x1, x2, x3) {
        bbox.include_point(cubic_at(x0, x1, x2, x3, t), y0);
    }
    for t in cubic_extrema(y0, y1, y2, y3) {
        bbox.include_point(x0, cubic_at(y0, y1, y2, y3, t));
    }
    bbox
}

/// Minimum distance from `(x, y)` to a parametric curve on `[0, 1]`.
///
/// Samples the curve coarsely, then refines the best parameter by stepping
/// an interval left or right and halving it when neither side improves.
fn nearest_distance<F>(eval: F, x: f64, y: f64) -> f64
where
    F: Fn(f64) -> (f64, f64),
{
    let step = 1.0 / SAMPLE_SEGMENTS as f64;
    let mut best_t = 0.0;
    let mut best_d = f64::INFINITY;
    for i in 0..=SAMPLE_SEGMENTS {
        let t = i as f64 * step;
        let (px, py) = eval(t);
        let d = distance(px, py, x, y);
        if d < best_d {
            best_d = d;
            best_t = t;
        }
    }

    let mut interval = step / 2.0;
    for _ in 0..MAX_REFINE_STEPS {
        if interval < REFINE_EPSILON {
            break;
        }
        let prev = best_t - interval;
        let next = best_t + interval;
        let prev_d = if prev >= 0.0 {
            let (px, py) = eval(prev);
            distance(px, py, x, y)
        } else {
            f64::INFINITY
        };
        if prev_d < best_d {
            best_t = prev;
            best_d = prev_d;
            continue;
        }
        let next_d = if next <= 1.0 {
            let (px, py) = eval(next);
            distance(px, py, x, y)
        } else {
            f64::INFINITY
        };
        if next_d < best_d {
            best_t = next;
            best_d = next_d;
        } else {
            interval *= 0.5;
        }
    }
    best_d
}

pub fn quadratic_point_distance(
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    x: f64,
    y: f64,
) -> f64 {
    nearest_distance(
        |t| (quadratic_at(x0, x1, x2, t), quadratic_at(y0, y1, y2, t)),
        x,
        y,
    )
}

pub fn cubic_point_distance(
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    x3: f64,
    y3: f64,
    x: f64,
    y: f64,
) -> f64 {
    nearest_distance(
        |t| (cubic_at(x0, x1, x2, x3, t), cubic_at(y0, y1, y2, y3, t)),
        x,
        y,
    )
}

/// Stroke test for a quadratic curve with a bounding-box pre-reject.
pub fn in_quadratic_stroke(
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    line_width: f64,
    x: f64,
    y: f64,
) -> bool {
    let half = line_width / 2.0;
    if !quadratic_bbox(x0, y0, x1, y1, x2, y2).inflate(half).contains_point(x, y) {
        return false;
    }
    quadratic_point_distance(x0, y0, x1, y1, x2, y2, x, y) <= half
}

/// Stroke test for a cubic curve with a bounding-box pre-reject.
pub fn in_cubic_stroke(
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    x3: f64,
    y3: f64,
    line_width: f64,
    x: f64,
    y: f64,
) -> bool {
    let half = line_width / 2.0;
    if !cubic_bbox(x0, y0, x1, y1, x2, y2, x3, y3).inflate(half).contains_point(x, y) {
        return false;
    }
    cubic_point_distance(x0, y0, x1, y1, x2, y2, x3, y3, x, y) <= half
}

/// Splits a cubic at `t` using de Casteljau, returning both halves as
/// `[p0, p1, p2, p3]` control polygons.
pub fn split_cubic(points: [(f64, f64); 4], t: f64) -> ([(f64, f64); 4], [(f64, f64); 4]) {
    let lerp = |a: (f64, f64), b: (f64, f64)| (a.0 + (b.0 - a.0) * t, a.1 + (b.1 - a.1) * t);
    let [p0, p1, p2, p3] = points;
    let p01 = lerp(p0, p1);
    let p12 = lerp(p1, p2);
    let p23 = lerp(p2, p3);
    let p012 = lerp(p01, p12);
    let p123 = lerp(p12, p23);
    let mid = lerp(p012, p123);
    ([p0, p01, p012, mid], [mid, p123, p23, p3])
}
