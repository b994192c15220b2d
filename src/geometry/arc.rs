//! Circular and elliptical arc stroke tests.

use super::{distance, polygon};
use std::f64::consts::TAU;

/// Parameters of an arc in center form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcParams {
    pub cx: f64,
    pub cy: f64,
    pub rx: f64,
    pub ry: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    /// Rotation of the ellipse's x axis, in radians.
    pub x_rotation: f64,
    /// True when the sweep runs toward increasing angles.
    pub clockwise: bool,
}

impl ArcParams {
    pub fn circle(cx: f64, cy: f64, r: f64, start_angle: f64, end_angle: f64, clockwise: bool) -> Self {
        Self {
            cx,
            cy,
            rx: r,
            ry: r,
            start_angle,
            end_angle,
            x_rotation: 0.0,
            clockwise,
        }
    }

    /// Signed sweep angle from start to end.
    pub fn sweep(&self) -> f64 {
        let raw = self.end_angle - self.start_angle;
        if raw.abs() >= TAU {
            return TAU.copysign(raw);
        }
        if self.clockwise {
            raw.rem_euclid(TAU)
        } else {
            -(-raw).rem_euclid(TAU)
        }
    }

    /// Point on the arc at parameter angle `theta`.
    pub fn point_at(&self, theta: f64) -> (f64, f64) {
        let (sin_r, cos_r) = self.x_rotation.sin_cos();
        let ex = self.rx * theta.cos();
        let ey = self.ry * theta.sin();
        (
            self.cx + ex * cos_r - ey * sin_r,
            self.cy + ex * sin_r + ey * cos_r,
        )
    }

    /// Polyline approximation of the arc with at least `min_steps` segments.
    pub fn flatten(&self, min_steps: usize) -> Vec<(f64, f64)> {
        let sweep = self.sweep();
        let steps = ((sweep.abs() / TAU) * 64.0).ceil().max(min_steps as f64) as usize;
        (0..=steps)
            .map(|i| self.point_at(self.start_angle + sweep * i as f64 / steps as f64))
            .collect()
    }

    /// True when `angle` lies within the swept range.
    pub fn contains_angle(&self, angle: f64) -> bool {
        let sweep = self.sweep();
        if sweep.abs() >= TAU {
            return true;
        }
        let delta = angle - self.start_angle;
        if sweep >= 0.0 {
            delta.rem_euclid(TAU) <= sweep
        } else {
            (-delta).rem_euclid(TAU) <= -sweep
        }
    }
}

/// Stroke test for an arc: the angle must fall inside the sweep and the
/// radial distance within half the line width. Elliptical or rotated arcs are
/// tested against a fine polyline approximation.
pub fn in_stroke(arc: &ArcParams, line_width: f64, x: f64, y: f64) -> bool {
    let half = line_width / 2.0;
    if (arc.rx - arc.ry).abs() > f64::EPSILON {
        let points = arc.flatten(16);
        return polygon::in_polyline(&points, false, line_width, x, y);
    }
    let r = arc.rx;
    let d = distance(arc.cx, arc.cy, x, y);
    if (d - r).abs() <= half {
        let angle = (y - arc.cy).atan2(x - arc.cx);
        if arc.contains_angle(angle) {
            return true;
        }
    }
    let (sx, sy) = arc.point_at(arc.start_angle);
    let (ex, ey) = arc.point_at(arc.end_angle);
    distance(sx, sy, x, y) <= half || distance(ex, ey, x, y) <= half
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn quarter_arc_hits_only_its_sweep() {
        let arc = ArcParams::circle(0.0, 0.0, 10.0, 0.0, FRAC_PI_2, true);
        assert!(in_stroke(&arc, 2.0, 7.07, 7.07));
        assert!(!in_stroke(&arc, 2.0, -7.07, 7.07));
    }

    #[test]
    fn counter_clockwise_sweep_goes_the_other_way() {
        let arc = ArcParams::circle(0.0, 0.0, 10.0, 0.0, FRAC_PI_2, false);
        assert!(in_stroke(&arc, 2.0, -7.07, -7.07));
        assert!(!in_stroke(&arc, 2.0, 7.07, 7.07));
    }

    #[test]
    fn sweep_is_signed() {
        assert!((ArcParams::circle(0.0, 0.0, 1.0, 0.0, PI, true).sweep() - PI).abs() < 1e-12);
        assert!((ArcParams::circle(0.0, 0.0, 1.0, 0.0, PI / 2.0, false).sweep() + 1.5 * PI).abs() < 1e-12);
    }

    #[test]
    fn elliptical_arc_uses_flattening() {
        let arc = ArcParams {
            cx: 0.0,
            cy: 0.0,
            rx: 20.0,
            ry: 10.0,
            start_angle: 0.0,
            end_angle: PI,
            x_rotation: 0.0,
            clockwise: true,
        };
        assert!(in_stroke(&arc, 2.0, 0.0, 10.0));
        assert!(!in_stroke(&arc, 2.0, 0.0, -10.0));
    }
}
