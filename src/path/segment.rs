//! Drawable segments derived from absolute commands.
//!
//! Shorthand commands are expanded here: H and V become lines, S and T get
//! their reflected control points, and arcs are converted to center form.

use std::f64::consts::TAU;

use crate::geometry::{arc, arc::ArcParams, bezier, distance, line, polygon};
use crate::math::BBox;

use super::command::PathCommand;

type Point = (f64, f64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentKind {
    Move,
    Line,
    Quad { control: Point },
    Cubic { control1: Point, control2: Point },
    Arc(ArcParams),
    /// Closes back to the subpath start, stored as `end`.
    Close,
}

/// One resolved piece of a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub start: Point,
    pub end: Point,
    /// Arrow placement at the start: `(from, tip)`, pointing away from the path.
    pub start_tangent: Option<(Point, Point)>,
    /// Arrow placement at the end: `(from, tip)`.
    pub end_tangent: Option<(Point, Point)>,
    bbox: BBox,
}

impl Segment {
    fn new(kind: SegmentKind, start: Point, end: Point) -> Self {
        let (start_tangent, end_tangent) = match kind {
            SegmentKind::Move => (None, None),
            SegmentKind::Line | SegmentKind::Close => (Some((end, start)), Some((start, end))),
            SegmentKind::Quad { control } => (Some((control, start)), Some((control, end))),
            SegmentKind::Cubic { control1, control2 } => {
                (Some((control1, start)), Some((control2, end)))
            }
            SegmentKind::Arc(params) => {
                let nudge = params.sweep() * 0.01;
                (
                    Some((params.point_at(params.start_angle + nudge), start)),
                    Some((params.point_at(params.end_angle - nudge), end)),
                )
            }
        };
        Self {
            kind,
            start,
            end,
            start_tangent,
            end_tangent,
            bbox: segment_bbox(kind, start, end),
        }
    }

    /// Tight bounds of the segment geometry, ignoring line width.
    pub fn bbox(&self) -> BBox {
        self.bbox
    }

    /// Stroke test against this segment alone.
    pub fn in_stroke(&self, line_width: f64, x: f64, y: f64) -> bool {
        let (x0, y0) = self.start;
        let (x1, y1) = self.end;
        match self.kind {
            SegmentKind::Move => false,
            SegmentKind::Line | SegmentKind::Close => line::in_stroke(x0, y0, x1, y1, line_width, x, y),
            SegmentKind::Quad { control: (cx, cy) } => {
                bezier::in_quadratic_stroke(x0, y0, cx, cy, x1, y1, line_width, x, y)
            }
            SegmentKind::Cubic {
                control1: (ax, ay),
                control2: (bx, by),
            } => bezier::in_cubic_stroke(x0, y0, ax, ay, bx, by, x1, y1, line_width, x, y),
            SegmentKind::Arc(params) => arc::in_stroke(&params, line_width, x, y),
        }
    }

    /// Appends a polyline approximation (excluding the start point).
    fn flatten_into(&self, points: &mut Vec<Point>) {
        const STEPS: usize = 16;
        let (x0, y0) = self.start;
        let (x1, y1) = self.end;
        match self.kind {
            SegmentKind::Move => {}
            SegmentKind::Line | SegmentKind::Close => points.push(self.end),
            SegmentKind::Quad { control: (cx, cy) } => {
                for i in 1..=STEPS {
                    let t = i as f64 / STEPS as f64;
                    points.push((
                        bezier::quadratic_at(x0, cx, x1, t),
                        bezier::quadratic_at(y0, cy, y1, t),
                    ));
                }
            }
            SegmentKind::Cubic {
                control1: (ax, ay),
                control2: (bx, by),
            } => {
                for i in 1..=STEPS {
                    let t = i as f64 / STEPS as f64;
                    points.push((
                        bezier::cubic_at(x0, ax, bx, x1, t),
                        bezier::cubic_at(y0, ay, by, y1, t),
                    ));
                }
            }
            SegmentKind::Arc(params) => points.extend(params.flatten(STEPS).into_iter().skip(1)),
        }
    }
}

fn segment_bbox(kind: SegmentKind, (x0, y0): Point, (x1, y1): Point) -> BBox {
    match kind {
        SegmentKind::Move => BBox::from_min_max(x1, y1, x1, y1),
        SegmentKind::Line | SegmentKind::Close => {
            BBox::from_min_max(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
        }
        SegmentKind::Quad { control: (cx, cy) } => bezier::quadratic_bbox(x0, y0, cx, cy, x1, y1),
        SegmentKind::Cubic {
            control1: (ax, ay),
            control2: (bx, by),
        } => bezier::cubic_bbox(x0, y0, ax, ay, bx, by, x1, y1),
        SegmentKind::Arc(params) => BBox::from_points(&params.flatten(32))
            .unwrap_or_else(|| BBox::from_min_max(x1, y1, x1, y1)),
    }
}

/// A path resolved into segments, with derived fill polygons.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedPath {
    pub segments: Vec<Segment>,
    pub has_arc: bool,
}

impl ResolvedPath {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn bbox(&self) -> Option<BBox> {
        BBox::merge(self.segments.iter().map(Segment::bbox))
    }

    /// One closed polygon per subpath, used for even-odd fill tests.
    pub fn polygons(&self) -> Vec<Vec<Point>> {
        let mut polygons = Vec::new();
        let mut current: Vec<Point> = Vec::new();
        for segment in &self.segments {
            if segment.kind == SegmentKind::Move {
                if current.len() > 2 {
                    polygons.push(std::mem::take(&mut current));
                }
                current.clear();
                current.push(segment.end);
            } else {
                if current.is_empty() {
                    current.push(segment.start);
                }
                segment.flatten_into(&mut current);
            }
        }
        if current.len() > 2 {
            polygons.push(current);
        }
        polygons
    }

    pub fn in_stroke(&self, line_width: f64, x: f64, y: f64) -> bool {
        let half = line_width / 2.0;
        self.segments
            .iter()
            .any(|segment| segment.bbox().inflate(half).contains_point(x, y) && segment.in_stroke(line_width, x, y))
    }

    pub fn in_fill(&self, x: f64, y: f64) -> bool {
        polygon::in_polygons(&self.polygons(), x, y)
    }

    /// Arrow placement for the path's start point.
    pub fn start_tangent(&self) -> Option<(Point, Point)> {
        self.segments.iter().find_map(|segment| match segment.kind {
            SegmentKind::Move => None,
            _ => segment.start_tangent,
        })
    }

    /// Arrow placement for the path's end point.
    pub fn end_tangent(&self) -> Option<(Point, Point)> {
        self.segments.iter().rev().find_map(|segment| match segment.kind {
            SegmentKind::Move => None,
            _ => segment.end_tangent,
        })
    }
}

fn reflect(point: Point, around: Point) -> Point {
    (2.0 * around.0 - point.0, 2.0 * around.1 - point.1)
}

/// Resolves absolute commands into segments.
pub fn resolve(commands: &[PathCommand]) -> ResolvedPath {
    let mut segments = Vec::with_capacity(commands.len());
    let mut current: Point = (0.0, 0.0);
    let mut subpath_start: Point = (0.0, 0.0);
    let mut last_cubic_control: Option<Point> = None;
    let mut last_quad_control: Option<Point> = None;
    let mut has_arc = false;

    for command in commands {
        let mut cubic_control = None;
        let mut quad_control = None;
        let segment = match *command {
            PathCommand::MoveTo { x, y } => {
                subpath_start = (x, y);
                Some(Segment::new(SegmentKind::Move, current, (x, y)))
            }
            PathCommand::LineTo { x, y } => Some(Segment::new(SegmentKind::Line, current, (x, y))),
            PathCommand::HorizontalTo { x } => {
                Some(Segment::new(SegmentKind::Line, current, (x, current.1)))
            }
            PathCommand::VerticalTo { y } => {
                Some(Segment::new(SegmentKind::Line, current, (current.0, y)))
            }
            PathCommand::CubicTo { x1, y1, x2, y2, x, y } => {
                cubic_control = Some((x2, y2));
                Some(Segment::new(
                    SegmentKind::Cubic {
                        control1: (x1, y1),
                        control2: (x2, y2),
                    },
                    current,
                    (x, y),
                ))
            }
            PathCommand::SmoothCubicTo { x2, y2, x, y } => {
                let control1 = last_cubic_control
                    .map(|control| reflect(control, current))
                    .unwrap_or(current);
                cubic_control = Some((x2, y2));
                Some(Segment::new(
                    SegmentKind::Cubic {
                        control1,
                        control2: (x2, y2),
                    },
                    current,
                    (x, y),
                ))
            }
            PathCommand::QuadTo { x1, y1, x, y } => {
                quad_control = Some((x1, y1));
                Some(Segment::new(SegmentKind::Quad { control: (x1, y1) }, current, (x, y)))
            }
            PathCommand::SmoothQuadTo { x, y } => {
                let control = last_quad_control
                    .map(|control| reflect(control, current))
                    .unwrap_or(current);
                quad_control = Some(control);
                Some(Segment::new(SegmentKind::Quad { control }, current, (x, y)))
            }
            PathCommand::ArcTo {
                rx,
                ry,
                rotation,
                large_arc,
                sweep,
                x,
                y,
            } => {
                if distance(current.0, current.1, x, y) < f64::EPSILON {
                    None
                } else {
                    match endpoint_to_center(current, (x, y), rx, ry, rotation, large_arc, sweep) {
                        Some(params) => {
                            has_arc = true;
                            Some(Segment::new(SegmentKind::Arc(params), current, (x, y)))
                        }
                        None => Some(Segment::new(SegmentKind::Line, current, (x, y))),
                    }
                }
            }
            PathCommand::Close => Some(Segment::new(SegmentKind::Close, current, subpath_start)),
        };
        last_cubic_control = cubic_control;
        last_quad_control = quad_control;
        if let Some(segment) = segment {
            current = segment.end;
            segments.push(segment);
        }
    }

    ResolvedPath { segments, has_arc }
}

fn vector_angle(ux: f64, uy: f64, vx: f64, vy: f64) -> f64 {
    let dot = ux * vx + uy * vy;
    let len = (ux * ux + uy * uy).sqrt() * (vx * vx + vy * vy).sqrt();
    let mut angle = (dot / len).clamp(-1.0, 1.0).acos();
    if ux * vy - uy * vx < 0.0 {
        angle = -angle;
    }
    angle
}

/// Converts an endpoint-parameterized arc to center form.
///
/// Returns `None` when either radius is zero, in which case the arc is drawn
/// as a straight line. Radii too small to span the endpoints are scaled up.
pub fn endpoint_to_center(
    from: Point,
    to: Point,
    rx: f64,
    ry: f64,
    rotation_degrees: f64,
    large_arc: bool,
    sweep: bool,
) -> Option<ArcParams> {
    let mut rx = rx.abs();
    let mut ry = ry.abs();
    if rx == 0.0 || ry == 0.0 {
        return None;
    }
    let phi = rotation_degrees.to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();
    let dx2 = (from.0 - to.0) / 2.0;
    let dy2 = (from.1 - to.1) / 2.0;
    let x1p = cos_phi * dx2 + sin_phi * dy2;
    let y1p = -sin_phi * dx2 + cos_phi * dy2;

    let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
    if lambda > 1.0 {
        rx *= lambda.sqrt();
        ry *= lambda.sqrt();
    }

    let numerator = rx * rx * ry * ry - rx * rx * y1p * y1p - ry * ry * x1p * x1p;
    let denominator = rx * rx * y1p * y1p + ry * ry * x1p * x1p;
    let mut coef = if denominator == 0.0 {
        0.0
    } else {
        (numerator / denominator).max(0.0).sqrt()
    };
    if large_arc == sweep {
        coef = -coef;
    }
    let cxp = coef * rx * y1p / ry;
    let cyp = -coef * ry * x1p / rx;

    let cx = cos_phi * cxp - sin_phi * cyp + (from.0 + to.0) / 2.0;
    let cy = sin_phi * cxp + cos_phi * cyp + (from.1 + to.1) / 2.0;

    let ux = (x1p - cxp) / rx;
    let uy = (y1p - cyp) / ry;
    let vx = (-x1p - cxp) / rx;
    let vy = (-y1p - cyp) / ry;
    let start_angle = vector_angle(1.0, 0.0, ux, uy);
    let mut delta = vector_angle(ux, uy, vx, vy) % TAU;
    if !sweep && delta > 0.0 {
        delta -= TAU;
    } else if sweep && delta < 0.0 {
        delta += TAU;
    }

    Some(ArcParams {
        cx,
        cy,
        rx,
        ry,
        start_angle,
        end_angle: start_angle + delta,
        x_rotation: phi,
        clockwise: sweep,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::parse_absolute;

    fn resolve_str(data: &str) -> ResolvedPath {
        resolve(&parse_absolute(data).unwrap())
    }

    #[test]
    fn shorthand_lines_expand() {
        let path = resolve_str("M0 0 H10 V10");
        assert_eq!(path.segments[1].end, (10.0, 0.0));
        assert_eq!(path.segments[2].end, (10.0, 10.0));
    }

    #[test]
    fn smooth_cubic_reflects_previous_control() {
        let path = resolve_str("M0 0 C0 10 10 10 10 0 S20 -10 20 0");
        match path.segments[2].kind {
            SegmentKind::Cubic { control1, .. } => assert_eq!(control1, (10.0, -10.0)),
            other => panic!("expected cubic, got {other:?}"),
        }
    }

    #[test]
    fn smooth_quad_without_predecessor_uses_current_point() {
        let path = resolve_str("M5 5 T10 10");
        assert_eq!(path.segments[1].kind, SegmentKind::Quad { control: (5.0, 5.0) });
    }

    #[test]
    fn semicircle_arc_center() {
        let params = endpoint_to_center((0.0, 0.0), (20.0, 0.0), 10.0, 10.0, 0.0, false, true).unwrap();
        assert!((params.cx - 10.0).abs() < 1e-9);
        assert!(params.cy.abs() < 1e-9);
        assert!((params.sweep().abs() - std::f64::consts::PI).abs() < 1e-9);
    }

    #[test]
    fn undersized_radii_are_scaled() {
        let params = endpoint_to_center((0.0, 0.0), (20.0, 0.0), 1.0, 1.0, 0.0, false, true).unwrap();
        assert!((params.rx - 10.0).abs() < 1e-9);
    }

    #[test]
    fn zero_radius_arc_is_a_line() {
        let path = resolve_str("M0 0 A0 5 0 0 1 10 0");
        assert_eq!(path.segments[1].kind, SegmentKind::Line);
        assert!(!path.has_arc);
    }

    #[test]
    fn closed_square_fills_and_strokes() {
        let path = resolve_str("M0 0 L10 0 L10 10 L0 10 Z");
        assert!(path.in_fill(5.0, 5.0));
        assert!(!path.in_fill(15.0, 5.0));
        assert!(path.in_stroke(2.0, 0.5, 5.0));
        assert!(!path.in_stroke(2.0, 5.0, 5.0));
        assert_eq!(path.bbox(), Some(BBox::new(0.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn tangents_point_outward() {
        let path = resolve_str("M0 0 L10 0");
        assert_eq!(path.start_tangent(), Some(((10.0, 0.0), (0.0, 0.0))));
        assert_eq!(path.end_tangent(), Some(((0.0, 0.0), (10.0, 0.0))));
    }
}
