//! Start/end arrowheads attached to lines, polylines, and paths.

use std::f64::consts::FRAC_PI_6;

use crate::draw::attrs::{AttrKey, Attrs};
use crate::geometry::polygon;
use crate::math::{BBox, Matrix};
use crate::path::{PathCommand, resolve};

use super::ArrowTangents;

type Point = (f64, f64);

/// Default arrowhead length in pixels.
pub const ARROW_LENGTH: f64 = 10.0;

/// Arrowhead attached to one end of an open shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrowSpec {
    /// Two strokes at 30 degrees from the line direction.
    Default,
    /// Custom head drawn in a frame where the tip is the origin and +x points
    /// along the line; the line is shortened by `d`.
    Custom { path: Vec<PathCommand>, d: f64 },
}

/// Calculates the two wing points of a default arrowhead at `tip`.
///
/// The direction runs from `from` to `tip`. The head is capped at 30% of the
/// segment length so short segments keep a sensible shape.
pub fn arrowhead_points(from: Point, tip: Point, length: f64, angle: f64) -> [Point; 2] {
    let dx = tip.0 - from.0;
    let dy = tip.1 - from.1;
    let line_length = (dx * dx + dy * dy).sqrt();
    if line_length < 1.0 {
        return [tip, tip];
    }

    let ux = dx / line_length;
    let uy = dy / line_length;
    let arrow_length = length.min(line_length * 0.3);
    let (sin_a, cos_a) = angle.sin_cos();

    let left = (
        tip.0 - arrow_length * (ux * cos_a - uy * sin_a),
        tip.1 - arrow_length * (uy * cos_a + ux * sin_a),
    );
    let right = (
        tip.0 - arrow_length * (ux * cos_a + uy * sin_a),
        tip.1 - arrow_length * (uy * cos_a - ux * sin_a),
    );
    [left, right]
}

/// Frame that maps custom arrow coordinates onto the tip.
fn custom_frame(from: Point, tip: Point) -> Matrix {
    let angle = (tip.1 - from.1).atan2(tip.0 - from.0);
    Matrix::translation(tip.0, tip.1).multiply(&Matrix::rotation(angle))
}

impl ArrowSpec {
    /// Where the line itself should end so it does not poke through a custom head.
    pub fn shorten(&self, from: Point, tip: Point) -> Point {
        match self {
            ArrowSpec::Default => tip,
            ArrowSpec::Custom { d, .. } => {
                let dx = tip.0 - from.0;
                let dy = tip.1 - from.1;
                let len = (dx * dx + dy * dy).sqrt();
                if len <= f64::EPSILON || *d == 0.0 {
                    return tip;
                }
                (tip.0 - dx / len * d, tip.1 - dy / len * d)
            }
        }
    }

    /// Emits the arrowhead outline into the current Cairo path.
    pub fn trace(&self, ctx: &cairo::Context, from: Point, tip: Point) {
        match self {
            ArrowSpec::Default => {
                let [left, right] = arrowhead_points(from, tip, ARROW_LENGTH, FRAC_PI_6);
                ctx.move_to(left.0, left.1);
                ctx.line_to(tip.0, tip.1);
                ctx.line_to(right.0, right.1);
            }
            ArrowSpec::Custom { path, .. } => {
                let frame = custom_frame(from, tip);
                let _ = ctx.save();
                ctx.transform(frame.to_cairo());
                super::path::trace_path(ctx, &resolve(path));
                let _ = ctx.restore();
            }
        }
    }

    /// Local bounds of the head, before stroke inflation.
    pub fn bbox(&self, from: Point, tip: Point) -> Option<BBox> {
        match self {
            ArrowSpec::Default => {
                let [left, right] = arrowhead_points(from, tip, ARROW_LENGTH, FRAC_PI_6);
                BBox::from_points(&[left, tip, right])
            }
            ArrowSpec::Custom { path, .. } => resolve(path)
                .bbox()
                .map(|bbox| bbox.transform(&custom_frame(from, tip))),
        }
    }

    /// Hit test against the arrowhead, with `line_width` already including slop.
    pub fn is_hit(&self, from: Point, tip: Point, line_width: f64, x: f64, y: f64) -> bool {
        match self {
            ArrowSpec::Default => {
                let [left, right] = arrowhead_points(from, tip, ARROW_LENGTH, FRAC_PI_6);
                polygon::in_polyline(&[left, tip, right], false, line_width, x, y)
            }
            ArrowSpec::Custom { path, .. } => {
                let Some(inverse) = custom_frame(from, tip).invert() else {
                    return false;
                };
                let (lx, ly) = inverse.apply(x, y);
                let resolved = resolve(path);
                resolved.in_fill(lx, ly) || resolved.in_stroke(line_width, lx, ly)
            }
        }
    }
}

/// Draws both arrows of a shape given its start and end tangents.
pub fn draw_arrows(
    ctx: &cairo::Context,
    attrs: &Attrs,
    start: Option<(Point, Point)>,
    end: Option<(Point, Point)>,
) -> Result<(), cairo::Error> {
    for (key, tangent) in [(AttrKey::StartArrow, start), (AttrKey::EndArrow, end)] {
        let (Some(arrow), Some((from, tip))) = (attrs.arrow(key), tangent) else {
            continue;
        };
        ctx.new_path();
        arrow.trace(ctx, from, tip);
        match arrow {
            // Custom heads are filled with the stroke paint; the source is already set.
            ArrowSpec::Custom { .. } => ctx.fill()?,
            ArrowSpec::Default => ctx.stroke()?,
        }
    }
    Ok(())
}

/// Grows `body` to cover the arrowheads of an open shape.
///
/// Heads are only drawn with a stroke, so unstroked shapes keep `body`.
pub fn with_arrows(body: Option<BBox>, attrs: &Attrs, (start, end): ArrowTangents) -> Option<BBox> {
    if !attrs.has_stroke() {
        return body;
    }
    // A mitered default head reaches a full line width past its tip.
    let join = attrs.number_or(AttrKey::LineWidth, 1.0) / 2.0;
    let heads = [(AttrKey::StartArrow, start), (AttrKey::EndArrow, end)]
        .into_iter()
        .filter_map(|(key, tangent)| {
            let arrow = attrs.arrow(key)?;
            let (from, tip) = tangent?;
            let bbox = arrow.bbox(from, tip)?;
            Some(match arrow {
                ArrowSpec::Default => bbox.inflate(join),
                ArrowSpec::Custom { .. } => bbox,
            })
        });
    BBox::merge(body.into_iter().chain(heads))
}

/// Hit test over both arrows of a shape.
pub fn arrows_hit(
    attrs: &Attrs,
    start: Option<(Point, Point)>,
    end: Option<(Point, Point)>,
    line_width: f64,
    x: f64,
    y: f64,
) -> bool {
    [(AttrKey::StartArrow, start), (AttrKey::EndArrow, end)]
        .into_iter()
        .any(|(key, tangent)| match (attrs.arrow(key), tangent) {
            (Some(arrow), Some((from, tip))) => arrow.is_hit(from, tip, line_width, x, y),
            _ => false,
        })
}
