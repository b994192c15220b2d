//! Arbitrary paths built from SVG-style commands.

use crate::draw::attrs::Attrs;
use crate::math::BBox;
use crate::path::{ResolvedPath, SegmentKind};

use super::arrow::with_arrows;
use super::{ArrowTangents, BBoxProvider, Drawable, HitQuery, Pickable};

/// Emits resolved segments into the current Cairo path.
pub fn trace_path(ctx: &cairo::Context, path: &ResolvedPath) {
    for segment in &path.segments {
        let (x, y) = segment.end;
        match segment.kind {
            SegmentKind::Move => ctx.move_to(x, y),
            SegmentKind::Line => ctx.line_to(x, y),
            SegmentKind::Quad { control: (cx, cy) } => {
                // Cairo only knows cubics; elevate the degree.
                let (x0, y0) = segment.start;
                ctx.curve_to(
                    x0 + 2.0 / 3.0 * (cx - x0),
                    y0 + 2.0 / 3.0 * (cy - y0),
                    x + 2.0 / 3.0 * (cx - x),
                    y + 2.0 / 3.0 * (cy - y),
                    x,
                    y,
                );
            }
            SegmentKind::Cubic {
                control1: (ax, ay),
                control2: (bx, by),
            } => ctx.curve_to(ax, ay, bx, by, x, y),
            SegmentKind::Arc(arc) => {
                let _ = ctx.save();
                ctx.translate(arc.cx, arc.cy);
                ctx.rotate(arc.x_rotation);
                ctx.scale(arc.rx, arc.ry);
                let end = arc.start_angle + arc.sweep();
                if arc.sweep() >= 0.0 {
                    ctx.arc(0.0, 0.0, 1.0, arc.start_angle, end);
                } else {
                    ctx.arc_negative(0.0, 0.0, 1.0, arc.start_angle, end);
                }
                let _ = ctx.restore();
            }
            SegmentKind::Close => ctx.close_path(),
        }
    }
}

/// Path shape; the `path` attribute holds absolute commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathShape;

impl BBoxProvider for PathShape {
    fn bbox(&self, attrs: &Attrs) -> Option<BBox> {
        with_arrows(attrs.resolved_path().bbox(), attrs, self.arrow_tangents(attrs))
    }
}

impl Drawable for PathShape {
    fn create_path(&self, ctx: &cairo::Context, attrs: &Attrs) {
        trace_path(ctx, attrs.resolved_path());
    }

    fn arrow_tangents(&self, attrs: &Attrs) -> ArrowTangents {
        let path = attrs.resolved_path();
        (path.start_tangent(), path.end_tangent())
    }
}

impl Pickable for PathShape {
    fn is_in_stroke_or_path(&self, attrs: &Attrs, q: &HitQuery) -> bool {
        let path = attrs.resolved_path();
        if path.is_empty() {
            return false;
        }
        (q.is_stroke && path.in_stroke(q.line_width, q.x, q.y)) || (q.is_fill && path.in_fill(q.x, q.y))
    }
}
