//! Open and closed point lists.

use crate::draw::attrs::{AttrKey, Attrs};
use crate::geometry::polygon;
use crate::math::BBox;

use super::arrow::with_arrows;
use super::{ArrowTangents, BBoxProvider, Drawable, HitQuery, Pickable};

fn points(attrs: &Attrs) -> &[(f64, f64)] {
    attrs.points(AttrKey::Points).unwrap_or(&[])
}

fn trace(ctx: &cairo::Context, points: &[(f64, f64)]) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    ctx.move_to(first.0, first.1);
    for &(x, y) in rest {
        ctx.line_to(x, y);
    }
}

/// Open polyline through `points`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Polyline;

impl BBoxProvider for Polyline {
    fn bbox(&self, attrs: &Attrs) -> Option<BBox> {
        with_arrows(BBox::from_points(points(attrs)), attrs, self.arrow_tangents(attrs))
    }
}

impl Drawable for Polyline {
    fn create_path(&self, ctx: &cairo::Context, attrs: &Attrs) {
        let pts = points(attrs);
        if pts.len() < 2 {
            return trace(ctx, pts);
        }
        let mut adjusted = pts.to_vec();
        let last = pts.len() - 1;
        if let Some(arrow) = attrs.arrow(AttrKey::StartArrow) {
            adjusted[0] = arrow.shorten(pts[1], pts[0]);
        }
        if let Some(arrow) = attrs.arrow(AttrKey::EndArrow) {
            adjusted[last] = arrow.shorten(pts[last - 1], pts[last]);
        }
        trace(ctx, &adjusted);
    }

    fn arrow_tangents(&self, attrs: &Attrs) -> ArrowTangents {
        let pts = points(attrs);
        if pts.len() < 2 {
            return (None, None);
        }
        let last = pts.len() - 1;
        (Some((pts[1], pts[0])), Some((pts[last - 1], pts[last])))
    }
}

impl Pickable for Polyline {
    fn is_in_stroke_or_path(&self, attrs: &Attrs, q: &HitQuery) -> bool {
        q.is_stroke && polygon::in_polyline(points(attrs), false, q.line_width, q.x, q.y)
    }
}

/// Closed polygon through `points`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Polygon;

impl BBoxProvider for Polygon {
    fn bbox(&self, attrs: &Attrs) -> Option<BBox> {
        BBox::from_points(points(attrs))
    }
}

impl Drawable for Polygon {
    fn create_path(&self, ctx: &cairo::Context, attrs: &Attrs) {
        let pts = points(attrs);
        if pts.is_empty() {
            return;
        }
        trace(ctx, pts);
        ctx.close_path();
    }
}

impl Pickable for Polygon {
    fn is_in_stroke_or_path(&self, attrs: &Attrs, q: &HitQuery) -> bool {
        let pts = points(attrs);
        (q.is_stroke && polygon::in_polyline(pts, true, q.line_width, q.x, q.y))
            || (q.is_fill && polygon::in_polygon(pts, q.x, q.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::BLUE;

    fn triangle() -> Attrs {
        Attrs::new().with(
            AttrKey::Points,
            vec![(0.0, 0.0), (20.0, 0.0), (10.0, 20.0)],
        )
    }

    #[test]
    fn polygon_fill_and_closing_edge() {
        let attrs = triangle().with(AttrKey::Fill, BLUE);
        let q = HitQuery::from_attrs(&attrs, 10.0, 5.0);
        assert!(Polygon.is_in_stroke_or_path(&attrs, &q));

        let stroked = triangle().with(AttrKey::Stroke, BLUE).with(AttrKey::LineWidth, 2.0);
        // Midpoint of the closing edge from (10, 20) back to (0, 0).
        let q = HitQuery::from_attrs(&stroked, 5.0, 10.0);
        assert!(Polygon.is_in_stroke_or_path(&stroked, &q));
        assert!(!Polyline.is_in_stroke_or_path(&stroked, &q));
    }

    #[test]
    fn polyline_bbox_grows_with_stroked_arrow() {
        let bare = triangle().with(AttrKey::EndArrow, crate::shape::ArrowSpec::Default);
        assert_eq!(Polyline.bbox(&bare), BBox::from_points(points(&bare)));

        let stroked = bare.with(AttrKey::Stroke, BLUE).with(AttrKey::LineWidth, 2.0);
        let bbox = Polyline.bbox(&stroked).unwrap();
        // The head ends at (10, 20) with a mitered tip.
        assert!((bbox.max_y - 21.0).abs() < 1e-9);
        assert_eq!(bbox.min_y, 0.0);
    }

    #[test]
    fn polyline_tangents_follow_end_segments() {
        let attrs = triangle();
        let (start, end) = Polyline.arrow_tangents(&attrs);
        assert_eq!(start, Some(((20.0, 0.0), (0.0, 0.0))));
        assert_eq!(end, Some(((20.0, 0.0), (10.0, 20.0))));
    }

    #[test]
    fn empty_points_have_no_bbox() {
        assert_eq!(Polyline.bbox(&Attrs::new()), None);
    }
}
