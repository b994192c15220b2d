//! Circle, ellipse, rectangle, and line.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::draw::attrs::{AttrKey, Attrs};
use crate::geometry::{ellipse, line, rect};
use crate::math::BBox;

use super::arrow::with_arrows;
use super::{ArrowTangents, BBoxProvider, Drawable, HitQuery, Pickable};

/// Circle at `x`, `y` with radius `r`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Circle;

impl BBoxProvider for Circle {
    fn bbox(&self, attrs: &Attrs) -> Option<BBox> {
        let x = attrs.number_or(AttrKey::X, 0.0);
        let y = attrs.number_or(AttrKey::Y, 0.0);
        let r = attrs.number(AttrKey::R)?;
        Some(BBox::from_min_max(x - r, y - r, x + r, y + r))
    }
}

impl Drawable for Circle {
    fn create_path(&self, ctx: &cairo::Context, attrs: &Attrs) {
        let x = attrs.number_or(AttrKey::X, 0.0);
        let y = attrs.number_or(AttrKey::Y, 0.0);
        let r = attrs.number_or(AttrKey::R, 0.0);
        ctx.new_sub_path();
        ctx.arc(x, y, r, 0.0, TAU);
    }
}

impl Pickable for Circle {
    fn is_in_stroke_or_path(&self, attrs: &Attrs, q: &HitQuery) -> bool {
        ellipse::in_circle(
            attrs.number_or(AttrKey::X, 0.0),
            attrs.number_or(AttrKey::Y, 0.0),
            attrs.number_or(AttrKey::R, 0.0),
            q.is_stroke,
            q.is_fill,
            q.line_width,
            q.x,
            q.y,
        )
    }
}

/// Axis-aligned ellipse at `x`, `y` with radii `rx`, `ry`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ellipse;

impl BBoxProvider for Ellipse {
    fn bbox(&self, attrs: &Attrs) -> Option<BBox> {
        let x = attrs.number_or(AttrKey::X, 0.0);
        let y = attrs.number_or(AttrKey::Y, 0.0);
        let rx = attrs.number(AttrKey::Rx)?;
        let ry = attrs.number(AttrKey::Ry)?;
        Some(BBox::from_min_max(x - rx, y - ry, x + rx, y + ry))
    }
}

impl Drawable for Ellipse {
    fn create_path(&self, ctx: &cairo::Context, attrs: &Attrs) {
        let rx = attrs.number_or(AttrKey::Rx, 0.0);
        let ry = attrs.number_or(AttrKey::Ry, 0.0);
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        let _ = ctx.save();
        ctx.translate(attrs.number_or(AttrKey::X, 0.0), attrs.number_or(AttrKey::Y, 0.0));
        ctx.scale(rx, ry);
        ctx.new_sub_path();
        ctx.arc(0.0, 0.0, 1.0, 0.0, TAU);
        let _ = ctx.restore();
    }
}

impl Pickable for Ellipse {
    fn is_in_stroke_or_path(&self, attrs: &Attrs, q: &HitQuery) -> bool {
        ellipse::in_ellipse(
            attrs.number_or(AttrKey::X, 0.0),
            attrs.number_or(AttrKey::Y, 0.0),
            attrs.number_or(AttrKey::Rx, 0.0),
            attrs.number_or(AttrKey::Ry, 0.0),
            q.is_stroke,
            q.is_fill,
            q.line_width,
            q.x,
            q.y,
        )
    }
}

/// Rectangle with an optional corner `radius`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rect;

impl BBoxProvider for Rect {
    fn bbox(&self, attrs: &Attrs) -> Option<BBox> {
        let x = attrs.number_or(AttrKey::X, 0.0);
        let y = attrs.number_or(AttrKey::Y, 0.0);
        let width = attrs.number(AttrKey::Width)?;
        let height = attrs.number(AttrKey::Height)?;
        // Negative sizes extend left/up from the anchor.
        Some(BBox::from_min_max(
            x.min(x + width),
            y.min(y + height),
            x.max(x + width),
            y.max(y + height),
        ))
    }
}

impl Drawable for Rect {
    fn create_path(&self, ctx: &cairo::Context, attrs: &Attrs) {
        let Some(bbox) = self.bbox(attrs) else {
            return;
        };
        let (x, y, w, h) = (bbox.x(), bbox.y(), bbox.width(), bbox.height());
        let r = rect::clamp_radius(w, h, attrs.number_or(AttrKey::Radius, 0.0));
        if r <= 0.0 {
            ctx.rectangle(x, y, w, h);
            return;
        }
        ctx.new_sub_path();
        ctx.arc(x + w - r, y + r, r, -FRAC_PI_2, 0.0);
        ctx.arc(x + w - r, y + h - r, r, 0.0, FRAC_PI_2);
        ctx.arc(x + r, y + h - r, r, FRAC_PI_2, PI);
        ctx.arc(x + r, y + r, r, PI, PI + FRAC_PI_2);
        ctx.close_path();
    }
}

impl Pickable for Rect {
    fn is_in_stroke_or_path(&self, attrs: &Attrs, q: &HitQuery) -> bool {
        let Some(bbox) = self.bbox(attrs) else {
            return false;
        };
        rect::in_rect(
            bbox.x(),
            bbox.y(),
            bbox.width(),
            bbox.height(),
            attrs.number_or(AttrKey::Radius, 0.0),
            q.is_stroke,
            q.is_fill,
            q.line_width,
            q.x,
            q.y,
        )
    }
}

/// Straight segment from `x1`, `y1` to `x2`, `y2`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Line;

fn endpoints(attrs: &Attrs) -> ((f64, f64), (f64, f64)) {
    (
        (attrs.number_or(AttrKey::X1, 0.0), attrs.number_or(AttrKey::Y1, 0.0)),
        (attrs.number_or(AttrKey::X2, 0.0), attrs.number_or(AttrKey::Y2, 0.0)),
    )
}

impl BBoxProvider for Line {
    fn bbox(&self, attrs: &Attrs) -> Option<BBox> {
        let ((x1, y1), (x2, y2)) = endpoints(attrs);
        let body = BBox::from_min_max(x1.min(x2), y1.min(y2), x1.max(x2), y1.max(y2));
        with_arrows(Some(body), attrs, self.arrow_tangents(attrs))
    }
}

impl Drawable for Line {
    fn create_path(&self, ctx: &cairo::Context, attrs: &Attrs) {
        let (start, end) = endpoints(attrs);
        let from = attrs
            .arrow(AttrKey::StartArrow)
            .map_or(start, |arrow| arrow.shorten(end, start));
        let to = attrs
            .arrow(AttrKey::EndArrow)
            .map_or(end, |arrow| arrow.shorten(start, end));
        ctx.move_to(from.0, from.1);
        ctx.line_to(to.0, to.1);
    }

    fn arrow_tangents(&self, attrs: &Attrs) -> ArrowTangents {
        let (start, end) = endpoints(attrs);
        (Some((end, start)), Some((start, end)))
    }
}

impl Pickable for Line {
    fn is_in_stroke_or_path(&self, attrs: &Attrs, q: &HitQuery) -> bool {
        if !q.is_stroke {
            return false;
        }
        let ((x1, y1), (x2, y2)) = endpoints(attrs);
        line::in_stroke(x1, y1, x2, y2, q.line_width, q.x, q.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::RED;
    use crate::shape::ShapeCapability;

    fn query(attrs: &Attrs, x: f64, y: f64) -> HitQuery {
        HitQuery::from_attrs(attrs, x, y)
    }

    #[test]
    fn filled_circle_hits_inside_radius_only() {
        let attrs = Attrs::new()
            .with(AttrKey::X, 50.0)
            .with(AttrKey::Y, 50.0)
            .with(AttrKey::R, 10.0)
            .with(AttrKey::Fill, RED);
        assert!(Circle.is_in_stroke_or_path(&attrs, &query(&attrs, 57.0, 57.0)));
        assert!(Circle.is_in_stroke_or_path(&attrs, &query(&attrs, 60.0, 50.0)));
        assert!(!Circle.is_in_stroke_or_path(&attrs, &query(&attrs, 60.5, 50.0)));
    }

    #[test]
    fn stroked_circle_hits_ring() {
        let attrs = Attrs::new()
            .with(AttrKey::R, 10.0)
            .with(AttrKey::Stroke, RED)
            .with(AttrKey::LineWidth, 4.0);
        assert!(Circle.is_in_stroke_or_path(&attrs, &query(&attrs, 11.9, 0.0)));
        assert!(Circle.is_in_stroke_or_path(&attrs, &query(&attrs, 8.1, 0.0)));
        assert!(!Circle.is_in_stroke_or_path(&attrs, &query(&attrs, 12.5, 0.0)));
        assert!(!Circle.is_in_stroke_or_path(&attrs, &query(&attrs, 0.0, 0.0)));
    }

    #[test]
    fn negative_rect_size_normalizes_bbox() {
        let attrs = Attrs::new()
            .with(AttrKey::X, 10.0)
            .with(AttrKey::Y, 10.0)
            .with(AttrKey::Width, -5.0)
            .with(AttrKey::Height, 5.0);
        assert_eq!(Rect.bbox(&attrs), Some(BBox::new(5.0, 10.0, 5.0, 5.0)));
    }

    #[test]
    fn missing_geometry_has_no_bbox() {
        assert_eq!(Circle.bbox(&Attrs::new()), None);
        assert_eq!(Ellipse.bbox(&Attrs::new().with(AttrKey::Rx, 3.0)), None);
    }

    #[test]
    fn line_ignores_fill_and_tests_arrows() {
        let attrs = Attrs::new()
            .with(AttrKey::X1, 0.0)
            .with(AttrKey::Y1, 0.0)
            .with(AttrKey::X2, 100.0)
            .with(AttrKey::Y2, 0.0)
            .with(AttrKey::Stroke, RED)
            .with(AttrKey::LineWidth, 2.0)
            .with(AttrKey::EndArrow, crate::shape::ArrowSpec::Default);
        assert!(Line.is_in_stroke_or_path(&attrs, &query(&attrs, 50.0, 0.5)));
        assert!(!Line.is_in_stroke_or_path(&attrs, &query(&attrs, 50.0, 3.0)));
        // A wing of the end arrow sits about five pixels off the line.
        assert!(Line.is_in_arrows(&attrs, &query(&attrs, 91.34, 5.0)));
        assert!(!Line.is_in_arrows(&attrs, &query(&attrs, 20.0, 5.0)));
        let bbox = Line.bbox(&attrs).unwrap();
        assert!(bbox.contains_point(91.34, 5.0) && bbox.contains_point(91.34, -5.0));
    }
}
