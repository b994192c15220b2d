//! Point markers drawn from a named symbol.

use std::f64::consts::TAU;

use crate::draw::attrs::{AttrKey, Attrs};
use crate::math::BBox;

use super::{BBoxProvider, Drawable, HitQuery, Pickable};

/// Marker centered at `x`, `y` with half-size `r`.
///
/// `symbol` is one of `circle` (default), `square`, `diamond`, `triangle`,
/// `triangle-down`, `cross`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Marker;

fn symbol_points(symbol: &str, x: f64, y: f64, r: f64) -> Option<Vec<(f64, f64)>> {
    let diff = r * (3.0f64).sqrt() / 2.0;
    let points = match symbol {
        "square" => vec![(x - r, y - r), (x + r, y - r), (x + r, y + r), (x - r, y + r)],
        "diamond" => vec![(x - r, y), (x, y - r), (x + r, y), (x, y + r)],
        "triangle" => vec![(x - r, y + diff), (x, y - diff), (x + r, y + diff)],
        "triangle-down" => vec![(x - r, y - diff), (x + r, y - diff), (x, y + diff)],
        _ => return None,
    };
    Some(points)
}

impl BBoxProvider for Marker {
    fn bbox(&self, attrs: &Attrs) -> Option<BBox> {
        let x = attrs.number_or(AttrKey::X, 0.0);
        let y = attrs.number_or(AttrKey::Y, 0.0);
        let r = attrs.number(AttrKey::R)?;
        Some(BBox::from_min_max(x - r, y - r, x + r, y + r))
    }
}

impl Drawable for Marker {
    fn create_path(&self, ctx: &cairo::Context, attrs: &Attrs) {
        let x = attrs.number_or(AttrKey::X, 0.0);
        let y = attrs.number_or(AttrKey::Y, 0.0);
        let r = attrs.number_or(AttrKey::R, 0.0);
        let symbol = attrs.text(AttrKey::Symbol).unwrap_or("circle");
        if symbol == "cross" {
            ctx.move_to(x - r, y - r);
            ctx.line_to(x + r, y + r);
            ctx.move_to(x + r, y - r);
            ctx.line_to(x - r, y + r);
            return;
        }
        match symbol_points(symbol, x, y, r) {
            Some(points) => {
                for (i, (px, py)) in points.iter().enumerate() {
                    if i == 0 {
                        ctx.move_to(*px, *py);
                    } else {
                        ctx.line_to(*px, *py);
                    }
                }
                ctx.close_path();
            }
            None => {
                ctx.new_sub_path();
                ctx.arc(x, y, r, 0.0, TAU);
            }
        }
    }
}

impl Pickable for Marker {
    fn is_only_hit_box(&self) -> bool {
        true
    }

    fn is_in_stroke_or_path(&self, attrs: &Attrs, q: &HitQuery) -> bool {
        self.bbox(attrs)
            .is_some_and(|bbox| bbox.inflate(q.line_width / 2.0).contains_point(q.x, q.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bbox_is_square_around_center() {
        let attrs = Attrs::new()
            .with(AttrKey::X, 10.0)
            .with(AttrKey::Y, 20.0)
            .with(AttrKey::R, 5.0)
            .with(AttrKey::Symbol, "diamond");
        assert_eq!(Marker.bbox(&attrs), Some(BBox::new(5.0, 15.0, 10.0, 10.0)));
        assert!(Marker.is_only_hit_box());
    }

    #[test]
    fn known_symbols_have_outlines() {
        for symbol in ["square", "diamond", "triangle", "triangle-down"] {
            assert!(symbol_points(symbol, 0.0, 0.0, 1.0).is_some());
        }
        assert!(symbol_points("circle", 0.0, 0.0, 1.0).is_none());
    }
}
