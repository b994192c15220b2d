//! Shape capabilities and the registry mapping shape types to them.
//!
//! A capability knows how to measure, draw, and hit-test one kind of leaf
//! shape from its attributes. Built-in kinds:
//! - [`Circle`], [`Ellipse`], [`Rect`] (optionally rounded)
//! - [`Line`], [`Polyline`], [`Polygon`], [`PathShape`] (arrows on the open ones)
//! - [`Marker`] and [`Text`], which hit-test on their bounding box only

pub mod arrow;
mod basic;
mod marker;
mod path;
mod poly;
mod text;

use std::collections::HashMap;
use std::fmt;

use crate::draw::attrs::{AttrKey, Attrs};
use crate::error::SceneError;
use crate::math::BBox;

pub use arrow::ArrowSpec;
pub use basic::{Circle, Ellipse, Line, Rect};
pub use marker::Marker;
pub use path::{PathShape, trace_path};
pub use poly::{Polygon, Polyline};
pub use text::Text;

/// Kind of a leaf shape, used to look up its capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeType {
    Circle,
    Ellipse,
    Rect,
    Line,
    Polyline,
    Polygon,
    Path,
    Marker,
    Text,
    /// User-registered kind.
    Custom(&'static str),
}

impl ShapeType {
    pub fn name(&self) -> &'static str {
        match self {
            ShapeType::Circle => "circle",
            ShapeType::Ellipse => "ellipse",
            ShapeType::Rect => "rect",
            ShapeType::Line => "line",
            ShapeType::Polyline => "polyline",
            ShapeType::Polygon => "polygon",
            ShapeType::Path => "path",
            ShapeType::Marker => "marker",
            ShapeType::Text => "text",
            ShapeType::Custom(name) => name,
        }
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A point query in the shape's local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitQuery {
    pub x: f64,
    pub y: f64,
    pub is_stroke: bool,
    pub is_fill: bool,
    /// Stroke width including the extra hit slop.
    pub line_width: f64,
}

impl HitQuery {
    pub fn from_attrs(attrs: &Attrs, x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            is_stroke: attrs.has_stroke(),
            is_fill: attrs.has_fill(),
            line_width: attrs.hit_line_width(),
        }
    }
}

/// Geometry bounds of a shape in its local frame, without stroke width.
pub trait BBoxProvider {
    fn bbox(&self, attrs: &Attrs) -> Option<BBox>;
}

/// Emits the shape outline and paints it.
pub trait Drawable: BBoxProvider {
    /// Adds the shape outline to the current Cairo path.
    fn create_path(&self, ctx: &cairo::Context, attrs: &Attrs);

    /// Start and end arrow placements as `(from, tip)` pairs, for open shapes.
    fn arrow_tangents(&self, _attrs: &Attrs) -> ArrowTangents {
        (None, None)
    }

    /// Paints the shape with the given inherited opacity.
    fn draw(&self, ctx: &cairo::Context, attrs: &Attrs, opacity: f64) -> Result<(), cairo::Error> {
        ctx.new_path();
        self.create_path(ctx, attrs);
        let bbox = self
            .bbox(attrs)
            .unwrap_or_else(|| BBox::from_min_max(0.0, 0.0, 0.0, 0.0));
        fill_and_stroke(ctx, attrs, &bbox, opacity)?;
        if attrs.has_stroke() {
            let (start, end) = self.arrow_tangents(attrs);
            arrow::draw_arrows(ctx, attrs, start, end)?;
        }
        ctx.new_path();
        Ok(())
    }
}

pub type ArrowTangents = (Option<((f64, f64), (f64, f64))>, Option<((f64, f64), (f64, f64))>);

/// Point-in-shape tests.
pub trait Pickable {
    /// Shapes that only ever test their bounding box (text, markers).
    fn is_only_hit_box(&self) -> bool {
        false
    }

    fn is_in_stroke_or_path(&self, attrs: &Attrs, query: &HitQuery) -> bool;
}

/// Everything the scene needs from a shape kind.
pub trait ShapeCapability: Drawable + Pickable {
    /// Hit test on attached arrowheads.
    fn is_in_arrows(&self, attrs: &Attrs, query: &HitQuery) -> bool {
        if !query.is_stroke {
            return false;
        }
        let (start, end) = self.arrow_tangents(attrs);
        arrow::arrows_hit(attrs, start, end, query.line_width, query.x, query.y)
    }
}

impl<T: Drawable + Pickable> ShapeCapability for T {}

/// Applies line attributes to the context.
pub fn apply_line_style(ctx: &cairo::Context, attrs: &Attrs) {
    ctx.set_line_width(attrs.number_or(AttrKey::LineWidth, 1.0));
    ctx.set_line_cap(match attrs.text(AttrKey::LineCap) {
        Some("round") => cairo::LineCap::Round,
        Some("square") => cairo::LineCap::Square,
        _ => cairo::LineCap::Butt,
    });
    ctx.set_line_join(match attrs.text(AttrKey::LineJoin) {
        Some("round") => cairo::LineJoin::Round,
        Some("bevel") => cairo::LineJoin::Bevel,
        _ => cairo::LineJoin::Miter,
    });
    match attrs.dash() {
        Some(dash) if !dash.is_empty() => ctx.set_dash(dash, 0.0),
        _ => ctx.set_dash(&[], 0.0),
    }
}

/// Fills then strokes the current path, keeping it for arrow drawing.
///
/// Leaves the stroke paint as the source so arrows share it.
pub fn fill_and_stroke(ctx: &cairo::Context, attrs: &Attrs, bbox: &BBox, opacity: f64) -> Result<(), cairo::Error> {
    if let Some(fill) = attrs.paint(AttrKey::Fill) {
        let alpha = opacity * attrs.number_or(AttrKey::FillOpacity, 1.0);
        fill.set_source(ctx, bbox, alpha)?;
        ctx.fill_preserve()?;
    }
    if let Some(stroke) = attrs.paint(AttrKey::Stroke) {
        apply_line_style(ctx, attrs);
        if attrs.number_or(AttrKey::LineWidth, 1.0) > 0.0 {
            let alpha = opacity * attrs.number_or(AttrKey::StrokeOpacity, 1.0);
            stroke.set_source(ctx, bbox, alpha)?;
            ctx.stroke_preserve()?;
        }
    }
    Ok(())
}

/// Explicit capability table, built once and shared by the renderer and picker.
pub struct ShapeRegistry {
    shapes: HashMap<ShapeType, Box<dyn ShapeCapability>>,
}

impl fmt::Debug for ShapeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.shapes.keys().map(ShapeType::name).collect();
        names.sort_unstable();
        f.debug_struct("ShapeRegistry").field("shapes", &names).finish()
    }
}

impl Default for ShapeRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl ShapeRegistry {
    /// An empty registry; every shape type must be registered explicitly.
    pub fn empty() -> Self {
        Self {
            shapes: HashMap::new(),
        }
    }

    /// Registry holding all built-in shape kinds.
    pub fn with_builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(ShapeType::Circle, Circle);
        registry.register(ShapeType::Ellipse, Ellipse);
        registry.register(ShapeType::Rect, Rect);
        registry.register(ShapeType::Line, Line);
        registry.register(ShapeType::Polyline, Polyline);
        registry.register(ShapeType::Polygon, Polygon);
        registry.register(ShapeType::Path, PathShape);
        registry.register(ShapeType::Marker, Marker);
        registry.register(ShapeType::Text, Text);
        registry
    }

    /// Adds or replaces the capability for `kind`.
    pub fn register(&mut self, kind: ShapeType, capability: impl ShapeCapability + 'static) {
        self.shapes.insert(kind, Box::new(capability));
    }

    pub fn contains(&self, kind: ShapeType) -> bool {
        self.shapes.contains_key(&kind)
    }

    /// Looks up a capability, failing for unregistered kinds.
    pub fn get(&self, kind: ShapeType) -> Result<&dyn ShapeCapability, SceneError> {
        self.shapes
            .get(&kind)
            .map(Box::as_ref)
            .ok_or_else(|| SceneError::MissingCapability(kind.name().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::RED;

    struct Dot;

    impl BBoxProvider for Dot {
        fn bbox(&self, attrs: &Attrs) -> Option<BBox> {
            let x = attrs.number(AttrKey::X)?;
            let y = attrs.number(AttrKey::Y)?;
            Some(BBox::new(x, y, 1.0, 1.0))
        }
    }

    impl Drawable for Dot {
        fn create_path(&self, ctx: &cairo::Context, attrs: &Attrs) {
            ctx.rectangle(attrs.number_or(AttrKey::X, 0.0), attrs.number_or(AttrKey::Y, 0.0), 1.0, 1.0);
        }
    }

    impl Pickable for Dot {
        fn is_only_hit_box(&self) -> bool {
            true
        }

        fn is_in_stroke_or_path(&self, _attrs: &Attrs, _query: &HitQuery) -> bool {
            true
        }
    }

    #[test]
    fn builtin_registry_has_every_kind() {
        let registry = ShapeRegistry::with_builtin();
        for kind in [
            ShapeType::Circle,
            ShapeType::Ellipse,
            ShapeType::Rect,
            ShapeType::Line,
            ShapeType::Polyline,
            ShapeType::Polygon,
            ShapeType::Path,
            ShapeType::Marker,
            ShapeType::Text,
        ] {
            assert!(registry.contains(kind), "{kind} missing");
        }
    }

    #[test]
    fn unknown_kind_fails_fast() {
        let registry = ShapeRegistry::with_builtin();
        let err = registry.get(ShapeType::Custom("star")).err();
        assert!(matches!(err, Some(SceneError::MissingCapability(name)) if name == "star"));
    }

    #[test]
    fn custom_kind_can_be_registered() {
        let mut registry = ShapeRegistry::empty();
        registry.register(ShapeType::Custom("dot"), Dot);
        let dot = registry.get(ShapeType::Custom("dot")).unwrap();
        let attrs = Attrs::new().with(AttrKey::X, 2.0).with(AttrKey::Y, 3.0);
        assert_eq!(dot.bbox(&attrs), Some(BBox::new(2.0, 3.0, 1.0, 1.0)));
        assert!(dot.is_only_hit_box());
    }

    #[test]
    fn hit_query_reads_paint_presence() {
        let attrs = Attrs::new().with(AttrKey::Fill, RED).with(AttrKey::LineWidth, 3.0);
        let query = HitQuery::from_attrs(&attrs, 1.0, 2.0);
        assert!(query.is_fill);
        assert!(!query.is_stroke);
        assert_eq!(query.line_width, 0.0);
    }
}
