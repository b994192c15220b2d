//! Text shapes laid out with Pango.

use crate::draw::FontDescriptor;
use crate::draw::attrs::{AttrKey, Attrs};
use crate::math::BBox;

use super::{BBoxProvider, Drawable, HitQuery, Pickable};

/// Default font size in pixels.
pub const DEFAULT_FONT_SIZE: f64 = 12.0;

/// Text anchored at `x`, `y` according to `textAlign` and `textBaseline`.
///
/// Multi-line text is split on `\n` by Pango.
#[derive(Debug, Clone, Copy, Default)]
pub struct Text;

fn layout_for(ctx: &cairo::Context, attrs: &Attrs) -> Option<pango::Layout> {
    let text = attrs.text(AttrKey::Text)?;
    if text.is_empty() {
        return None;
    }
    let size = attrs.number_or(AttrKey::FontSize, DEFAULT_FONT_SIZE);
    let layout = pangocairo::functions::create_layout(ctx);
    let font_desc_str = FontDescriptor::from_attrs(attrs).to_pango_string(size);
    let font_desc = pango::FontDescription::from_string(&font_desc_str);
    layout.set_font_description(Some(&font_desc));
    layout.set_text(text);
    Some(layout)
}

/// Box of the laid-out text after applying alignment and baseline.
fn placement(layout: &pango::Layout, attrs: &Attrs) -> BBox {
    let (_ink_rect, logical_rect) = layout.extents();
    let width = logical_rect.width() as f64 / pango::SCALE as f64;
    let height = logical_rect.height() as f64 / pango::SCALE as f64;
    let baseline = layout.baseline() as f64 / pango::SCALE as f64;

    let x = attrs.number_or(AttrKey::X, 0.0);
    let y = attrs.number_or(AttrKey::Y, 0.0);
    let left = match attrs.text(AttrKey::TextAlign) {
        Some("center") => x - width / 2.0,
        Some("end") | Some("right") => x - width,
        _ => x,
    };
    let top = match attrs.text(AttrKey::TextBaseline) {
        Some("top") | Some("hanging") => y,
        Some("middle") => y - height / 2.0,
        Some("bottom") => y - height,
        _ => y - baseline,
    };
    BBox::new(left, top, width, height)
}

fn measure_context() -> Option<cairo::Context> {
    let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 1, 1).ok()?;
    cairo::Context::new(&surface).ok()
}

impl BBoxProvider for Text {
    fn bbox(&self, attrs: &Attrs) -> Option<BBox> {
        let ctx = measure_context()?;
        let layout = layout_for(&ctx, attrs)?;
        Some(placement(&layout, attrs))
    }
}

impl Drawable for Text {
    fn create_path(&self, ctx: &cairo::Context, attrs: &Attrs) {
        let Some(layout) = layout_for(ctx, attrs) else {
            return;
        };
        let origin = placement(&layout, attrs);
        ctx.move_to(origin.min_x, origin.min_y);
        pangocairo::functions::layout_path(ctx, &layout);
    }
}

impl Pickable for Text {
    fn is_only_hit_box(&self) -> bool {
        true
    }

    fn is_in_stroke_or_path(&self, attrs: &Attrs, q: &HitQuery) -> bool {
        self.bbox(attrs).is_some_and(|bbox| bbox.contains_point(q.x, q.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(align: &str, baseline: &str) -> Attrs {
        Attrs::new()
            .with(AttrKey::X, 100.0)
            .with(AttrKey::Y, 50.0)
            .with(AttrKey::Text, "Hello")
            .with(AttrKey::FontSize, 16.0)
            .with(AttrKey::TextAlign, align)
            .with(AttrKey::TextBaseline, baseline)
    }

    #[test]
    fn empty_text_has_no_bbox() {
        assert!(Text.bbox(&Attrs::new().with(AttrKey::Text, "")).is_none());
    }

    #[test]
    fn alignment_moves_the_box() {
        let start = Text.bbox(&label("start", "top")).unwrap();
        let end = Text.bbox(&label("end", "top")).unwrap();
        assert_eq!(start.min_x, 100.0);
        assert_eq!(start.min_y, 50.0);
        assert!((end.max_x - 100.0).abs() < 1e-9);
        assert!(start.width() > 0.0);
    }

    #[test]
    fn middle_baseline_centers_vertically() {
        let bbox = Text.bbox(&label("center", "middle")).unwrap();
        assert!(((bbox.min_y + bbox.max_y) / 2.0 - 50.0).abs() < 1e-9);
        assert!(((bbox.min_x + bbox.max_x) / 2.0 - 100.0).abs() < 1e-9);
    }
}
