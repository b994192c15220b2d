//! Cairo draw dispatch for the scene tree.
//!
//! A frame either repaints the whole view or a single merged rectangle. In
//! region mode the tree is still walked from the root, but subtrees whose
//! canvas bbox misses the region are not painted.

use std::rc::Rc;

use log::debug;

use super::color::Paint;
use super::dirty::{Refresh, RefreshEntry, merge_regions};
use crate::draw::attrs::AttrKey;
use crate::error::SceneError;
use crate::math::BBox;
use crate::scene::{NodeId, NodeKind, Scene};

/// How a frame was painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameKind {
    /// The whole view was cleared and redrawn.
    Full,
    /// Only this pixel-aligned rectangle was cleared and redrawn.
    Region(BBox),
    /// Nothing was pending, or the pending region was empty.
    Skipped,
}

/// Outcome of one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub kind: FrameKind,
    /// Leaf shapes painted.
    pub painted: usize,
}

impl FrameReport {
    pub fn skipped() -> Self {
        Self {
            kind: FrameKind::Skipped,
            painted: 0,
        }
    }
}

/// Clears `area` to transparent, then fills it with the background paint.
fn clear_area(ctx: &cairo::Context, area: &BBox, view: &BBox, background: Option<&Paint>) -> Result<(), SceneError> {
    ctx.save()?;
    ctx.rectangle(area.x(), area.y(), area.width(), area.height());
    ctx.clip();
    ctx.set_operator(cairo::Operator::Clear);
    ctx.paint()?;
    ctx.set_operator(cairo::Operator::Over);
    if let Some(paint) = background {
        paint.set_source(ctx, view, 1.0)?;
        ctx.paint()?;
    }
    ctx.restore()?;
    Ok(())
}

/// Drains the scene's pending refresh and paints what it asks for.
///
/// # Arguments
/// * `ctx` - Context already scaled to logical canvas units
/// * `scene` - Scene to paint
/// * `view` - Visible canvas area in logical units
/// * `background` - Paint laid under the tree, or `None` for transparent
/// * `local_refresh` - When false, every pending change repaints the whole view
pub fn render_pending(
    ctx: &cairo::Context,
    scene: &mut Scene,
    view: &BBox,
    background: Option<&Paint>,
    local_refresh: bool,
) -> Result<FrameReport, SceneError> {
    let entries = match scene.take_refresh() {
        Refresh::Idle => return Ok(FrameReport::skipped()),
        Refresh::Full => return render_full(ctx, scene, view, background),
        Refresh::Partial(_) if !local_refresh => return render_full(ctx, scene, view, background),
        Refresh::Partial(entries) => entries,
    };

    let regions: Vec<BBox> = entries
        .iter()
        .filter_map(|entry| scene.entry_region(entry))
        .collect();

    let report = match merge_regions(regions, view) {
        Some(region) => render_region(ctx, scene, region, view, background)?,
        None => {
            debug!("pending changes produced no visible region");
            FrameReport::skipped()
        }
    };

    // Entries clipped away or never painted must be able to queue again.
    for entry in entries {
        if let RefreshEntry::Node(id) = entry {
            scene.clear_changed(id);
        }
    }
    Ok(report)
}

/// Clears the whole view and redraws the tree.
pub fn render_full(
    ctx: &cairo::Context,
    scene: &mut Scene,
    view: &BBox,
    background: Option<&Paint>,
) -> Result<FrameReport, SceneError> {
    clear_area(ctx, view, view, background)?;
    let root = scene.root();
    let painted = draw_node(ctx, scene, root, None, 1.0)?;
    debug!("full repaint: {painted} shape(s)");
    Ok(FrameReport {
        kind: FrameKind::Full,
        painted,
    })
}

/// Clears `region`, clips to it, and redraws the subtrees that intersect it.
pub fn render_region(
    ctx: &cairo::Context,
    scene: &mut Scene,
    region: BBox,
    view: &BBox,
    background: Option<&Paint>,
) -> Result<FrameReport, SceneError> {
    clear_area(ctx, &region, view, background)?;
    ctx.save()?;
    ctx.rectangle(region.x(), region.y(), region.width(), region.height());
    ctx.clip();
    let root = scene.root();
    let result = draw_node(ctx, scene, root, Some(&region), 1.0);
    ctx.restore()?;
    let painted = result?;
    debug!(
        "region repaint {:.0},{:.0} {:.0}x{:.0}: {painted} shape(s)",
        region.x(),
        region.y(),
        region.width(),
        region.height()
    );
    Ok(FrameReport {
        kind: FrameKind::Region(region),
        painted,
    })
}

/// Paints one node and its subtree, returning how many shapes were painted.
///
/// Destroyed ids paint nothing. Hidden subtrees forget their drawn state so
/// their whole footprint is refreshed when they show up again.
fn draw_node(
    ctx: &cairo::Context,
    scene: &mut Scene,
    id: NodeId,
    region: Option<&BBox>,
    inherited_opacity: f64,
) -> Result<usize, SceneError> {
    let Some(node) = scene.node(id) else {
        return Ok(0);
    };
    if !node.visible() {
        scene.reset_draw_state(id);
        return Ok(0);
    }

    let canvas_bbox = scene.canvas_bbox(id);
    if let Some(region) = region {
        match canvas_bbox {
            Some(bbox) if bbox.intersects(region) => {}
            // Pixels outside the region are untouched, so is the drawn bbox.
            _ => return Ok(0),
        }
    }

    let Some(node) = scene.node(id) else {
        return Ok(0);
    };
    let opacity = inherited_opacity * node.attrs().number_or(AttrKey::Opacity, 1.0);
    let matrix = node.matrix().copied();
    let clip = node.clip().cloned();
    let kind = node.kind();
    let registry = Rc::clone(scene.registry());

    ctx.save()?;
    if let Some(matrix) = matrix {
        ctx.transform(matrix.to_cairo());
    }
    if let Some(clip) = &clip {
        let capability = registry.get(clip.kind)?;
        ctx.new_path();
        capability.create_path(ctx, &clip.attrs);
        ctx.clip();
    }

    let result = match kind {
        NodeKind::Shape(shape_type) => match scene.node(id).map(|n| n.attrs().clone()) {
            Some(attrs) => registry
                .get(shape_type)
                .and_then(|capability| capability.draw(ctx, &attrs, opacity).map_err(SceneError::from))
                .map(|()| 1),
            None => Ok(0),
        },
        NodeKind::Group | NodeKind::Canvas => {
            let children = scene.node(id).map(|n| n.children().to_vec()).unwrap_or_default();
            let mut painted = 0;
            let mut outcome = Ok(());
            for child in children {
                match draw_node(ctx, scene, child, region, opacity) {
                    Ok(count) => painted += count,
                    Err(err) => {
                        outcome = Err(err);
                        break;
                    }
                }
            }
            outcome.map(|()| painted)
        }
    };
    ctx.restore()?;
    let painted = result?;
    scene.mark_drawn(id, canvas_bbox);
    Ok(painted)
}
