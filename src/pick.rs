//! Hit testing: which shape is under a point.
//!
//! The walk starts at a container and descends one level at a time,
//! mapping the point through each container's own matrix inverse. Children
//! are visited topmost first, so the first hit is the front-most shape.

use crate::math::matrix::invert_point;
use crate::scene::{Clip, NodeId, NodeKind, Scene};
use crate::shape::{HitQuery, ShapeRegistry};

/// Topmost shape under `(x, y)` inside `container`.
///
/// `(x, y)` is in the coordinate space of the container's parent (canvas
/// space when `container` is the root). Destroyed or non-capturing
/// containers yield `None`.
pub fn get_shape(scene: &mut Scene, container: NodeId, x: f64, y: f64) -> Option<NodeId> {
    let node = scene.node(container)?;
    if !node.allows_capture() || !node.kind().is_container() {
        return None;
    }
    let (lx, ly) = invert_point(node.matrix(), x, y)?;
    if let Some(clip) = node.clip() {
        if !in_clip(scene.registry(), clip, lx, ly) {
            return None;
        }
    }

    let children = node.children().to_vec();
    for child in children.into_iter().rev() {
        let Some(child_node) = scene.node(child) else {
            continue;
        };
        if !child_node.allows_capture() {
            continue;
        }
        let hit = match child_node.kind() {
            NodeKind::Group | NodeKind::Canvas => get_shape(scene, child, lx, ly),
            NodeKind::Shape(_) => is_hit(scene, child, lx, ly).then_some(child),
        };
        if hit.is_some() {
            return hit;
        }
    }
    None
}

/// Whether `(x, y)`, given in the parent's frame, hits the shape `id`.
///
/// Bounding box first, then the shape's own stroke/fill test unless it only
/// hit-tests its box, then any arrowheads.
pub fn is_hit(scene: &mut Scene, id: NodeId, x: f64, y: f64) -> bool {
    let Some(node) = scene.node(id) else {
        return false;
    };
    let Some(kind) = node.kind().shape_type() else {
        return false;
    };
    let Some((lx, ly)) = invert_point(node.matrix(), x, y) else {
        return false;
    };
    let Some(bbox) = scene.bbox(id) else {
        return false;
    };
    if !bbox.contains_point(lx, ly) {
        return false;
    }

    let Some(node) = scene.node(id) else {
        return false;
    };
    let registry = scene.registry();
    if let Some(clip) = node.clip() {
        if !in_clip(registry, clip, lx, ly) {
            return false;
        }
    }
    let Ok(capability) = registry.get(kind) else {
        return false;
    };
    if capability.is_only_hit_box() {
        return true;
    }
    let attrs = node.attrs();
    let query = HitQuery::from_attrs(attrs, lx, ly);
    capability.is_in_stroke_or_path(attrs, &query) || capability.is_in_arrows(attrs, &query)
}

/// Clip shapes are tested as filled areas regardless of their paint.
fn in_clip(registry: &ShapeRegistry, clip: &Clip, x: f64, y: f64) -> bool {
    let Ok(capability) = registry.get(clip.kind) else {
        return false;
    };
    if !capability
        .bbox(&clip.attrs)
        .is_some_and(|bbox| bbox.contains_point(x, y))
    {
        return false;
    }
    let query = HitQuery {
        x,
        y,
        is_stroke: false,
        is_fill: true,
        line_width: 0.0,
    };
    capability.is_only_hit_box() || capability.is_in_stroke_or_path(&clip.attrs, &query)
}
