//! The scene graph: an arena of nodes with parent links, matrix
//! propagation, and bounding-box caches.
//!
//! Children are owned by position in their parent's child list; parent links
//! are plain [`NodeId`]s used only for traversal. Destroying a node removes it
//! from the arena, so every later lookup through its id is a no-op.

mod node;

use std::rc::Rc;

use log::{debug, warn};
use slotmap::SlotMap;

use crate::draw::attrs::{AttrKey, AttrValue, Attrs};
use crate::draw::dirty::{Refresh, RefreshEntry, RefreshTracker};
use crate::error::SceneError;
use crate::math::{BBox, Matrix, compose};
use crate::shape::ShapeRegistry;

pub use node::{Clip, ElementConfig, Node, NodeId, NodeKind};
use node::MatrixCache;

/// Arena owning every node of one canvas.
#[derive(Debug)]
pub struct Scene {
    nodes: SlotMap<NodeId, Node>,
    root: NodeId,
    registry: Rc<ShapeRegistry>,
    refresh: RefreshTracker,
}

impl Scene {
    /// Creates a scene holding only the canvas root.
    pub fn new(registry: Rc<ShapeRegistry>) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::from_config(ElementConfig::canvas()));
        Self {
            nodes,
            root,
            registry,
            refresh: RefreshTracker::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn registry(&self) -> &Rc<ShapeRegistry> {
        &self.registry
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Number of live nodes, the root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub(crate) fn refresh(&self) -> &RefreshTracker {
        &self.refresh
    }

    /// Whether the next frame has anything to repaint.
    pub fn needs_refresh(&self) -> bool {
        !self.refresh.is_empty()
    }

    // ------------------------------------------------------------------
    // Tree edits
    // ------------------------------------------------------------------

    /// Creates a detached node. Shapes must have a registered capability.
    pub fn create(&mut self, config: ElementConfig) -> Result<NodeId, SceneError> {
        match config.kind {
            NodeKind::Canvas => return Err(SceneError::CanvasRoot),
            NodeKind::Shape(kind) => {
                self.registry.get(kind)?;
            }
            NodeKind::Group => {}
        }
        Ok(self.nodes.insert(Node::from_config(config)))
    }

    /// Creates a node and attaches it as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, config: ElementConfig) -> Result<NodeId, SceneError> {
        self.check_container(parent)?;
        let id = self.create(config)?;
        if let Err(err) = self.add(parent, id) {
            self.nodes.remove(id);
            return Err(err);
        }
        Ok(id)
    }

    fn check_container(&self, parent: NodeId) -> Result<(), SceneError> {
        let node = self.nodes.get(parent).ok_or(SceneError::DestroyedParent)?;
        if !node.kind.is_container() {
            return Err(SceneError::NotAContainer);
        }
        Ok(())
    }

    /// Appends `child` to `parent`, detaching it from any previous parent.
    ///
    /// Adding a destroyed child is a no-op.
    pub fn add(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.check_container(parent)?;
        if !self.contains(child) {
            return Ok(());
        }
        if child == self.root {
            return Err(SceneError::CanvasRoot);
        }
        if child == parent || self.is_ancestor(child, parent) {
            return Err(SceneError::Cycle);
        }
        self.detach(child);
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.push(child);
        }
        if let Some(child_node) = self.nodes.get_mut(child) {
            child_node.parent = Some(parent);
        }
        let parent_total = self.total_matrix(parent);
        self.apply_matrix(child, parent_total);
        self.mark_changed(child);
        Ok(())
    }

    /// Removes `child` from its parent's child list, queueing its last drawn
    /// footprint for repaint. Returns false when it had no parent.
    fn detach(&mut self, child: NodeId) -> bool {
        let Some(parent) = self.nodes.get(child).and_then(|n| n.parent) else {
            return false;
        };
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.retain(|c| *c != child);
        }
        let drawn = self.nodes.get(child).and_then(|n| n.drawn_bbox);
        if self.is_attached(parent) {
            self.refresh.mark_removed(drawn);
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = None;
        }
        self.reset_draw_state(child);
        true
    }

    /// Detaches `child`, destroying it when `destroy` is set.
    ///
    /// Returns the ids of destroyed nodes. Removing a node that is not a
    /// child of anything is a no-op.
    pub fn remove(&mut self, child: NodeId, destroy: bool) -> Vec<NodeId> {
        if destroy {
            return self.destroy(child);
        }
        self.detach(child);
        Vec::new()
    }

    /// Destroys `id` and its whole subtree, returning every destroyed id.
    ///
    /// Destroying twice is a no-op. Destroying the root clears its children
    /// but keeps the root itself.
    pub fn destroy(&mut self, id: NodeId) -> Vec<NodeId> {
        if !self.contains(id) {
            return Vec::new();
        }
        if id == self.root {
            return self.clear(id);
        }
        self.detach(id);
        let mut destroyed = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(next) {
                stack.extend(node.children);
                destroyed.push(next);
            }
        }
        debug!("destroyed {} node(s)", destroyed.len());
        destroyed
    }

    /// Destroys every child of `container`.
    pub fn clear(&mut self, container: NodeId) -> Vec<NodeId> {
        let children = match self.nodes.get(container) {
            Some(node) => node.children.clone(),
            None => return Vec::new(),
        };
        children.into_iter().flat_map(|child| self.destroy(child)).collect()
    }

    /// Stable-sorts children by z-index.
    pub fn sort(&mut self, container: NodeId) {
        let Some(children) = self.nodes.get(container).map(|n| n.children.clone()) else {
            return;
        };
        let mut keyed: Vec<(f64, NodeId)> = children
            .iter()
            .map(|c| (self.nodes.get(*c).map_or(0.0, |n| n.z_index), *c))
            .collect();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
        if let Some(node) = self.nodes.get_mut(container) {
            node.children = keyed.into_iter().map(|(_, c)| c).collect();
        }
        if container == self.root {
            self.refresh.mark_full();
        } else {
            self.mark_changed(container);
        }
    }

    /// Sets the z-index and re-sorts the parent.
    pub fn set_z_index(&mut self, id: NodeId, z_index: f64) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        node.z_index = z_index;
        if let Some(parent) = node.parent {
            self.sort(parent);
        }
    }

    /// Moves a node to the end of its parent's children (painted last).
    pub fn to_front(&mut self, id: NodeId) {
        self.reorder(id, true);
    }

    /// Moves a node to the start of its parent's children (painted first).
    pub fn to_back(&mut self, id: NodeId) {
        self.reorder(id, false);
    }

    fn reorder(&mut self, id: NodeId, front: bool) {
        let Some(parent) = self.nodes.get(id).and_then(|n| n.parent) else {
            return;
        };
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.retain(|c| *c != id);
            if front {
                parent_node.children.push(id);
            } else {
                parent_node.children.insert(0, id);
            }
        }
        self.mark_changed(id);
    }

    // ------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------

    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        if node.visible == visible {
            return;
        }
        node.visible = visible;
        self.mark_changed(id);
    }

    pub fn show(&mut self, id: NodeId) {
        self.set_visible(id, true);
    }

    pub fn hide(&mut self, id: NodeId) {
        self.set_visible(id, false);
    }

    pub fn set_capture(&mut self, id: NodeId, capture: bool) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.capture = capture;
        }
    }

    pub fn set_draggable(&mut self, id: NodeId, draggable: bool) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.draggable = draggable;
        }
    }

    pub fn set_names(&mut self, id: NodeId, names: Vec<String>) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.names = names;
        }
    }

    pub fn set_clip(&mut self, id: NodeId, clip: Option<Clip>) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        node.clip = clip;
        node.canvas_bbox = None;
        self.mark_changed(id);
    }

    pub fn attrs(&self, id: NodeId) -> Option<&Attrs> {
        self.nodes.get(id).map(|n| &n.attrs)
    }

    pub fn attr(&self, id: NodeId, key: AttrKey) -> Option<&AttrValue> {
        self.nodes.get(id)?.attrs.get(key)
    }

    /// Sets one attribute and invalidates what depends on it.
    pub fn set_attr(&mut self, id: NodeId, key: AttrKey, value: impl Into<AttrValue>) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        node.attrs.set(key, value);
        self.on_attr_change(id, key);
    }

    /// Sets several attributes at once.
    pub fn set_attrs(&mut self, id: NodeId, attrs: Attrs) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let keys: Vec<AttrKey> = attrs.keys().collect();
        node.attrs.merge(attrs);
        for key in keys {
            self.on_attr_change(id, key);
        }
    }

    fn on_attr_change(&mut self, id: NodeId, key: AttrKey) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        if key == AttrKey::Matrix {
            node.total_matrix = MatrixCache::Stale;
            node.canvas_bbox = None;
            if node.kind.is_container() {
                let children = node.children.clone();
                let total = self.total_matrix(id);
                for child in children {
                    self.apply_matrix(child, total);
                }
            }
        } else if !node.kind.is_container() {
            node.bbox = None;
            node.canvas_bbox = None;
        }
        if id == self.root {
            self.refresh.mark_full();
        } else {
            self.mark_changed(id);
        }
    }

    // ------------------------------------------------------------------
    // Matrices
    // ------------------------------------------------------------------

    /// Total matrix: parent total composed with the node's own matrix.
    pub fn total_matrix(&mut self, id: NodeId) -> Option<Matrix> {
        let node = self.nodes.get_mut(id)?;
        match node.total_matrix {
            MatrixCache::Ready(total) => total,
            MatrixCache::Stale => {
                let total = compose(node.parent_matrix.as_ref(), node.attrs.matrix());
                node.total_matrix = MatrixCache::Ready(total);
                total
            }
        }
    }

    /// Applies a new parent total matrix; containers fan out to children
    /// only when their own total actually changed.
    pub fn apply_matrix(&mut self, id: NodeId, parent_total: Option<Matrix>) {
        let previous = self.total_matrix(id);
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        node.parent_matrix = parent_total;
        let total = compose(parent_total.as_ref(), node.attrs.matrix());
        node.total_matrix = MatrixCache::Ready(total);
        if total == previous {
            return;
        }
        node.canvas_bbox = None;
        if node.kind.is_container() {
            let children = node.children.clone();
            for child in children {
                self.apply_matrix(child, total);
            }
        }
    }

    fn local_matrix(&self, id: NodeId) -> Matrix {
        self.nodes
            .get(id)
            .and_then(|n| n.attrs.matrix().copied())
            .unwrap_or(Matrix::IDENTITY)
    }

    pub fn set_matrix(&mut self, id: NodeId, matrix: Option<Matrix>) {
        self.set_attr(id, AttrKey::Matrix, matrix);
    }

    /// Clears the node's own transform.
    pub fn reset_matrix(&mut self, id: NodeId) {
        self.set_matrix(id, None);
    }

    /// Translates in the parent frame.
    pub fn translate(&mut self, id: NodeId, tx: f64, ty: f64) {
        let matrix = self.local_matrix(id).then_translate(tx, ty);
        self.set_matrix(id, Some(matrix));
    }

    /// Moves the node so its `x`/`y` anchor lands on `(x, y)` in the parent frame.
    pub fn move_to(&mut self, id: NodeId, x: f64, y: f64) {
        let Some(attrs) = self.attrs(id) else {
            return;
        };
        let anchor = (attrs.number_or(AttrKey::X, 0.0), attrs.number_or(AttrKey::Y, 0.0));
        let (cx, cy) = self.local_matrix(id).apply(anchor.0, anchor.1);
        self.translate(id, x - cx, y - cy);
    }

    /// Rotates about the parent origin.
    pub fn rotate(&mut self, id: NodeId, radians: f64) {
        let matrix = self.local_matrix(id).then_rotate(radians);
        self.set_matrix(id, Some(matrix));
    }

    /// Rotates about `(x, y)` in the parent frame.
    pub fn rotate_at(&mut self, id: NodeId, x: f64, y: f64, radians: f64) {
        let matrix = self
            .local_matrix(id)
            .then_translate(-x, -y)
            .then_rotate(radians)
            .then_translate(x, y);
        self.set_matrix(id, Some(matrix));
    }

    /// Scales about the parent origin.
    pub fn scale(&mut self, id: NodeId, sx: f64, sy: f64) {
        let matrix = self.local_matrix(id).then_scale(sx, sy);
        self.set_matrix(id, Some(matrix));
    }

    // ------------------------------------------------------------------
    // Bounding boxes
    // ------------------------------------------------------------------

    /// Bounding box in the node's local frame.
    ///
    /// Shapes include half the hit line width and are cached; containers
    /// merge their visible children on demand.
    pub fn bbox(&mut self, id: NodeId) -> Option<BBox> {
        let node = self.nodes.get(id)?;
        match node.kind {
            NodeKind::Shape(kind) => {
                if node.bbox.is_some() {
                    return node.bbox;
                }
                let capability = match self.registry.get(kind) {
                    Ok(capability) => capability,
                    Err(err) => {
                        warn!("{err}");
                        return None;
                    }
                };
                let half = node.attrs.hit_line_width() / 2.0;
                let bbox = capability.bbox(&node.attrs).map(|b| b.inflate(half));
                if bbox.is_none() {
                    warn!("{kind} shape has no bounding box; check its geometry attributes");
                }
                if let Some(node) = self.nodes.get_mut(id) {
                    node.bbox = bbox;
                }
                bbox
            }
            NodeKind::Group | NodeKind::Canvas => {
                let children = self.visible_children(id);
                let mut boxes = Vec::with_capacity(children.len());
                for child in children {
                    let local = self.local_matrix(child);
                    if let Some(bbox) = self.bbox(child) {
                        boxes.push(bbox.transform(&local));
                    }
                }
                BBox::merge(boxes)
            }
        }
    }

    fn visible_children(&self, id: NodeId) -> Vec<NodeId> {
        let Some(node) = self.nodes.get(id) else {
            return Vec::new();
        };
        node.children
            .iter()
            .copied()
            .filter(|c| self.nodes.get(*c).is_some_and(|n| n.visible))
            .collect()
    }

    /// Bounding box in canvas space, intersected with the node's clip.
    pub fn canvas_bbox(&mut self, id: NodeId) -> Option<BBox> {
        let node = self.nodes.get(id)?;
        let is_shape = !node.kind.is_container();
        if is_shape && node.canvas_bbox.is_some() {
            return node.canvas_bbox;
        }
        let clip = node.clip.clone();
        let children = self.visible_children(id);
        let total = self.total_matrix(id);

        let raw = if is_shape {
            self.bbox(id).map(|b| match &total {
                Some(m) => b.transform(m),
                None => b,
            })
        } else {
            let mut boxes = Vec::with_capacity(children.len());
            for child in children {
                if let Some(bbox) = self.canvas_bbox(child) {
                    boxes.push(bbox);
                }
            }
            BBox::merge(boxes)
        };

        let clipped = match clip {
            Some(clip) => {
                let clip_box = self
                    .registry
                    .get(clip.kind)
                    .ok()
                    .and_then(|cap| cap.bbox(&clip.attrs))
                    .map(|b| match &total {
                        Some(m) => b.transform(m),
                        None => b,
                    });
                match (raw, clip_box) {
                    (Some(raw), Some(clip_box)) => raw.intersection(&clip_box),
                    _ => None,
                }
            }
            None => raw,
        };

        if is_shape {
            if let Some(node) = self.nodes.get_mut(id) {
                node.canvas_bbox = clipped;
            }
        }
        clipped
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Parent chain of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.nodes.get(id).and_then(|n| n.parent);
        while let Some(parent) = current {
            out.push(parent);
            current = self.nodes.get(parent).and_then(|n| n.parent);
        }
        out
    }

    /// True when `ancestor` is a strict ancestor of `node`.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.nodes.get(node).and_then(|n| n.parent);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.nodes.get(parent).and_then(|n| n.parent);
        }
        false
    }

    /// True when `node` is `container` or lies inside it.
    pub fn contains_node(&self, container: NodeId, node: NodeId) -> bool {
        container == node || self.is_ancestor(container, node)
    }

    /// True when the node hangs (indirectly) from the canvas root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        id == self.root || self.is_ancestor(self.root, id)
    }

    /// Depth-first, pre-order descendants of `root`, excluding it.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = match self.nodes.get(root) {
            Some(node) => node.children.iter().rev().copied().collect(),
            None => return out,
        };
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.get(id) {
                out.push(id);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    pub fn find<F>(&self, root: NodeId, predicate: F) -> Option<NodeId>
    where
        F: Fn(&Node) -> bool,
    {
        self.descendants(root)
            .into_iter()
            .find(|id| self.nodes.get(*id).is_some_and(&predicate))
    }

    pub fn find_all<F>(&self, root: NodeId, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&Node) -> bool,
    {
        self.descendants(root)
            .into_iter()
            .filter(|id| self.nodes.get(*id).is_some_and(&predicate))
            .collect()
    }

    pub fn find_by_id(&self, root: NodeId, id: &str) -> Option<NodeId> {
        self.find(root, |node| node.id() == Some(id))
    }

    pub fn find_all_by_name(&self, root: NodeId, name: &str) -> Vec<NodeId> {
        self.find_all(root, |node| node.has_name(name))
    }

    // ------------------------------------------------------------------
    // Refresh bookkeeping
    // ------------------------------------------------------------------

    /// Queues the node for repaint once per frame.
    pub(crate) fn mark_changed(&mut self, id: NodeId) {
        if !self.is_attached(id) {
            return;
        }
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        if node.has_changed {
            return;
        }
        node.has_changed = true;
        self.refresh.mark_node(id);
    }

    /// Forces the next frame to repaint everything.
    pub(crate) fn mark_full(&mut self) {
        self.refresh.mark_full();
    }

    pub(crate) fn take_refresh(&mut self) -> Refresh {
        self.refresh.take()
    }

    pub(crate) fn clear_refresh(&mut self) {
        self.refresh.clear();
    }

    /// Region each pending entry needs repainted.
    pub(crate) fn entry_region(&mut self, entry: &RefreshEntry) -> Option<BBox> {
        match *entry {
            RefreshEntry::Removed(bbox) => bbox,
            RefreshEntry::Node(id) => {
                let previous = self.nodes.get(id)?.drawn_bbox;
                let current = self.canvas_bbox(id);
                crate::draw::dirty::refresh_region(previous, current)
            }
        }
    }

    /// Records what was painted for `id`.
    pub(crate) fn mark_drawn(&mut self, id: NodeId, bbox: Option<BBox>) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.drawn_bbox = bbox;
            node.has_changed = false;
        }
    }

    pub(crate) fn clear_changed(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.has_changed = false;
        }
    }

    /// Forgets drawn state of a subtree that is not painted this frame.
    pub(crate) fn reset_draw_state(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(next) {
                node.drawn_bbox = None;
                node.has_changed = false;
                stack.extend(node.children.iter().copied());
            }
        }
    }
}

#[cfg(test)]
mod tests;
