//! Tree edits and attribute access routed through the canvas, so destroyed
//! nodes lose their listeners and animations and auto-draw sees each change.

use super::Canvas;
use crate::draw::attrs::{AttrKey, AttrValue, Attrs};
use crate::error::SceneError;
use crate::math::{BBox, Matrix};
use crate::pick;
use crate::scene::{ElementConfig, NodeId};

impl Canvas {
    /// Creates a node from `config` and appends it to `parent`.
    pub fn add_child(&mut self, parent: NodeId, config: ElementConfig) -> Result<NodeId, SceneError> {
        let id = self.scene.add_child(parent, config)?;
        self.after_mutation();
        Ok(id)
    }

    /// Shorthand for adding to the root.
    pub fn add_shape(&mut self, config: ElementConfig) -> Result<NodeId, SceneError> {
        let root = self.root();
        self.add_child(root, config)
    }

    pub fn add_group(&mut self, parent: NodeId) -> Result<NodeId, SceneError> {
        self.add_child(parent, ElementConfig::group())
    }

    /// Moves an existing node under `parent`, detaching it first.
    pub fn add(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.scene.add(parent, child)?;
        self.after_mutation();
        Ok(())
    }

    /// Detaches `child`; with `destroy` it is destroyed along with its subtree.
    pub fn remove(&mut self, child: NodeId, destroy: bool) {
        let destroyed = self.scene.remove(child, destroy);
        self.forget_nodes(&destroyed);
        self.after_mutation();
    }

    /// Destroys `node` and its subtree. Destroying the root clears it instead.
    pub fn destroy_node(&mut self, node: NodeId) {
        let destroyed = self.scene.destroy(node);
        self.forget_nodes(&destroyed);
        self.after_mutation();
    }

    /// Destroys every child of `container`.
    pub fn clear(&mut self, container: NodeId) {
        let destroyed = self.scene.clear(container);
        self.forget_nodes(&destroyed);
        self.after_mutation();
    }

    /// Stable-sorts the children of `container` by z-index.
    pub fn sort(&mut self, container: NodeId) {
        self.scene.sort(container);
        self.after_mutation();
    }

    pub fn set_z_index(&mut self, node: NodeId, z_index: f64) {
        self.scene.set_z_index(node, z_index);
        self.after_mutation();
    }

    pub fn to_front(&mut self, node: NodeId) {
        self.scene.to_front(node);
        self.after_mutation();
    }

    pub fn to_back(&mut self, node: NodeId) {
        self.scene.to_back(node);
        self.after_mutation();
    }

    pub fn show(&mut self, node: NodeId) {
        self.scene.show(node);
        self.after_mutation();
    }

    pub fn hide(&mut self, node: NodeId) {
        self.scene.hide(node);
        self.after_mutation();
    }

    pub fn attr(&self, node: NodeId, key: AttrKey) -> Option<&AttrValue> {
        self.scene.attr(node, key)
    }

    pub fn attrs(&self, node: NodeId) -> Option<&Attrs> {
        self.scene.attrs(node)
    }

    pub fn set_attr(&mut self, node: NodeId, key: AttrKey, value: impl Into<AttrValue>) {
        self.scene.set_attr(node, key, value);
        self.after_mutation();
    }

    pub fn set_attrs(&mut self, node: NodeId, attrs: Attrs) {
        self.scene.set_attrs(node, attrs);
        self.after_mutation();
    }

    pub fn set_matrix(&mut self, node: NodeId, matrix: Option<Matrix>) {
        self.scene.set_matrix(node, matrix);
        self.after_mutation();
    }

    pub fn translate(&mut self, node: NodeId, tx: f64, ty: f64) {
        self.scene.translate(node, tx, ty);
        self.after_mutation();
    }

    pub fn move_to(&mut self, node: NodeId, x: f64, y: f64) {
        self.scene.move_to(node, x, y);
        self.after_mutation();
    }

    pub fn reset_matrix(&mut self, node: NodeId) {
        self.scene.reset_matrix(node);
        self.after_mutation();
    }

    pub fn rotate(&mut self, node: NodeId, radians: f64) {
        self.scene.rotate(node, radians);
        self.after_mutation();
    }

    pub fn rotate_at(&mut self, node: NodeId, x: f64, y: f64, radians: f64) {
        self.scene.rotate_at(node, x, y, radians);
        self.after_mutation();
    }

    pub fn scale(&mut self, node: NodeId, sx: f64, sy: f64) {
        self.scene.scale(node, sx, sy);
        self.after_mutation();
    }

    /// Bounding box of `node` in canvas coordinates.
    pub fn canvas_bbox(&mut self, node: NodeId) -> Option<BBox> {
        self.scene.canvas_bbox(node)
    }

    /// Topmost capturing shape under a canvas point.
    pub fn get_shape(&mut self, x: f64, y: f64) -> Option<NodeId> {
        let root = self.root();
        pick::get_shape(&mut self.scene, root, x, y)
    }

    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.scene.find_by_id(self.root(), id)
    }

    pub fn find_all_by_name(&self, name: &str) -> Vec<NodeId> {
        self.scene.find_all_by_name(self.root(), name)
    }
}
