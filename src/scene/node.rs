//! Node records stored in the scene arena.

use crate::draw::attrs::{AttrKey, AttrValue, Attrs};
use crate::math::{BBox, Matrix};
use crate::shape::ShapeType;

slotmap::new_key_type! {
    /// Stable handle to a node. Handles of destroyed nodes never resolve again.
    pub struct NodeId;
}

/// What a node is: the canvas root, a group, or a leaf shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Canvas,
    Group,
    Shape(ShapeType),
}

impl NodeKind {
    pub fn is_container(&self) -> bool {
        matches!(self, NodeKind::Canvas | NodeKind::Group)
    }

    pub fn shape_type(&self) -> Option<ShapeType> {
        match self {
            NodeKind::Shape(kind) => Some(*kind),
            _ => None,
        }
    }
}

/// Clip region of an element, expressed as a shape in the element's own frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    pub kind: ShapeType,
    pub attrs: Attrs,
}

impl Clip {
    pub fn new(kind: ShapeType, attrs: Attrs) -> Self {
        Self { kind, attrs }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum MatrixCache {
    Stale,
    Ready(Option<Matrix>),
}

/// One element of the tree.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) id: Option<String>,
    pub(crate) names: Vec<String>,
    pub(crate) visible: bool,
    pub(crate) capture: bool,
    pub(crate) z_index: f64,
    pub(crate) draggable: bool,
    pub(crate) clip: Option<Clip>,
    pub(crate) attrs: Attrs,
    /// Total matrix of the parent, as last applied.
    pub(crate) parent_matrix: Option<Matrix>,
    pub(crate) total_matrix: MatrixCache,
    /// Local bbox, shapes only.
    pub(crate) bbox: Option<BBox>,
    /// Canvas-space bbox, shapes only.
    pub(crate) canvas_bbox: Option<BBox>,
    /// Canvas-space bbox at the last draw.
    pub(crate) drawn_bbox: Option<BBox>,
    pub(crate) has_changed: bool,
}

impl Node {
    pub(crate) fn from_config(config: ElementConfig) -> Self {
        Self {
            kind: config.kind,
            parent: None,
            children: Vec::new(),
            id: config.id,
            names: config.names,
            visible: config.visible,
            capture: config.capture,
            z_index: config.z_index,
            draggable: config.draggable,
            clip: config.clip,
            attrs: config.attrs,
            parent_matrix: None,
            total_matrix: MatrixCache::Stale,
            bbox: None,
            canvas_bbox: None,
            drawn_bbox: None,
            has_changed: false,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_canvas(&self) -> bool {
        self.kind == NodeKind::Canvas
    }

    pub fn is_group(&self) -> bool {
        self.kind == NodeKind::Group
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in paint order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn capture(&self) -> bool {
        self.capture
    }

    /// True when the node takes part in picking.
    pub fn allows_capture(&self) -> bool {
        self.visible && self.capture
    }

    pub fn z_index(&self) -> f64 {
        self.z_index
    }

    pub fn draggable(&self) -> bool {
        self.draggable
    }

    pub fn clip(&self) -> Option<&Clip> {
        self.clip.as_ref()
    }

    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    pub fn attr(&self, key: AttrKey) -> Option<&AttrValue> {
        self.attrs.get(key)
    }

    /// The node's own transform.
    pub fn matrix(&self) -> Option<&Matrix> {
        self.attrs.matrix()
    }

    pub fn has_changed(&self) -> bool {
        self.has_changed
    }

    /// Canvas bbox recorded when the node was last drawn.
    pub fn drawn_bbox(&self) -> Option<BBox> {
        self.drawn_bbox
    }
}

/// Initial configuration for a new element.
///
/// # Examples
///
/// ```
/// use trellis::draw::attrs::{AttrKey, Attrs};
/// use trellis::scene::ElementConfig;
/// use trellis::shape::ShapeType;
///
/// let config = ElementConfig::shape(ShapeType::Circle)
///     .id("sun")
///     .name("planet")
///     .attr(AttrKey::R, 10.0);
/// assert_eq!(config.attrs.number(AttrKey::R), Some(10.0));
/// ```
#[derive(Debug, Clone)]
pub struct ElementConfig {
    pub kind: NodeKind,
    pub id: Option<String>,
    pub names: Vec<String>,
    pub visible: bool,
    pub capture: bool,
    pub z_index: f64,
    pub draggable: bool,
    pub clip: Option<Clip>,
    pub attrs: Attrs,
}

impl ElementConfig {
    fn with_kind(kind: NodeKind) -> Self {
        Self {
            kind,
            id: None,
            names: Vec::new(),
            visible: true,
            capture: true,
            z_index: 0.0,
            draggable: false,
            clip: None,
            attrs: Attrs::new(),
        }
    }

    pub fn group() -> Self {
        Self::with_kind(NodeKind::Group)
    }

    pub fn shape(kind: ShapeType) -> Self {
        Self::with_kind(NodeKind::Shape(kind))
    }

    pub(crate) fn canvas() -> Self {
        Self::with_kind(NodeKind::Canvas)
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Adds one name; a node may carry several.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.names.push(name.into());
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn capture(mut self, capture: bool) -> Self {
        self.capture = capture;
        self
    }

    pub fn z_index(mut self, z_index: f64) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn draggable(mut self, draggable: bool) -> Self {
        self.draggable = draggable;
        self
    }

    pub fn clip(mut self, clip: Clip) -> Self {
        self.clip = Some(clip);
        self
    }

    pub fn attrs(mut self, attrs: Attrs) -> Self {
        self.attrs.merge(attrs);
        self
    }

    pub fn attr(mut self, key: AttrKey, value: impl Into<AttrValue>) -> Self {
        self.attrs.set(key, value);
        self
    }
}
