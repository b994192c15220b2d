//! Retained-mode 2D scene graph on Cairo.
//!
//! A [`Canvas`] owns a tree of groups and shapes, repaints only the regions
//! that changed, routes pointer input to the topmost shape under the cursor,
//! and drives attribute animations from a frame scheduler.

pub mod animate;
pub mod canvas;
pub mod config;
pub mod draw;
pub mod error;
pub mod event;
pub mod frame;
pub mod geometry;
pub mod math;
pub mod path;
pub mod pick;
pub mod scene;
pub mod shape;

pub use animate::{AnimateConfig, AnimationTarget, Easing};
pub use canvas::{Canvas, CanvasBuilder};
pub use config::Config;
pub use draw::{AttrKey, AttrValue, Attrs, Color, FrameKind, FrameReport, Paint};
pub use error::{PathError, SceneError};
pub use event::{GraphEvent, PointerInput, PointerKind};
pub use frame::{Clock, FrameScheduler, ManualClock, ManualScheduler};
pub use math::{BBox, Matrix};
pub use scene::{ElementConfig, NodeId};
pub use shape::{ShapeRegistry, ShapeType};
