//! The canvas: root of one scene and owner of everything that drives it.
//!
//! A [`Canvas`] owns the offscreen Cairo surface, the node arena, the
//! listener registry, the pointer controller, the animation timeline, and the
//! frame scheduler. It is single-threaded; listeners receive `&mut Canvas`
//! and may edit the scene while an event is being dispatched.

mod animation;
mod draw;
mod events;
mod tree;

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use log::debug;

use crate::animate::{Easing, Timeline};
use crate::config::Config;
use crate::draw::{Color, FrameReport, Paint};
use crate::error::SceneError;
use crate::event::{Emitter, EventController};
use crate::frame::{Clock, FrameHandle, FrameScheduler, IntervalScheduler, SystemClock};
use crate::math::BBox;
use crate::scene::{NodeId, Scene};
use crate::shape::ShapeRegistry;

/// Called after every painted or skipped frame.
pub type FrameCallback = Box<dyn FnMut(&FrameReport)>;

/// Per-node free-form metadata.
pub type Meta = serde_json::Map<String, serde_json::Value>;

/// Builder for [`Canvas`].
pub struct CanvasBuilder {
    width: u32,
    height: u32,
    pixel_ratio: f64,
    auto_draw: bool,
    local_refresh: bool,
    draggable: bool,
    background: Option<Paint>,
    click_tolerance: f64,
    drag_delay_ms: u64,
    default_easing: Easing,
    frame_interval_ms: f64,
    registry: Option<ShapeRegistry>,
    scheduler: Option<Box<dyn FrameScheduler>>,
    clock: Option<Box<dyn Clock>>,
}

impl CanvasBuilder {
    pub fn new(width: u32, height: u32) -> Self {
        Self::from_config(&Config::default()).size(width, height)
    }

    /// Starts from the values of a loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        let canvas = &config.canvas;
        Self {
            width: canvas.width,
            height: canvas.height,
            pixel_ratio: canvas.pixel_ratio,
            auto_draw: canvas.auto_draw,
            local_refresh: canvas.local_refresh,
            draggable: canvas.draggable,
            background: canvas
                .background
                .as_ref()
                .map(|spec| Paint::Solid(spec.to_color())),
            click_tolerance: config.events.click_tolerance,
            drag_delay_ms: config.events.drag_delay_ms,
            default_easing: config.animation.default_easing,
            frame_interval_ms: config.animation.frame_interval_ms,
            registry: None,
            scheduler: None,
            clock: None,
        }
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn pixel_ratio(mut self, pixel_ratio: f64) -> Self {
        self.pixel_ratio = pixel_ratio;
        self
    }

    pub fn auto_draw(mut self, auto_draw: bool) -> Self {
        self.auto_draw = auto_draw;
        self
    }

    pub fn local_refresh(mut self, local_refresh: bool) -> Self {
        self.local_refresh = local_refresh;
        self
    }

    pub fn draggable(mut self, draggable: bool) -> Self {
        self.draggable = draggable;
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(Paint::Solid(color));
        self
    }

    pub fn default_easing(mut self, easing: Easing) -> Self {
        self.default_easing = easing;
        self
    }

    /// Shape capabilities; the built-in set when not given.
    pub fn registry(mut self, registry: ShapeRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn scheduler(mut self, scheduler: impl FrameScheduler + 'static) -> Self {
        self.scheduler = Some(Box::new(scheduler));
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Creates the surface and an empty scene.
    ///
    /// # Errors
    /// Returns [`SceneError::Surface`] if Cairo cannot allocate the surface.
    pub fn build(self) -> Result<Canvas, SceneError> {
        let registry = Rc::new(self.registry.unwrap_or_else(ShapeRegistry::with_builtin));
        let mut scene = Scene::new(registry);
        let root = scene.root();
        scene.set_draggable(root, self.draggable);

        let width = self.width.max(1);
        let height = self.height.max(1);
        let pixel_ratio = if self.pixel_ratio > 0.0 { self.pixel_ratio } else { 1.0 };
        let (surface, context) = create_surface(width, height, pixel_ratio)?;
        debug!(
            "canvas {}x{} @{}x, local refresh {}, auto draw {}",
            width, height, pixel_ratio, self.local_refresh, self.auto_draw
        );

        let mut canvas = Canvas {
            scene,
            surface,
            context,
            width,
            height,
            pixel_ratio,
            background: self.background,
            auto_draw: self.auto_draw,
            local_refresh: self.local_refresh,
            default_easing: self.default_easing,
            timeline: Timeline::new(),
            controller: EventController::new(self.click_tolerance, self.drag_delay_ms),
            emitter: Emitter::new(),
            scheduler: self
                .scheduler
                .unwrap_or_else(|| Box::new(IntervalScheduler::new(self.frame_interval_ms))),
            clock: self.clock.unwrap_or_else(|| Box::new(SystemClock::new())),
            pending_frame: None,
            frame_callback: None,
            meta: HashMap::new(),
            destroyed: false,
        };
        canvas.scene.mark_full();
        canvas.after_mutation();
        Ok(canvas)
    }
}

/// Surface sized in device pixels, with a context scaled to logical units.
fn create_surface(
    width: u32,
    height: u32,
    pixel_ratio: f64,
) -> Result<(cairo::ImageSurface, cairo::Context), SceneError> {
    let device = |side: u32| ((side as f64 * pixel_ratio).ceil() as i32).max(1);
    let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, device(width), device(height))?;
    let context = cairo::Context::new(&surface)?;
    context.scale(pixel_ratio, pixel_ratio);
    Ok((surface, context))
}

/// Root of a scene, its surface, and its event and animation machinery.
pub struct Canvas {
    scene: Scene,
    surface: cairo::ImageSurface,
    context: cairo::Context,
    width: u32,
    height: u32,
    pixel_ratio: f64,
    background: Option<Paint>,
    auto_draw: bool,
    local_refresh: bool,
    default_easing: Easing,
    timeline: Timeline,
    controller: EventController,
    emitter: Emitter<Canvas>,
    scheduler: Box<dyn FrameScheduler>,
    clock: Box<dyn Clock>,
    /// The single in-flight frame request.
    pending_frame: Option<FrameHandle>,
    frame_callback: Option<FrameCallback>,
    meta: HashMap<NodeId, Meta>,
    destroyed: bool,
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pixel_ratio", &self.pixel_ratio)
            .field("nodes", &self.scene.len())
            .field("timeline", &self.timeline)
            .field("emitter", &self.emitter)
            .field("pending_frame", &self.pending_frame)
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}

impl Canvas {
    pub fn builder(width: u32, height: u32) -> CanvasBuilder {
        CanvasBuilder::new(width, height)
    }

    /// Canvas with default settings.
    pub fn new(width: u32, height: u32) -> Result<Self, SceneError> {
        CanvasBuilder::new(width, height).build()
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.scene.root()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Direct scene access.
    ///
    /// Edits made here are picked up by the next frame; with auto-draw on,
    /// that frame is requested at the next canvas call that checks for
    /// changes, or by calling [`Canvas::draw`].
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn registry(&self) -> &Rc<ShapeRegistry> {
        self.scene.registry()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn auto_draw(&self) -> bool {
        self.auto_draw
    }

    pub fn set_auto_draw(&mut self, auto_draw: bool) {
        self.auto_draw = auto_draw;
        self.after_mutation();
    }

    pub fn local_refresh(&self) -> bool {
        self.local_refresh
    }

    pub fn set_local_refresh(&mut self, local_refresh: bool) {
        self.local_refresh = local_refresh;
    }

    pub fn set_background(&mut self, background: Option<Paint>) {
        self.background = background;
        self.scene.mark_full();
        self.after_mutation();
    }

    /// Visible area in logical units.
    pub fn view(&self) -> BBox {
        BBox::new(0.0, 0.0, self.width as f64, self.height as f64)
    }

    /// Current time on the canvas clock, in milliseconds.
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Metadata attached to `node`, if any.
    pub fn meta(&self, node: NodeId) -> Option<&Meta> {
        self.meta.get(&node)
    }

    /// Stores one metadata value on a live node.
    pub fn set_meta(&mut self, node: NodeId, key: impl Into<String>, value: serde_json::Value) {
        if !self.scene.contains(node) {
            return;
        }
        self.meta.entry(node).or_default().insert(key.into(), value);
    }

    pub fn remove_meta(&mut self, node: NodeId, key: &str) -> Option<serde_json::Value> {
        self.meta.get_mut(&node)?.remove(key)
    }

    /// Requests a frame when auto-draw is on and something is pending.
    fn after_mutation(&mut self) {
        if self.auto_draw && self.scene.needs_refresh() {
            self.draw();
        }
    }

    /// Drops listeners, animations, and metadata of destroyed nodes.
    fn forget_nodes(&mut self, nodes: &[NodeId]) {
        for node in nodes {
            self.emitter.off(*node, None);
            self.timeline.remove_node(*node);
            self.meta.remove(node);
        }
    }

    /// Sweeps state keyed by nodes destroyed through [`Canvas::scene_mut`].
    fn prune_dead_nodes(&mut self) {
        let scene = &self.scene;
        self.emitter.retain_nodes(|node| scene.contains(node));
        self.meta.retain(|node, _| scene.contains(*node));
    }
}

#[cfg(test)]
mod tests;
