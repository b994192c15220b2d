use super::Canvas;
use crate::error::SceneError;
use crate::event::{
    self, Emitter, EventController, EventHost, GraphEvent, ListenerHost, ListenerId, PointerInput,
};
use crate::scene::{NodeId, Scene};

impl ListenerHost for Canvas {
    fn emitter(&self) -> &Emitter<Self> {
        &self.emitter
    }

    fn emitter_mut(&mut self) -> &mut Emitter<Self> {
        &mut self.emitter
    }
}

impl EventHost for Canvas {
    fn scene(&self) -> &Scene {
        &self.scene
    }

    fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    fn controller(&self) -> &EventController {
        &self.controller
    }

    fn controller_mut(&mut self) -> &mut EventController {
        &mut self.controller
    }
}

impl Canvas {
    /// Registers a listener on `node`.
    ///
    /// `name` is an event type (`click`), a delegated `"<node name>:<type>"`,
    /// or `*` for every event on the node.
    ///
    /// # Errors
    /// Returns [`SceneError::InvalidListener`] for empty or malformed names.
    pub fn on<F>(&mut self, node: NodeId, name: &str, callback: F) -> Result<ListenerId, SceneError>
    where
        F: FnMut(&mut GraphEvent, &mut Canvas) + 'static,
    {
        self.emitter.on(node, name, callback)
    }

    /// Registers a listener removed after its first call.
    pub fn once<F>(&mut self, node: NodeId, name: &str, callback: F) -> Result<ListenerId, SceneError>
    where
        F: FnMut(&mut GraphEvent, &mut Canvas) + 'static,
    {
        self.emitter.once(node, name, callback)
    }

    /// Removes every listener of `node`, or only those for `name`.
    pub fn off(&mut self, node: NodeId, name: Option<&str>) {
        self.emitter.off(node, name);
    }

    pub fn off_listener(&mut self, node: NodeId, id: ListenerId) {
        self.emitter.off_listener(node, id);
    }

    /// Fires `name` on `node` alone, without bubbling.
    pub fn emit(&mut self, node: NodeId, name: &str, event: &mut GraphEvent) {
        if !self.scene.contains(node) {
            return;
        }
        event.name = name.to_string();
        event.current_target = Some(node);
        if event.target.is_none() {
            event.target = Some(node);
        }
        event::fire(self, node, name, event);
        self.after_mutation();
    }

    /// Feeds pointer input observed over the canvas.
    pub fn handle_pointer(&mut self, input: &PointerInput) {
        if self.destroyed {
            return;
        }
        event::handle_pointer(self, input);
        self.after_mutation();
    }

    /// Feeds pointer input observed anywhere else in the window.
    pub fn handle_document_pointer(&mut self, input: &PointerInput) {
        if self.destroyed {
            return;
        }
        event::handle_document_pointer(self, input);
        self.after_mutation();
    }

    pub fn is_dragging(&self) -> bool {
        self.controller.is_dragging()
    }
}
