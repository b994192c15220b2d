//! Pointer input to synthetic events.
//!
//! The controller keeps the little state needed to derive events the native
//! input does not carry: enter/leave pairs, clicks, and drags. Everything
//! else about the scene is read through [`EventHost`] at dispatch time, so
//! listeners are free to mutate the tree while an event is in flight.

use log::debug;

use super::emitter::{ListenerHost, WILDCARD, fire};
use super::graph_event::GraphEvent;
use super::input::{PointerInput, PointerKind};
use crate::pick;
use crate::scene::{NodeId, Scene};

/// Default squared client distance a press may travel and still click.
pub const CLICK_TOLERANCE: f64 = 40.0;

/// Default press duration after which moving starts a drag.
pub const DRAG_DELAY_MS: u64 = 120;

/// What the controller needs from the canvas that owns it.
pub trait EventHost: ListenerHost {
    fn scene(&self) -> &Scene;
    fn scene_mut(&mut self) -> &mut Scene;
    fn controller(&self) -> &EventController;
    fn controller_mut(&mut self) -> &mut EventController;

    /// Whether pressing on empty canvas and moving drags the canvas itself.
    fn canvas_draggable(&self) -> bool {
        let scene = self.scene();
        scene.node(scene.root()).is_some_and(|root| root.draggable())
    }
}

/// Press, hover, and drag state between pointer events.
#[derive(Debug, Clone, PartialEq)]
pub struct EventController {
    click_tolerance: f64,
    drag_delay_ms: u64,
    current_shape: Option<NodeId>,
    mousedown_shape: Option<NodeId>,
    /// Client position of the last left press, while it may still click.
    mousedown_point: Option<(f64, f64)>,
    mousedown_timestamp: u64,
    dragging_shape: Option<NodeId>,
    dragging: bool,
}

impl Default for EventController {
    fn default() -> Self {
        Self::new(CLICK_TOLERANCE, DRAG_DELAY_MS)
    }
}

impl EventController {
    pub fn new(click_tolerance: f64, drag_delay_ms: u64) -> Self {
        Self {
            click_tolerance,
            drag_delay_ms,
            current_shape: None,
            mousedown_shape: None,
            mousedown_point: None,
            mousedown_timestamp: 0,
            dragging_shape: None,
            dragging: false,
        }
    }

    /// Shape the pointer was last over.
    pub fn current_shape(&self) -> Option<NodeId> {
        self.current_shape
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Shape being dragged; `None` while dragging the canvas.
    pub fn dragging_shape(&self) -> Option<NodeId> {
        self.dragging_shape
    }

    /// Forgets all pointer state.
    pub fn reset(&mut self) {
        *self = Self::new(self.click_tolerance, self.drag_delay_ms);
    }

    fn clear_press(&mut self) {
        self.mousedown_shape = None;
        self.mousedown_point = None;
    }
}

/// Handles one pointer event that happened over the canvas.
pub fn handle_pointer<H: EventHost>(host: &mut H, input: &PointerInput) {
    let root = host.scene().root();
    let shape = pick::get_shape(host.scene_mut(), root, input.x, input.y);
    let previous = live(host, host.controller().current_shape);

    let current = match input.kind {
        PointerKind::Down => on_mouse_down(host, input, shape),
        PointerKind::Up => on_mouse_up(host, input, shape),
        PointerKind::Move => on_mouse_move(host, input, previous, shape),
        PointerKind::Enter => {
            emit_event(host, "mouseenter", input, None, None, shape);
            if shape.is_some() {
                emit_event(host, "mouseover", input, shape, None, shape);
                emit_event(host, "mouseenter", input, shape, None, shape);
            }
            if host.controller().dragging_shape.is_some() {
                emit_event(host, "dragenter", input, None, None, None);
            }
            shape
        }
        PointerKind::Leave => {
            if previous.is_some() {
                emit_event(host, "mouseout", input, previous, previous, None);
                emit_event(host, "mouseleave", input, previous, previous, None);
            }
            emit_event(host, "mouseleave", input, None, previous, None);
            if host.controller().dragging_shape.is_some() {
                emit_event(host, "dragleave", input, None, None, None);
            }
            None
        }
        PointerKind::DoubleClick | PointerKind::ContextMenu | PointerKind::Wheel => {
            emit_event(host, input.kind.event_type(), input, shape, None, None);
            shape
        }
    };
    host.controller_mut().current_shape = current;
}

/// Handles pointer movement and release observed outside the canvas.
///
/// Only an ongoing drag cares: it keeps receiving `drag`, and a release
/// ends it with `drop` on the canvas and `dragend`.
pub fn handle_document_pointer<H: EventHost>(host: &mut H, input: &PointerInput) {
    if !host.controller().dragging {
        return;
    }
    let dragging_shape = host.controller().dragging_shape;
    match input.kind {
        PointerKind::Move => emit_event(host, "drag", input, dragging_shape, None, None),
        PointerKind::Up => {
            if dragging_shape.is_some() {
                emit_event(host, "drop", input, None, None, None);
            }
            emit_event(host, "dragend", input, dragging_shape, None, None);
            let current = after_drag(host, input, dragging_shape);
            host.controller_mut().current_shape = current;
        }
        _ => {}
    }
}

fn live<H: EventHost>(host: &H, id: Option<NodeId>) -> Option<NodeId> {
    id.filter(|id| host.scene().contains(*id))
}

fn on_mouse_down<H: EventHost>(host: &mut H, input: &PointerInput, shape: Option<NodeId>) -> Option<NodeId> {
    if input.is_left() {
        let controller = host.controller_mut();
        controller.mousedown_shape = shape;
        controller.mousedown_point = Some((input.client_x, input.client_y));
        controller.mousedown_timestamp = input.timestamp;
    }
    emit_event(host, "mousedown", input, shape, None, None);
    shape
}

fn on_mouse_up<H: EventHost>(host: &mut H, input: &PointerInput, shape: Option<NodeId>) -> Option<NodeId> {
    if !input.is_left() {
        emit_event(host, "mouseup", input, shape, None, None);
        return shape;
    }
    let controller = host.controller().clone();
    if controller.dragging {
        let dragging_shape = controller.dragging_shape;
        if dragging_shape.is_some() {
            emit_event(host, "drop", input, shape, None, None);
        }
        emit_event(host, "dragend", input, dragging_shape, None, None);
        return after_drag(host, input, dragging_shape);
    }

    emit_event(host, "mouseup", input, shape, None, None);
    if controller.mousedown_point.is_some() && shape == controller.mousedown_shape {
        emit_event(host, "click", input, shape, None, None);
    }
    host.controller_mut().clear_press();
    shape
}

fn on_mouse_move<H: EventHost>(
    host: &mut H,
    input: &PointerInput,
    previous: Option<NodeId>,
    shape: Option<NodeId>,
) -> Option<NodeId> {
    let controller = host.controller().clone();
    if controller.dragging {
        let dragging_shape = controller.dragging_shape;
        if dragging_shape.is_some() {
            emit_dragover_events(host, input, previous, shape);
        }
        emit_event(host, "drag", input, dragging_shape, None, None);
        return shape;
    }

    if let Some((down_x, down_y)) = controller.mousedown_point {
        let elapsed = input.timestamp.saturating_sub(controller.mousedown_timestamp);
        let dx = down_x - input.client_x;
        let dy = down_y - input.client_y;
        if elapsed > controller.drag_delay_ms || dx * dx + dy * dy > controller.click_tolerance {
            let pressed = live(host, controller.mousedown_shape);
            if let Some(pressed) = pressed
                && host.scene().node(pressed).is_some_and(|n| n.draggable())
            {
                debug!("drag start on {pressed:?}");
                host.scene_mut().set_capture(pressed, false);
                let controller = host.controller_mut();
                controller.dragging_shape = Some(pressed);
                controller.dragging = true;
                controller.clear_press();
                emit_event(host, "dragstart", input, Some(pressed), None, None);
                return shape;
            }
            if controller.mousedown_shape.is_none() && host.canvas_draggable() {
                debug!("drag start on canvas");
                let controller = host.controller_mut();
                controller.dragging = true;
                controller.clear_press();
                emit_event(host, "dragstart", input, None, None, None);
                return shape;
            }
        }
    }

    emit_mouseover_events(host, input, previous, shape);
    emit_event(host, "mousemove", input, shape, None, None);
    shape
}

/// Ends a drag, restoring capture, and returns the shape now under the pointer.
fn after_drag<H: EventHost>(host: &mut H, input: &PointerInput, dragging_shape: Option<NodeId>) -> Option<NodeId> {
    if let Some(dragged) = dragging_shape {
        host.scene_mut().set_capture(dragged, true);
    }
    let controller = host.controller_mut();
    controller.dragging_shape = None;
    controller.dragging = false;
    controller.clear_press();
    debug!("drag end");

    let root = host.scene().root();
    let shape = pick::get_shape(host.scene_mut(), root, input.x, input.y);
    if shape != dragging_shape {
        let dragged = live(host, dragging_shape);
        emit_mouseover_events(host, input, dragged, shape);
    }
    shape
}

fn emit_mouseover_events<H: EventHost>(
    host: &mut H,
    input: &PointerInput,
    from: Option<NodeId>,
    to: Option<NodeId>,
) {
    if from == to {
        return;
    }
    if from.is_some() {
        emit_event(host, "mouseout", input, from, from, to);
        emit_event(host, "mouseleave", input, from, from, to);
    }
    if to.is_some() {
        emit_event(host, "mouseover", input, to, from, to);
        emit_event(host, "mouseenter", input, to, from, to);
    }
}

fn emit_dragover_events<H: EventHost>(
    host: &mut H,
    input: &PointerInput,
    from: Option<NodeId>,
    to: Option<NodeId>,
) {
    if to.is_some() {
        if to != from {
            if from.is_some() {
                emit_event(host, "dragleave", input, from, from, to);
            }
            emit_event(host, "dragenter", input, to, from, to);
        }
        emit_event(host, "dragover", input, to, None, None);
    } else if from.is_some() {
        emit_event(host, "dragleave", input, from, from, to);
    }
}

/// Node a leave/enter pair is related to: where the pointer came from or went.
fn related_shape(event_type: &str, event: &GraphEvent) -> Option<NodeId> {
    match event_type {
        "mouseenter" => event.from_shape,
        "mouseleave" => event.to_shape,
        _ => None,
    }
}

/// Dispatches one synthetic event.
///
/// Fires on `target` (the canvas when `None`), then walks the ancestors:
/// delegated listeners first, then the ancestor's own listeners. The walk
/// stops on `stop_propagation`, or once an enter/leave reaches an ancestor
/// that also contains the related shape.
pub fn emit_event<H: EventHost>(
    host: &mut H,
    event_type: &str,
    input: &PointerInput,
    target: Option<NodeId>,
    from_shape: Option<NodeId>,
    to_shape: Option<NodeId>,
) {
    let mut event = GraphEvent::from_input(event_type, input);
    event.from_shape = from_shape;
    event.to_shape = to_shape;

    let Some(shape) = target else {
        let root = host.scene().root();
        emit_target(host, root, event_type, &mut event);
        return;
    };
    if !host.scene().contains(shape) {
        return;
    }

    emit_target(host, shape, event_type, &mut event);
    event.propagation_path.push(shape);
    let mut parent = host.scene().node(shape).and_then(|n| n.parent());
    while let Some(container) = parent {
        emit_delegation(host, container, event_type, &mut event);
        if event.propagation_stopped {
            break;
        }
        bubble_event(host, container, event_type, &mut event);
        if event.propagation_stopped || !event.bubbles {
            break;
        }
        event.propagation_path.push(container);
        parent = host.scene().node(container).and_then(|n| n.parent());
    }
}

fn emit_target<H: EventHost>(host: &mut H, target: NodeId, event_type: &str, event: &mut GraphEvent) {
    event.name = event_type.to_string();
    event.target = Some(target);
    event.current_target = Some(target);
    event.delegate_target = Some(target);
    fire(host, target, event_type, event);
}

/// Fires `<name>:<type>` listeners registered on `container` for every named
/// node the event has passed through.
fn emit_delegation<H: EventHost>(host: &mut H, container: NodeId, event_type: &str, event: &mut GraphEvent) {
    let related = related_shape(event_type, event);
    let path = event.propagation_path.clone();
    for element in path {
        let Some(node) = host.scene().node(element) else {
            continue;
        };
        if node.kind().is_container()
            && let Some(related) = related
            && host.scene().contains_node(element, related)
        {
            break;
        }
        let names = node.names().to_vec();
        for name in names {
            let delegated = format!("{name}:{event_type}");
            let emitter = host.emitter();
            if !emitter.has(container, &delegated) && !emitter.has(container, WILDCARD) {
                continue;
            }
            event.name = delegated.clone();
            event.current_target = Some(element);
            event.delegate_target = Some(container);
            fire(host, container, &delegated, event);
        }
    }
}

fn bubble_event<H: EventHost>(host: &mut H, container: NodeId, event_type: &str, event: &mut GraphEvent) {
    if !event.bubbles {
        return;
    }
    let is_over_event = matches!(event_type, "mouseenter" | "mouseleave");
    if is_over_event && container == host.scene().root() {
        return;
    }
    if let Some(related) = related_shape(event_type, event)
        && host.scene().contains_node(container, related)
    {
        event.bubbles = false;
        return;
    }
    event.name = event_type.to_string();
    event.current_target = Some(container);
    event.delegate_target = Some(container);
    fire(host, container, event_type, event);
}
