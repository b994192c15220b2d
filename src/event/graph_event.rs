//! Synthetic events delivered to listeners.

use super::input::{MouseButton, PointerInput};
use crate::scene::NodeId;

/// Event object passed to every listener along one dispatch.
///
/// `target` stays the directly hit node for the whole dispatch while
/// `current_target` and `delegate_target` follow the walk up the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphEvent {
    /// Name the current listener was registered under, e.g. `click` or
    /// `circle:click` during delegation.
    pub name: String,
    /// Underlying event type, e.g. `click`.
    pub event_type: String,
    pub x: f64,
    pub y: f64,
    pub client_x: f64,
    pub client_y: f64,
    pub button: Option<MouseButton>,
    pub timestamp: u64,
    pub delta: f64,
    pub target: Option<NodeId>,
    pub current_target: Option<NodeId>,
    pub delegate_target: Option<NodeId>,
    pub from_shape: Option<NodeId>,
    pub to_shape: Option<NodeId>,
    /// Nodes the event has already passed through, target first.
    pub propagation_path: Vec<NodeId>,
    pub bubbles: bool,
    pub propagation_stopped: bool,
    pub default_prevented: bool,
}

impl GraphEvent {
    /// Event with no pointer data, as used by user-triggered emission.
    pub fn new(event_type: impl Into<String>) -> Self {
        let event_type = event_type.into();
        Self {
            name: event_type.clone(),
            event_type,
            x: 0.0,
            y: 0.0,
            client_x: 0.0,
            client_y: 0.0,
            button: None,
            timestamp: 0,
            delta: 0.0,
            target: None,
            current_target: None,
            delegate_target: None,
            from_shape: None,
            to_shape: None,
            propagation_path: Vec::new(),
            bubbles: true,
            propagation_stopped: false,
            default_prevented: false,
        }
    }

    pub fn from_input(event_type: impl Into<String>, input: &PointerInput) -> Self {
        Self {
            x: input.x,
            y: input.y,
            client_x: input.client_x,
            client_y: input.client_y,
            button: input.button,
            timestamp: input.timestamp,
            delta: input.delta,
            ..Self::new(event_type)
        }
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}
