//! Event dispatch: listeners, synthetic events, and the pointer state machine.
//!
//! - [`Emitter`]: plain, once, delegated (`name:type`) and wildcard (`*`) listeners
//! - [`GraphEvent`]: the object every listener receives
//! - [`EventController`]: derives click, enter/leave, and drag events from
//!   raw [`PointerInput`]

pub mod controller;
pub mod emitter;
pub mod graph_event;
pub mod input;

pub use controller::{EventController, EventHost, emit_event, handle_document_pointer, handle_pointer};
pub use emitter::{DELEGATION_SPLIT, Emitter, Listener, ListenerHost, ListenerId, WILDCARD, fire, validate_event_name};
pub use graph_event::GraphEvent;
pub use input::{MouseButton, PointerInput, PointerKind};
