//! Per-node listener storage.
//!
//! Listeners are keyed by event name. Besides plain names (`click`), a
//! listener may be delegated (`<node name>:<event type>`) or a wildcard
//! (`*`), which receives every event emitted on its node.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use log::warn;

use super::graph_event::GraphEvent;
use crate::error::SceneError;
use crate::scene::NodeId;

/// Separator between a node name and an event type in delegated names.
pub const DELEGATION_SPLIT: char = ':';

/// Listener name that receives every event on its node.
pub const WILDCARD: &str = "*";

/// Handle returned by registration, used to remove one listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Shared listener callback. `H` is the host handed to listeners so they can
/// mutate the scene while an event is being dispatched.
pub type Listener<H> = Rc<RefCell<dyn FnMut(&mut GraphEvent, &mut H)>>;

struct Entry<H> {
    id: ListenerId,
    name: String,
    once: bool,
    callback: Listener<H>,
}

/// Listener registry for every node of one canvas.
pub struct Emitter<H> {
    listeners: HashMap<NodeId, Vec<Entry<H>>>,
    next_id: u64,
}

impl<H> fmt::Debug for Emitter<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count: usize = self.listeners.values().map(Vec::len).sum();
        f.debug_struct("Emitter")
            .field("nodes", &self.listeners.len())
            .field("listeners", &count)
            .finish()
    }
}

impl<H> Default for Emitter<H> {
    fn default() -> Self {
        Self {
            listeners: HashMap::new(),
            next_id: 0,
        }
    }
}

/// Checks a listener name: a plain event type, `name:type`, or `*`.
pub fn validate_event_name(name: &str) -> Result<(), SceneError> {
    if name == WILDCARD {
        return Ok(());
    }
    let invalid = |reason: &str| Err(SceneError::InvalidListener(format!("{name:?}: {reason}")));
    if name.trim().is_empty() {
        return invalid("event name is empty");
    }
    if name.chars().any(char::is_whitespace) {
        return invalid("event name contains whitespace");
    }
    let mut parts = name.split(DELEGATION_SPLIT);
    let first = parts.next().unwrap_or_default();
    match (parts.next(), parts.next()) {
        (None, _) => Ok(()),
        (Some(event_type), None) if !first.is_empty() && !event_type.is_empty() => Ok(()),
        _ => invalid("delegated names take the form `name:type`"),
    }
}

impl<H> Emitter<H> {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, node: NodeId, name: &str, once: bool, callback: Listener<H>) -> Result<ListenerId, SceneError> {
        validate_event_name(name)?;
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.entry(node).or_default().push(Entry {
            id,
            name: name.to_string(),
            once,
            callback,
        });
        Ok(id)
    }

    /// Registers a listener for `name` on `node`.
    pub fn on<F>(&mut self, node: NodeId, name: &str, callback: F) -> Result<ListenerId, SceneError>
    where
        F: FnMut(&mut GraphEvent, &mut H) + 'static,
    {
        self.insert(node, name, false, Rc::new(RefCell::new(callback)))
    }

    /// Registers a listener removed after its first call.
    pub fn once<F>(&mut self, node: NodeId, name: &str, callback: F) -> Result<ListenerId, SceneError>
    where
        F: FnMut(&mut GraphEvent, &mut H) + 'static,
    {
        self.insert(node, name, true, Rc::new(RefCell::new(callback)))
    }

    /// Removes listeners of `node`: all of them, or only those for `name`.
    pub fn off(&mut self, node: NodeId, name: Option<&str>) {
        match name {
            None => {
                self.listeners.remove(&node);
            }
            Some(name) => {
                if let Some(entries) = self.listeners.get_mut(&node) {
                    entries.retain(|e| e.name != name);
                }
            }
        }
    }

    /// Removes one listener by handle.
    pub fn off_listener(&mut self, node: NodeId, id: ListenerId) {
        if let Some(entries) = self.listeners.get_mut(&node) {
            entries.retain(|e| e.id != id);
        }
    }

    /// True when `node` has listeners for exactly `name`.
    pub fn has(&self, node: NodeId, name: &str) -> bool {
        self.listeners
            .get(&node)
            .is_some_and(|entries| entries.iter().any(|e| e.name == name))
    }

    /// Number of listeners on `node`.
    pub fn count(&self, node: NodeId) -> usize {
        self.listeners.get(&node).map_or(0, Vec::len)
    }

    /// Listeners `emit(name)` on `node` would call, plain first, then wildcards.
    fn matching(&self, node: NodeId, name: &str) -> Vec<(ListenerId, bool, Listener<H>)> {
        let Some(entries) = self.listeners.get(&node) else {
            return Vec::new();
        };
        let plain = entries.iter().filter(|e| e.name == name);
        let wildcard = entries.iter().filter(|e| e.name == WILDCARD && name != WILDCARD);
        plain
            .chain(wildcard)
            .map(|e| (e.id, e.once, Rc::clone(&e.callback)))
            .collect()
    }

    /// Keeps only the listeners of nodes for which `keep` returns true.
    pub fn retain_nodes<F: FnMut(NodeId) -> bool>(&mut self, mut keep: F) {
        self.listeners.retain(|node, _| keep(*node));
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

/// Anything that owns an [`Emitter`] handing itself to listeners.
pub trait ListenerHost: Sized {
    fn emitter(&self) -> &Emitter<Self>;
    fn emitter_mut(&mut self) -> &mut Emitter<Self>;
}

/// Calls the listeners for `name` on `node` with `event`.
///
/// Listeners are collected before any runs, so listeners added during the
/// call only see later events. Once-listeners are removed before they run.
pub fn fire<H: ListenerHost>(host: &mut H, node: NodeId, name: &str, event: &mut GraphEvent) {
    let listeners = host.emitter().matching(node, name);
    for (id, once, callback) in listeners {
        if once {
            host.emitter_mut().off_listener(node, id);
        }
        match callback.try_borrow_mut() {
            Ok(mut callback) => (&mut *callback)(event, host),
            Err(_) => warn!("listener for {name:?} re-entered itself; skipped"),
        }
    }
}
