use std::collections::HashMap;

use log::debug;

use super::{AnimateConfig, Animation, AnimationId, AnimationTarget, FinishCallback};
use crate::scene::{NodeId, Scene};

/// Animations queued on one node.
#[derive(Default)]
struct NodeQueue {
    animations: Vec<Animation>,
    /// Timeline time the node was paused at.
    paused_at: Option<f64>,
}

/// Per-canvas animation registry, advanced once per frame.
///
/// Times are milliseconds on the canvas clock. The timeline never reads the
/// clock itself; callers pass `now` to every time-dependent operation.
#[derive(Default)]
pub struct Timeline {
    queues: HashMap<NodeId, NodeQueue>,
    /// Nodes with pending animations, in first-registration order.
    active: Vec<NodeId>,
    next_id: u64,
}

impl std::fmt::Debug for Timeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timeline")
            .field("active", &self.active)
            .field("animations", &self.len())
            .finish()
    }
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an animation on `node` starting at `now`.
    ///
    /// Start values are read from the node's current attributes. Any older
    /// animation on the node whose window overlaps this one loses the keys
    /// this one drives. Destroyed nodes are ignored.
    pub fn animate(
        &mut self,
        scene: &Scene,
        node: NodeId,
        target: impl Into<AnimationTarget>,
        config: impl Into<AnimateConfig>,
        now: f64,
    ) -> Option<AnimationId> {
        let attrs = scene.attrs(node)?;
        let id = AnimationId(self.next_id);
        self.next_id += 1;
        let mut animation = Animation::new(id, attrs, target.into(), config.into(), now);

        let queue = self.queues.entry(node).or_default();
        if queue.animations.is_empty() {
            if !self.active.contains(&node) {
                self.active.push(node);
            }
        } else {
            drop_conflicting_keys(&mut queue.animations, &animation);
        }
        if queue.paused_at.is_some() {
            animation.paused = true;
            animation.pause_time = now;
        }
        debug!(
            "animate {node:?}: {} key(s) over {}ms after {}ms ({})",
            animation.to_attrs.len(),
            animation.duration,
            animation.delay,
            animation.easing
        );
        queue.animations.push(animation);
        Some(id)
    }

    /// Advances every active animation to `now`.
    ///
    /// Finished animations write their exact end values and are dropped, then
    /// their completion callbacks run. Returns whether anything is still
    /// animating.
    pub fn tick(&mut self, scene: &mut Scene, now: f64) -> bool {
        let mut finished: Vec<FinishCallback> = Vec::new();
        let active = std::mem::take(&mut self.active);
        for node in active {
            if !scene.contains(node) {
                debug!("dropping animations of destroyed node {node:?}");
                self.queues.remove(&node);
                continue;
            }
            let Some(queue) = self.queues.get_mut(&node) else {
                continue;
            };

            let mut index = 0;
            while index < queue.animations.len() {
                if queue.animations[index].update(scene, node, now) {
                    let animation = queue.animations.remove(index);
                    debug!("animation {:?} on {node:?} finished", animation.id);
                    finished.extend(animation.on_finish);
                } else {
                    index += 1;
                }
            }

            if queue.animations.is_empty() {
                self.queues.remove(&node);
            } else {
                self.active.push(node);
            }
        }
        for callback in finished {
            callback();
        }
        self.is_active()
    }

    /// Pauses every animation of `node`. No-op when already paused.
    pub fn pause(&mut self, node: NodeId, now: f64) {
        let Some(queue) = self.queues.get_mut(&node) else {
            return;
        };
        if queue.paused_at.is_some() {
            return;
        }
        queue.paused_at = Some(now);
        for animation in &mut queue.animations {
            animation.paused = true;
            animation.pause_time = now;
            if let Some(callback) = animation.on_pause.as_mut() {
                callback();
            }
        }
    }

    /// Resumes `node`, shifting each start time by the time spent paused.
    pub fn resume(&mut self, node: NodeId, now: f64) {
        let Some(queue) = self.queues.get_mut(&node) else {
            return;
        };
        if queue.paused_at.take().is_none() {
            return;
        }
        for animation in &mut queue.animations {
            animation.start_time += now - animation.pause_time;
            animation.paused = false;
            if let Some(callback) = animation.on_resume.as_mut() {
                callback();
            }
        }
    }

    pub fn is_paused(&self, node: NodeId) -> bool {
        self.queues
            .get(&node)
            .is_some_and(|queue| queue.paused_at.is_some())
    }

    /// Ends every animation of `node` now.
    ///
    /// With `to_end` the final values are written; otherwise the node keeps
    /// its last interpolated values. Each completion callback runs once.
    pub fn stop_animate(&mut self, scene: &mut Scene, node: NodeId, to_end: bool) {
        let Some(queue) = self.queues.remove(&node) else {
            return;
        };
        self.active.retain(|id| *id != node);
        let mut finished = Vec::new();
        for mut animation in queue.animations {
            if to_end {
                animation.apply_end(scene, node);
            }
            finished.extend(animation.on_finish);
        }
        for callback in finished {
            callback();
        }
    }

    /// [`Timeline::stop_animate`] on every active node.
    pub fn stop_all(&mut self, scene: &mut Scene, to_end: bool) {
        for node in self.active.clone() {
            self.stop_animate(scene, node, to_end);
        }
    }

    /// Drops the animations of `node` without writing values or running
    /// callbacks. Used when the node is destroyed.
    pub fn remove_node(&mut self, node: NodeId) {
        if self.queues.remove(&node).is_some() {
            self.active.retain(|id| *id != node);
        }
    }

    /// Drops everything.
    pub fn clear(&mut self) {
        self.queues.clear();
        self.active.clear();
    }

    pub fn is_animating(&self, node: NodeId) -> bool {
        self.queues
            .get(&node)
            .is_some_and(|queue| !queue.animations.is_empty())
    }

    /// Whether any node has pending animations.
    pub fn is_active(&self) -> bool {
        !self.active.is_empty()
    }

    /// Nodes with pending animations, in first-registration order.
    pub fn active_nodes(&self) -> &[NodeId] {
        &self.active
    }

    /// Pending animations of `node`, oldest first.
    pub fn animations(&self, node: NodeId) -> &[Animation] {
        self.queues
            .get(&node)
            .map(|queue| queue.animations.as_slice())
            .unwrap_or(&[])
    }

    /// Total pending animations.
    pub fn len(&self) -> usize {
        self.queues.values().map(|q| q.animations.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The newest animation wins contested keys: older ones whose window
/// overlaps its start stop driving them.
fn drop_conflicting_keys(existing: &mut [Animation], incoming: &Animation) {
    let incoming_start = incoming.start_time + incoming.delay;
    for other in existing {
        if incoming_start < other.end_time() && incoming.duration > other.delay {
            for key in incoming.to_attrs.keys() {
                other.to_attrs.remove(key);
                other.from_attrs.remove(key);
            }
        }
    }
}
