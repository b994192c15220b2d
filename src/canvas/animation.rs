use super::Canvas;
use crate::animate::{AnimateConfig, AnimationId, AnimationTarget, Timeline};
use crate::scene::NodeId;

impl Canvas {
    /// Animates `node` toward `target`, starting now.
    ///
    /// `config` may be a duration in milliseconds, `(duration, easing)`,
    /// `(duration, easing, delay)`, `(duration, easing, on_finish, delay)`
    /// or a full [`AnimateConfig`]. Without an easing the canvas default is
    /// used. Returns `None` for destroyed nodes.
    pub fn animate(
        &mut self,
        node: NodeId,
        target: impl Into<AnimationTarget>,
        config: impl Into<AnimateConfig>,
    ) -> Option<AnimationId> {
        if self.destroyed {
            return None;
        }
        let mut config = config.into();
        config.easing.get_or_insert(self.default_easing);
        let now = self.clock.now();
        let id = self.timeline.animate(&self.scene, node, target, config, now)?;
        self.draw();
        Some(id)
    }

    pub fn pause_animate(&mut self, node: NodeId) {
        let now = self.clock.now();
        self.timeline.pause(node, now);
    }

    pub fn resume_animate(&mut self, node: NodeId) {
        let now = self.clock.now();
        self.timeline.resume(node, now);
        if self.timeline.is_animating(node) {
            self.draw();
        }
    }

    /// Ends the animations of `node`, snapping to their end values when
    /// `to_end` is set.
    pub fn stop_animate(&mut self, node: NodeId, to_end: bool) {
        self.timeline.stop_animate(&mut self.scene, node, to_end);
        self.after_mutation();
    }

    pub fn stop_all_animations(&mut self, to_end: bool) {
        self.timeline.stop_all(&mut self.scene, to_end);
        self.after_mutation();
    }

    pub fn is_animating(&self, node: NodeId) -> bool {
        self.timeline.is_animating(node)
    }

    pub fn is_animation_paused(&self, node: NodeId) -> bool {
        self.timeline.is_paused(node)
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }
}
