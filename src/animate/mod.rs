//! Attribute animation: easing curves, interpolation, and the per-canvas timeline.

pub mod easing;
pub mod interpolate;
mod timeline;

use std::fmt;

use crate::draw::attrs::{AttrKey, Attrs};
use crate::math::Matrix;
use crate::scene::{NodeId, Scene};

pub use easing::{Easing, UnknownEasing};
pub use interpolate::{interpolate, interpolate_attrs};
pub use timeline::Timeline;

use interpolate::prepare_from_attrs;

/// Duration used when none is given, in milliseconds.
pub const DEFAULT_DURATION_MS: f64 = 500.0;

/// Called once when an animation finishes or is stopped.
pub type FinishCallback = Box<dyn FnOnce()>;
/// Called on every pause or resume.
pub type LifecycleCallback = Box<dyn FnMut()>;
/// Per-frame function mapping eased progress to attributes.
pub type FrameFn = Box<dyn FnMut(f64) -> Attrs>;

/// What an animation drives: end attributes, or a function of progress.
pub enum AnimationTarget {
    Attrs(Attrs),
    Frame(FrameFn),
}

impl AnimationTarget {
    pub fn frame<F>(f: F) -> Self
    where
        F: FnMut(f64) -> Attrs + 'static,
    {
        AnimationTarget::Frame(Box::new(f))
    }
}

impl From<Attrs> for AnimationTarget {
    fn from(attrs: Attrs) -> Self {
        AnimationTarget::Attrs(attrs)
    }
}

impl fmt::Debug for AnimationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnimationTarget::Attrs(attrs) => f.debug_tuple("Attrs").field(attrs).finish(),
            AnimationTarget::Frame(_) => f.write_str("Frame(..)"),
        }
    }
}

/// Timing and lifecycle options of one animation.
///
/// Converts from a bare duration, `(duration, easing)`,
/// `(duration, easing, delay)` and `(duration, easing, on_finish, delay)`.
pub struct AnimateConfig {
    /// Milliseconds.
    pub duration: f64,
    /// Linear unless set, or the canvas default when animated through a canvas.
    pub easing: Option<Easing>,
    /// Milliseconds before the first frame.
    pub delay: f64,
    /// Loop forever until stopped.
    pub repeat: bool,
    pub on_finish: Option<FinishCallback>,
    pub on_pause: Option<LifecycleCallback>,
    pub on_resume: Option<LifecycleCallback>,
}

impl Default for AnimateConfig {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION_MS,
            easing: None,
            delay: 0.0,
            repeat: false,
            on_finish: None,
            on_pause: None,
            on_resume: None,
        }
    }
}

impl AnimateConfig {
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            ..Self::default()
        }
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }

    pub fn delay(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }

    pub fn repeat(mut self, repeat: bool) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn on_finish<F: FnOnce() + 'static>(mut self, callback: F) -> Self {
        self.on_finish = Some(Box::new(callback));
        self
    }

    pub fn on_pause<F: FnMut() + 'static>(mut self, callback: F) -> Self {
        self.on_pause = Some(Box::new(callback));
        self
    }

    pub fn on_resume<F: FnMut() + 'static>(mut self, callback: F) -> Self {
        self.on_resume = Some(Box::new(callback));
        self
    }
}

impl fmt::Debug for AnimateConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimateConfig")
            .field("duration", &self.duration)
            .field("easing", &self.easing)
            .field("delay", &self.delay)
            .field("repeat", &self.repeat)
            .field("on_finish", &self.on_finish.is_some())
            .finish_non_exhaustive()
    }
}

impl From<f64> for AnimateConfig {
    fn from(duration: f64) -> Self {
        AnimateConfig::new(duration)
    }
}

impl From<(f64, Easing)> for AnimateConfig {
    fn from((duration, easing): (f64, Easing)) -> Self {
        AnimateConfig::new(duration).easing(easing)
    }
}

impl From<(f64, Easing, f64)> for AnimateConfig {
    fn from((duration, easing, delay): (f64, Easing, f64)) -> Self {
        AnimateConfig::new(duration).easing(easing).delay(delay)
    }
}

impl<F: FnOnce() + 'static> From<(f64, Easing, F, f64)> for AnimateConfig {
    fn from((duration, easing, on_finish, delay): (f64, Easing, F, f64)) -> Self {
        AnimateConfig::new(duration)
            .easing(easing)
            .delay(delay)
            .on_finish(on_finish)
    }
}

/// Handle of one registered animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationId(pub(crate) u64);

/// One in-flight animation of one node.
pub struct Animation {
    id: AnimationId,
    from_attrs: Attrs,
    to_attrs: Attrs,
    on_frame: Option<FrameFn>,
    duration: f64,
    delay: f64,
    easing: Easing,
    repeat: bool,
    /// Timeline time at registration, shifted forward by every pause.
    start_time: f64,
    paused: bool,
    pause_time: f64,
    on_finish: Option<FinishCallback>,
    on_pause: Option<LifecycleCallback>,
    on_resume: Option<LifecycleCallback>,
}

impl fmt::Debug for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animation")
            .field("id", &self.id)
            .field("from_attrs", &self.from_attrs)
            .field("to_attrs", &self.to_attrs)
            .field("duration", &self.duration)
            .field("delay", &self.delay)
            .field("easing", &self.easing)
            .field("start_time", &self.start_time)
            .field("paused", &self.paused)
            .finish_non_exhaustive()
    }
}

impl Animation {
    /// Builds the record, snapshotting the node's current value of every key
    /// the animation drives.
    fn new(
        id: AnimationId,
        attrs: &Attrs,
        target: AnimationTarget,
        config: AnimateConfig,
        now: f64,
    ) -> Self {
        let (to_attrs, on_frame) = match target {
            AnimationTarget::Attrs(to) => (to, None),
            AnimationTarget::Frame(f) => (Attrs::new(), Some(f)),
        };
        let mut from_attrs = Attrs::new();
        for key in to_attrs.keys() {
            if let Some(value) = attrs.get(key) {
                from_attrs.set(key, value.clone());
            } else if key == AttrKey::Matrix {
                from_attrs.set(key, None::<Matrix>);
            }
        }
        prepare_from_attrs(&mut from_attrs, &to_attrs);

        Self {
            id,
            from_attrs,
            to_attrs,
            on_frame,
            duration: config.duration.max(0.0),
            delay: config.delay.max(0.0),
            easing: config.easing.unwrap_or_default(),
            repeat: config.repeat,
            start_time: now,
            paused: false,
            pause_time: 0.0,
            on_finish: config.on_finish,
            on_pause: config.on_pause,
            on_resume: config.on_resume,
        }
    }

    pub fn id(&self) -> AnimationId {
        self.id
    }

    pub fn from_attrs(&self) -> &Attrs {
        &self.from_attrs
    }

    pub fn to_attrs(&self) -> &Attrs {
        &self.to_attrs
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn delay(&self) -> f64 {
        self.delay
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Timeline time after which this animation no longer writes.
    fn end_time(&self) -> f64 {
        if self.repeat {
            f64::INFINITY
        } else {
            self.start_time + self.delay + self.duration
        }
    }

    /// Advances to `now`. Returns true once the animation has finished.
    fn update(&mut self, scene: &mut Scene, node: NodeId, now: f64) -> bool {
        if self.paused || now < self.start_time + self.delay {
            return false;
        }
        let elapsed = now - self.start_time - self.delay;
        let ratio = if self.repeat && self.duration > 0.0 {
            self.easing.apply((elapsed % self.duration) / self.duration)
        } else {
            let linear = if self.duration > 0.0 {
                elapsed / self.duration
            } else {
                1.0
            };
            if linear >= 1.0 {
                self.apply_end(scene, node);
                return true;
            }
            self.easing.apply(linear)
        };

        let attrs = match &mut self.on_frame {
            Some(on_frame) => on_frame(ratio),
            None => interpolate_attrs(&self.from_attrs, &self.to_attrs, ratio),
        };
        scene.set_attrs(node, attrs);
        false
    }

    /// Writes the exact final values.
    fn apply_end(&mut self, scene: &mut Scene, node: NodeId) {
        let attrs = match &mut self.on_frame {
            Some(on_frame) => on_frame(1.0),
            None => self.to_attrs.clone(),
        };
        scene.set_attrs(node, attrs);
    }
}

#[cfg(test)]
mod tests;
