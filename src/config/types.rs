//! Configuration type definitions.

use super::enums::ColorSpec;
use crate::animate::Easing;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Canvas surface and repaint settings.
///
/// Controls the size of the offscreen surface and how mutations turn into
/// repaints.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CanvasConfig {
    /// Logical width in pixels (valid range: 1 - 16384)
    #[serde(default = "default_width")]
    pub width: u32,

    /// Logical height in pixels (valid range: 1 - 16384)
    #[serde(default = "default_height")]
    pub height: u32,

    /// Device pixels per logical pixel (valid range: 0.5 - 4.0)
    #[serde(default = "default_pixel_ratio")]
    pub pixel_ratio: f64,

    /// Schedule a frame automatically after every mutation
    /// Set to false to repaint only when `draw()` is called
    #[serde(default = "default_true")]
    pub auto_draw: bool,

    /// Repaint only the merged changed region instead of the whole surface
    #[serde(default = "default_true")]
    pub local_refresh: bool,

    /// Let the canvas itself be dragged when no shape is under the pointer
    #[serde(default)]
    pub draggable: bool,

    /// Paint laid under the scene; transparent when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<ColorSpec>,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            pixel_ratio: default_pixel_ratio(),
            auto_draw: default_true(),
            local_refresh: default_true(),
            draggable: false,
            background: None,
        }
    }
}

/// Pointer gesture thresholds.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EventsConfig {
    /// Squared pointer travel (px²) below which a press-move-release still
    /// counts as a click (valid range: 0 - 10000)
    #[serde(default = "default_click_tolerance")]
    pub click_tolerance: f64,

    /// Milliseconds a press must be held before a short move starts a drag
    /// (valid range: 0 - 5000)
    #[serde(default = "default_drag_delay_ms")]
    pub drag_delay_ms: u64,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            click_tolerance: default_click_tolerance(),
            drag_delay_ms: default_drag_delay_ms(),
        }
    }
}

/// Animation defaults.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnimationConfig {
    /// Easing used when an animation names none (e.g. "linear", "cubic-out")
    #[serde(default)]
    pub default_easing: Easing,

    /// Minimum spacing between frames in milliseconds (valid range: 1 - 1000)
    #[serde(default = "default_frame_interval")]
    pub frame_interval_ms: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            default_easing: Easing::default(),
            frame_interval_ms: default_frame_interval(),
        }
    }
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    600
}

fn default_pixel_ratio() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

fn default_click_tolerance() -> f64 {
    crate::event::controller::CLICK_TOLERANCE
}

fn default_drag_delay_ms() -> u64 {
    crate::event::controller::DRAG_DELAY_MS
}

fn default_frame_interval() -> f64 {
    16.0
}
