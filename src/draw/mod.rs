//! Drawing attributes and Cairo rendering.
//!
//! - [`Color`] and [`Paint`]: solid colors and gradients
//! - [`Attrs`]: the closed attribute map every element carries
//! - [`RefreshTracker`]: pending changes between frames
//! - [`render_pending`]: full or region repaint of a scene

pub mod attrs;
pub mod color;
pub mod dirty;
pub mod font;
pub mod render;

pub use attrs::{AttrKey, AttrValue, Attrs};
pub use color::{Color, ColorStop, Paint};
pub use dirty::{Refresh, RefreshEntry, RefreshTracker};
pub use font::FontDescriptor;
pub use render::{FrameKind, FrameReport, render_full, render_pending, render_region};

// Re-export color constants for public API
#[allow(unused_imports)]
pub use color::{BLACK, BLUE, GREEN, ORANGE, PINK, RED, TRANSPARENT, WHITE, YELLOW};
