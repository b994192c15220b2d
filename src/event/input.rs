//! Raw pointer input fed to the event controller.
//!
//! Coordinates are resolved by the caller: `x`/`y` are canvas units, the
//! `client_*` pair is whatever the host window reports and is only used to
//! measure drag distance.

/// Mouse button identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    /// Primary button; the only one that clicks and drags.
    Left,
    Right,
    Middle,
}

/// Kind of native pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Up,
    Move,
    /// Pointer entered the canvas surface.
    Enter,
    /// Pointer left the canvas surface.
    Leave,
    DoubleClick,
    ContextMenu,
    Wheel,
}

impl PointerKind {
    /// Event type name dispatched for this input.
    pub fn event_type(&self) -> &'static str {
        match self {
            PointerKind::Down => "mousedown",
            PointerKind::Up => "mouseup",
            PointerKind::Move => "mousemove",
            PointerKind::Enter => "mouseenter",
            PointerKind::Leave => "mouseleave",
            PointerKind::DoubleClick => "dblclick",
            PointerKind::ContextMenu => "contextmenu",
            PointerKind::Wheel => "wheel",
        }
    }
}

/// One native pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub kind: PointerKind,
    pub x: f64,
    pub y: f64,
    pub client_x: f64,
    pub client_y: f64,
    pub button: Option<MouseButton>,
    /// Milliseconds on any monotonic scale.
    pub timestamp: u64,
    /// Wheel delta, zero for other kinds.
    pub delta: f64,
}

impl PointerInput {
    /// Input at canvas `(x, y)`; client coordinates mirror it and presses
    /// default to the left button.
    pub fn new(kind: PointerKind, x: f64, y: f64) -> Self {
        let button = match kind {
            PointerKind::Down | PointerKind::Up | PointerKind::DoubleClick => Some(MouseButton::Left),
            PointerKind::ContextMenu => Some(MouseButton::Right),
            _ => None,
        };
        Self {
            kind,
            x,
            y,
            client_x: x,
            client_y: y,
            button,
            timestamp: 0,
            delta: 0.0,
        }
    }

    pub fn with_client(mut self, client_x: f64, client_y: f64) -> Self {
        self.client_x = client_x;
        self.client_y = client_y;
        self
    }

    pub fn with_button(mut self, button: Option<MouseButton>) -> Self {
        self.button = button;
        self
    }

    pub fn at(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_delta(mut self, delta: f64) -> Self {
        self.delta = delta;
        self
    }

    pub fn is_left(&self) -> bool {
        self.button == Some(MouseButton::Left)
    }
}
