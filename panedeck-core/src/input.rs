//! Pointer input shared by the drag and resize controllers
//!
//! These types describe the events the rendering layer forwards to the
//! controllers. Coordinates are client-space pixels.

use std::fmt;

/// Identifier of a pointer (mouse, finger, pen) as reported by the host.
///
/// Drag and resize sessions are keyed by it so concurrent pointers do not
/// interfere with each other's session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub i64);

impl fmt::Display for PointerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of device behind a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerKind {
    /// Mouse or trackpad
    #[default]
    Mouse,
    /// Touch screen
    Touch,
    /// Stylus
    Pen,
}

/// Primary (usually left) mouse button index.
pub const PRIMARY_BUTTON: u16 = 0;

/// A pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Originating pointer.
    pub pointer_id: PointerId,
    /// Device kind.
    pub kind: PointerKind,
    /// Pressed button; only meaningful for mouse pointers.
    pub button: u16,
    /// Horizontal client coordinate.
    pub client_x: f64,
    /// Vertical client coordinate.
    pub client_y: f64,
}

impl PointerEvent {
    /// Creates a primary-button mouse event at the given position.
    #[must_use]
    pub const fn mouse(pointer_id: PointerId, client_x: f64, client_y: f64) -> Self {
        Self {
            pointer_id,
            kind: PointerKind::Mouse,
            button: PRIMARY_BUTTON,
            client_x,
            client_y,
        }
    }

    /// Sets the device kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: PointerKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the pressed button.
    #[must_use]
    pub const fn with_button(mut self, button: u16) -> Self {
        self.button = button;
        self
    }

    /// Returns true for the primary button of a mouse, and for any touch or
    /// pen contact.
    #[must_use]
    pub const fn is_primary(&self) -> bool {
        match self.kind {
            PointerKind::Mouse => self.button == PRIMARY_BUTTON,
            PointerKind::Touch | PointerKind::Pen => true,
        }
    }
}

/// Keyboard modifier state sampled with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Modifiers {
    /// Control key
    pub ctrl: bool,
    /// Command (macOS) / Super key
    pub meta: bool,
    /// Shift key
    pub shift: bool,
    /// Alt / Option key
    pub alt: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        ctrl: false,
        meta: false,
        shift: false,
        alt: false,
    };

    /// Only Control held.
    pub const CTRL: Self = Self {
        ctrl: true,
        meta: false,
        shift: false,
        alt: false,
    };

    /// Only Command held.
    pub const META: Self = Self {
        ctrl: false,
        meta: true,
        shift: false,
        alt: false,
    };

    /// Returns true if the modifiers turn a drop or click into a copy
    /// (Ctrl on Linux/Windows, Cmd on macOS).
    #[must_use]
    pub const fn is_clone_gesture(&self) -> bool {
        self.ctrl || self.meta
    }
}
