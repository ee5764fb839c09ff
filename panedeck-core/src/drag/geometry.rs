//! Drop geometry for tab headers
//!
//! Pure functions that turn pointer coordinates over a tab header into an
//! insertion index and an indicator position, so they can be tested
//! without a rendering layer.

/// Side of a tab header closest to the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Insert before the target tab (indicator on its left edge)
    Left,
    /// Insert after the target tab (indicator on its right edge)
    Right,
}

/// Bounding box of a rendered tab header in client pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabBounds {
    /// Left edge
    pub left: f64,
    /// Top edge
    pub top: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl TabBounds {
    /// Creates a bounding box.
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Returns the right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Returns the horizontal center.
    #[must_use]
    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }
}

/// Returns the edge of `bounds` closest to `client_x`.
///
/// The exact center counts as the right half.
#[must_use]
pub fn closest_edge(bounds: &TabBounds, client_x: f64) -> Edge {
    if client_x < bounds.center_x() {
        Edge::Left
    } else {
        Edge::Right
    }
}

/// Returns the raw insertion index for a drop next to the tab at
/// `target_index`.
#[must_use]
pub const fn insert_index(target_index: usize, edge: Edge) -> usize {
    match edge {
        Edge::Left => target_index,
        Edge::Right => target_index + 1,
    }
}

/// Adjusts a raw insertion index for a reorder within the same screen.
///
/// Removing the source first shifts every later index one to the left.
#[must_use]
pub const fn reorder_index(source_index: usize, insert_index: usize) -> usize {
    if source_index < insert_index {
        insert_index - 1
    } else {
        insert_index
    }
}

/// Returns the x coordinate of the drop indicator line for `edge`.
#[must_use]
pub fn indicator_x(bounds: &TabBounds, edge: Edge) -> f64 {
    match edge {
        Edge::Left => bounds.left,
        Edge::Right => bounds.right(),
    }
}
