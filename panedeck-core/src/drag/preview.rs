//! Drag preview resources
//!
//! The native drag image is replaced by a transparent 1x1 image so the
//! rendering layer can draw its own preview that follows the cursor. The
//! image is created lazily, once per controller, and can be reset between
//! tests.

use super::geometry::TabBounds;

/// A transparent placeholder image handed to the native drag machinery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragImage {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl DragImage {
    /// The 1x1 empty image.
    pub const EMPTY: Self = Self {
        width: 1,
        height: 1,
    };
}

/// Lazily created drag image owned by one controller.
#[derive(Debug, Default)]
pub struct DragImageSlot {
    image: Option<DragImage>,
    created: usize,
}

impl DragImageSlot {
    /// Returns the image, creating it on first use.
    pub fn get(&mut self) -> DragImage {
        *self.image.get_or_insert_with(|| {
            self.created += 1;
            DragImage::EMPTY
        })
    }

    /// Returns true if the image has been created.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.image.is_some()
    }

    /// Returns how many times the image was created since construction.
    #[must_use]
    pub const fn creation_count(&self) -> usize {
        self.created
    }

    /// Drops the image so the next [`get`](Self::get) creates it again.
    pub fn reset(&mut self) {
        self.image = None;
    }
}

/// Describes the custom preview drawn under the cursor while dragging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragPreview {
    /// Horizontal distance from the preview's left edge to the cursor.
    pub offset_x: f64,
    /// Vertical distance from the preview's top edge to the cursor.
    pub offset_y: f64,
    /// Preview width, copied from the source tab header.
    pub width: f64,
    /// Preview height, copied from the source tab header.
    pub height: f64,
}

impl DragPreview {
    /// Builds a preview anchored where the pointer grabbed the source tab.
    #[must_use]
    pub fn from_grab(source: &TabBounds, client_x: f64, client_y: f64) -> Self {
        Self {
            offset_x: client_x - source.left,
            offset_y: client_y - source.top,
            width: source.width,
            height: source.height,
        }
    }

    /// Returns the preview's top-left corner for a cursor position.
    #[must_use]
    pub fn position(&self, client_x: f64, client_y: f64) -> (f64, f64) {
        (client_x - self.offset_x, client_y - self.offset_y)
    }
}
