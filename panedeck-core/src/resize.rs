//! Divider dragging between adjacent screens
//!
//! [`ResizeController`] turns pointer input over the divider to the right
//! of a screen into [`WorkspaceStore::resize_screens`] calls. While any
//! resize is in progress the document-wide cursor and text selection are
//! overridden; [`PresentationLock`] and [`PointerCapture`] undo that when
//! dropped, so every exit path (pointer up, cancel, window blur, or the
//! controller going away) restores the host.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use tracing::debug;

use crate::input::{PointerEvent, PointerId};
use crate::tracing::span_names;
use crate::workspace::{ScreenId, WorkspaceStore};

/// Cursor shown while a divider is dragged.
pub const RESIZE_CURSOR: &str = "col-resize";

/// Text selection mode while a divider is dragged.
pub const RESIZE_USER_SELECT: &str = "none";

/// Document-wide style properties overridden during a resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyStyle {
    /// Mouse cursor
    Cursor,
    /// Text selection
    UserSelect,
}

/// The rendering host the resize controller manipulates.
pub trait PresentationHost {
    /// Sets a document-wide style and returns its previous value.
    fn set_body_style(&self, property: BodyStyle, value: &str) -> String;

    /// Routes all further events of `pointer_id` to the divider.
    fn capture_pointer(&self, pointer_id: PointerId);

    /// Ends a capture started by [`capture_pointer`](Self::capture_pointer).
    fn release_pointer_capture(&self, pointer_id: PointerId);
}

/// RAII guard over the document-wide resize styles.
///
/// Acquiring it sets the resize cursor and disables text selection;
/// dropping it restores the values that were there before.
pub struct PresentationLock {
    host: Rc<dyn PresentationHost>,
    previous_cursor: String,
    previous_user_select: String,
}

impl PresentationLock {
    /// Applies the resize styles.
    #[must_use]
    pub fn acquire(host: Rc<dyn PresentationHost>) -> Self {
        let previous_cursor = host.set_body_style(BodyStyle::Cursor, RESIZE_CURSOR);
        let previous_user_select = host.set_body_style(BodyStyle::UserSelect, RESIZE_USER_SELECT);
        Self {
            host,
            previous_cursor,
            previous_user_select,
        }
    }
}

impl Drop for PresentationLock {
    fn drop(&mut self) {
        self.host
            .set_body_style(BodyStyle::Cursor, &self.previous_cursor);
        self.host
            .set_body_style(BodyStyle::UserSelect, &self.previous_user_select);
    }
}

/// RAII guard over a pointer capture.
pub struct PointerCapture {
    host: Rc<dyn PresentationHost>,
    pointer_id: PointerId,
}

impl PointerCapture {
    /// Captures the pointer.
    #[must_use]
    pub fn acquire(host: Rc<dyn PresentationHost>, pointer_id: PointerId) -> Self {
        host.capture_pointer(pointer_id);
        Self { host, pointer_id }
    }
}

impl Drop for PointerCapture {
    fn drop(&mut self) {
        self.host.release_pointer_capture(self.pointer_id);
    }
}

/// State captured when a divider drag starts.
///
/// All later widths are computed from these start values, never from the
/// previous move, so rounding cannot accumulate.
pub struct ResizeSession {
    /// Screen left of the divider.
    pub screen_id: ScreenId,
    /// Screen right of the divider.
    pub next_screen_id: ScreenId,
    /// Pointer x when the drag started.
    pub start_client_x: f64,
    /// Width of the left screen when the drag started, in percent.
    pub start_width: f64,
    /// Width of the right screen when the drag started, in percent.
    pub start_next_width: f64,
    /// Pixel width of the whole workspace, derived from the left screen's
    /// rendered width and its percentage.
    pub container_px: f64,
    _capture: PointerCapture,
}

impl ResizeSession {
    /// Converts a pointer position into a percentage delta.
    #[must_use]
    pub fn delta_percent(&self, client_x: f64) -> f64 {
        (client_x - self.start_client_x) / self.container_px * 100.0
    }
}

/// Pointer-driven divider resizing, one session per pointer.
pub struct ResizeController {
    host: Rc<dyn PresentationHost>,
    sessions: HashMap<PointerId, ResizeSession>,
    lock: Option<PresentationLock>,
}

impl ResizeController {
    /// Creates a controller drawing on `host`.
    #[must_use]
    pub fn new(host: Rc<dyn PresentationHost>) -> Self {
        Self {
            host,
            sessions: HashMap::new(),
            lock: None,
        }
    }

    /// Returns true while any divider is being dragged.
    #[must_use]
    pub fn is_resizing(&self) -> bool {
        !self.sessions.is_empty()
    }

    /// Returns the session of a pointer.
    #[must_use]
    pub fn session(&self, pointer_id: PointerId) -> Option<&ResizeSession> {
        self.sessions.get(&pointer_id)
    }

    /// Starts dragging the divider right of `screen_id`.
    ///
    /// `rendered_width_px` is the screen's current on-screen width. Returns
    /// false if the pointer is not a primary button, the screen is the
    /// rightmost one, or the widths cannot be converted to pixels.
    pub fn pointer_down(
        &mut self,
        store: &WorkspaceStore,
        event: &PointerEvent,
        screen_id: ScreenId,
        rendered_width_px: f64,
    ) -> bool {
        if !event.is_primary() {
            return false;
        }
        let _span = crate::trace_operation!(
            span_names::WORKSPACE_RESIZE,
            pointer_id = %event.pointer_id,
            screen_id = %screen_id
        )
        .entered();
        let Some(next_screen_id) = store.next_screen_id(screen_id) else {
            return false;
        };
        let (Some(start_width), Some(start_next_width)) = (
            store.screen_width(screen_id),
            store.screen_width(next_screen_id),
        ) else {
            return false;
        };
        if start_width <= 0.0 || rendered_width_px <= 0.0 {
            return false;
        }
        let container_px = rendered_width_px * 100.0 / start_width;
        if !(container_px.is_finite() && container_px > 0.0) {
            return false;
        }

        // A repeated down for the same pointer replaces its old session
        self.sessions.remove(&event.pointer_id);

        let session = ResizeSession {
            screen_id,
            next_screen_id,
            start_client_x: event.client_x,
            start_width,
            start_next_width,
            container_px,
            _capture: PointerCapture::acquire(Rc::clone(&self.host), event.pointer_id),
        };
        self.sessions.insert(event.pointer_id, session);
        if self.lock.is_none() {
            self.lock = Some(PresentationLock::acquire(Rc::clone(&self.host)));
        }

        debug!(
            next_screen_id = %next_screen_id,
            start_width,
            container_px,
            "Resize started"
        );
        true
    }

    /// Applies pointer movement. Returns the new width of the left screen,
    /// or `None` if the pointer has no session or the store refused.
    pub fn pointer_move(&self, store: &mut WorkspaceStore, event: &PointerEvent) -> Option<f64> {
        let session = self.sessions.get(&event.pointer_id)?;
        store.resize_screens(
            session.screen_id,
            session.next_screen_id,
            session.delta_percent(event.client_x),
            session.start_width,
            session.start_next_width,
        )
    }

    /// Ends the pointer's session. Returns false if it had none.
    pub fn pointer_up(&mut self, pointer_id: PointerId) -> bool {
        self.end(pointer_id)
    }

    /// Ends the pointer's session after the host cancelled the pointer.
    pub fn pointer_cancel(&mut self, pointer_id: PointerId) -> bool {
        self.end(pointer_id)
    }

    /// Ends every session when the window loses focus.
    pub fn window_blur(&mut self) {
        if self.sessions.is_empty() {
            return;
        }
        debug!(sessions = self.sessions.len(), "Resize cancelled by window blur");
        self.sessions.clear();
        self.lock = None;
    }

    fn end(&mut self, pointer_id: PointerId) -> bool {
        if self.sessions.remove(&pointer_id).is_none() {
            return false;
        }
        if self.sessions.is_empty() {
            self.lock = None;
        }
        debug!(pointer_id = %pointer_id, "Resize ended");
        true
    }
}

/// A [`PresentationHost`] that keeps styles and captures in memory.
///
/// Used by headless front ends and tests.
#[derive(Debug, Default)]
pub struct InMemoryHost {
    styles: RefCell<HashMap<BodyStyle, String>>,
    captured: RefCell<HashSet<PointerId>>,
}

impl InMemoryHost {
    /// Creates a host with the given initial style values.
    #[must_use]
    pub fn with_styles(cursor: &str, user_select: &str) -> Self {
        let host = Self::default();
        host.styles
            .borrow_mut()
            .insert(BodyStyle::Cursor, cursor.to_string());
        host.styles
            .borrow_mut()
            .insert(BodyStyle::UserSelect, user_select.to_string());
        host
    }

    /// Returns the current value of a style.
    #[must_use]
    pub fn style(&self, property: BodyStyle) -> String {
        self.styles
            .borrow()
            .get(&property)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns true if the pointer is captured.
    #[must_use]
    pub fn is_captured(&self, pointer_id: PointerId) -> bool {
        self.captured.borrow().contains(&pointer_id)
    }
}

impl PresentationHost for InMemoryHost {
    fn set_body_style(&self, property: BodyStyle, value: &str) -> String {
        self.styles
            .borrow_mut()
            .insert(property, value.to_string())
            .unwrap_or_default()
    }

    fn capture_pointer(&self, pointer_id: PointerId) {
        self.captured.borrow_mut().insert(pointer_id);
    }

    fn release_pointer_capture(&self, pointer_id: PointerId) {
        self.captured.borrow_mut().remove(&pointer_id);
    }
}
