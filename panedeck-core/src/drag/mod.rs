//! Drag-and-drop of tabs between and within screens
//!
//! [`DragDropController`] turns pointer input over tab headers and screen
//! bodies into [`WorkspaceStore`] mutations. A gesture goes through
//! `Idle -> Armed -> Dragging` and ends with a drop or a cancel, after
//! which the controller is idle again. Only one gesture exists at a time;
//! a new `pointer_down` discards whatever state the previous one left.
//!
//! The store is passed into the operations that need it rather than owned,
//! so the same store can serve the resize controller and router sync.

mod geometry;
mod preview;

pub use geometry::{
    Edge, TabBounds, closest_edge, indicator_x, insert_index, reorder_index,
};
pub use preview::{DragImage, DragImageSlot, DragPreview};

use tracing::{debug, warn};

use crate::input::{Modifiers, PointerEvent, PointerId};
use crate::tracing::span_names;
use crate::workspace::{Screen, ScreenId, Tab, TabId, TabTransfer, WorkspaceStore};

/// Default pointer travel, in pixels, before an armed gesture becomes a
/// drag.
pub const DEFAULT_DRAG_THRESHOLD_PX: f64 = 4.0;

/// Payload describing the tab being dragged.
#[derive(Debug, Clone, PartialEq)]
pub struct DragPayload {
    /// Dragged tab.
    pub tab_id: TabId,
    /// Screen the drag started in.
    pub screen_id: ScreenId,
    /// Snapshot of the tab when the drag started.
    pub tab: Tab,
    /// Position of the tab when the drag started.
    pub index: usize,
}

/// Data carried by a drag gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum DragData {
    /// A workspace tab
    Tab(DragPayload),
    /// Anything else dragged over the workspace (files, text, ...)
    Other {
        /// Host-reported kind of the foreign payload
        kind: String,
    },
}

impl DragData {
    /// Returns the tab payload, if any.
    #[must_use]
    pub const fn as_tab(&self) -> Option<&DragPayload> {
        match self {
            Self::Tab(payload) => Some(payload),
            Self::Other { .. } => None,
        }
    }
}

/// Where a drag is hovering or was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// The body or trailing empty area of a screen; appends at the end.
    ScreenBody {
        /// Target screen
        screen_id: ScreenId,
    },
    /// Next to a tab header; inserts before or after it.
    TabZone {
        /// Target screen
        screen_id: ScreenId,
        /// Index of the tab under the pointer
        index: usize,
        /// Closest edge of that tab
        edge: Edge,
    },
}

impl DropTarget {
    /// Builds a tab-zone target from the pointer position over a tab.
    #[must_use]
    pub fn tab_zone_at(
        screen_id: ScreenId,
        index: usize,
        bounds: &TabBounds,
        client_x: f64,
    ) -> Self {
        Self::TabZone {
            screen_id,
            index,
            edge: closest_edge(bounds, client_x),
        }
    }

    /// Returns the target screen.
    #[must_use]
    pub const fn screen_id(&self) -> ScreenId {
        match self {
            Self::ScreenBody { screen_id } | Self::TabZone { screen_id, .. } => *screen_id,
        }
    }

    /// Returns true if the target accepts this drag data. Only tabs are
    /// accepted.
    #[must_use]
    pub const fn can_drop(&self, data: &DragData) -> bool {
        matches!(data, DragData::Tab(_))
    }
}

/// Why a drop did not change anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropRejection {
    /// No drag was in progress for the pointer.
    NotDragging,
    /// The payload is not a tab.
    NotATab,
    /// The dragged tab no longer exists.
    StaleTab,
    /// The target screen no longer exists.
    UnknownScreen,
}

/// Result of a drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// The tab changed position within its screen.
    Reordered {
        /// Screen holding the tab
        screen_id: ScreenId,
        /// Previous index
        from: usize,
        /// New index
        to: usize,
    },
    /// The tab moved to another screen.
    Moved(TabTransfer),
    /// A copy of the tab was inserted.
    Cloned(TabTransfer),
    /// The drop landed where the tab already was.
    Unchanged,
    /// Nothing was done.
    Rejected(DropRejection),
}

impl DropOutcome {
    /// Returns true if the workspace was modified.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(
            self,
            Self::Reordered { .. } | Self::Moved(_) | Self::Cloned(_)
        )
    }
}

/// Drop indicator to render while hovering a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropIndicator {
    /// Screen being hovered
    pub screen_id: ScreenId,
    /// Tab whose edge shows the indicator; `None` for a screen body
    pub tab_index: Option<usize>,
    /// Edge of that tab
    pub edge: Option<Edge>,
}

/// Applies a tab drop to the store.
///
/// The source position is taken from the store rather than from the
/// payload, since the tab may have moved since the drag started. A drop
/// within the source screen always reorders; across screens, `modifiers`
/// (sampled at drop time) decide between move and clone.
pub fn resolve_drop(
    store: &mut WorkspaceStore,
    payload: &DragPayload,
    target: DropTarget,
    modifiers: Modifiers,
) -> DropOutcome {
    let _span =
        crate::trace_operation!(span_names::WORKSPACE_DROP, tab_id = %payload.tab_id).entered();
    let Some((source_screen_id, source_index)) = store
        .find_tab(payload.tab_id)
        .and_then(|(screen, _)| screen.tab_index(payload.tab_id).map(|i| (screen.id, i)))
    else {
        warn!(tab_id = %payload.tab_id, "Dropped tab no longer exists");
        return DropOutcome::Rejected(DropRejection::StaleTab);
    };

    let target_screen_id = target.screen_id();
    let Some(target_len) = store.screen(target_screen_id).map(Screen::tab_count) else {
        warn!(screen_id = %target_screen_id, "Drop target screen no longer exists");
        return DropOutcome::Rejected(DropRejection::UnknownScreen);
    };

    let raw_index = match target {
        DropTarget::ScreenBody { .. } => target_len,
        DropTarget::TabZone { index, edge, .. } => insert_index(index, edge).min(target_len),
    };

    if source_screen_id == target_screen_id {
        let to = reorder_index(source_index, raw_index).min(target_len.saturating_sub(1));
        if to == source_index {
            return DropOutcome::Unchanged;
        }
        if store.reorder_tabs(source_screen_id, source_index, to) {
            return DropOutcome::Reordered {
                screen_id: source_screen_id,
                from: source_index,
                to,
            };
        }
        return DropOutcome::Unchanged;
    }

    if modifiers.is_clone_gesture() {
        return store
            .clone_tab_to_screen(payload.tab_id, source_screen_id, target_screen_id, raw_index)
            .map_or(
                DropOutcome::Rejected(DropRejection::StaleTab),
                DropOutcome::Cloned,
            );
    }

    store
        .move_tab_to_screen(payload.tab_id, source_screen_id, target_screen_id, raw_index)
        .map_or(
            DropOutcome::Rejected(DropRejection::StaleTab),
            DropOutcome::Moved,
        )
}

#[derive(Debug, Clone, PartialEq)]
enum DragState {
    Idle,
    Armed {
        pointer_id: PointerId,
        payload: DragPayload,
        origin_x: f64,
        origin_y: f64,
        preview: Option<DragPreview>,
    },
    Dragging {
        pointer_id: PointerId,
        data: DragData,
        hover: Option<DropTarget>,
        preview: Option<DragPreview>,
    },
}

/// Pointer-driven drag-and-drop state machine.
#[derive(Debug)]
pub struct DragDropController {
    state: DragState,
    threshold_px: f64,
    drag_image: DragImageSlot,
}

impl Default for DragDropController {
    fn default() -> Self {
        Self::new()
    }
}

impl DragDropController {
    /// Creates an idle controller with the default drag threshold.
    #[must_use]
    pub fn new() -> Self {
        Self::with_threshold(DEFAULT_DRAG_THRESHOLD_PX)
    }

    /// Creates an idle controller that starts dragging after `threshold_px`
    /// pixels of pointer travel.
    #[must_use]
    pub fn with_threshold(threshold_px: f64) -> Self {
        Self {
            state: DragState::Idle,
            threshold_px: threshold_px.max(0.0),
            drag_image: DragImageSlot::default(),
        }
    }

    /// Returns the drag threshold in pixels.
    #[must_use]
    pub const fn threshold_px(&self) -> f64 {
        self.threshold_px
    }

    /// Returns true while no gesture is in progress.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self.state, DragState::Idle)
    }

    /// Returns true once a gesture has passed the threshold.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Returns the pointer owning the current gesture.
    #[must_use]
    pub const fn active_pointer(&self) -> Option<PointerId> {
        match &self.state {
            DragState::Idle => None,
            DragState::Armed { pointer_id, .. } | DragState::Dragging { pointer_id, .. } => {
                Some(*pointer_id)
            }
        }
    }

    /// Returns the data of the current gesture.
    #[must_use]
    pub fn drag_data(&self) -> Option<DragData> {
        match &self.state {
            DragState::Idle => None,
            DragState::Armed { payload, .. } => Some(DragData::Tab(payload.clone())),
            DragState::Dragging { data, .. } => Some(data.clone()),
        }
    }

    /// Returns the preview of the current gesture, if the source bounds
    /// were known.
    #[must_use]
    pub const fn preview(&self) -> Option<&DragPreview> {
        match &self.state {
            DragState::Idle => None,
            DragState::Armed { preview, .. } | DragState::Dragging { preview, .. } => {
                preview.as_ref()
            }
        }
    }

    /// Arms a gesture on a tab header.
    ///
    /// Any previous gesture is discarded. Returns false (and stays idle) if
    /// the tab is not in the screen or the screen's tabs cannot be dragged.
    pub fn pointer_down(
        &mut self,
        store: &WorkspaceStore,
        event: &PointerEvent,
        screen_id: ScreenId,
        tab_id: TabId,
        bounds: Option<&TabBounds>,
    ) -> bool {
        if !self.is_idle() {
            debug!(pointer_id = %event.pointer_id, "Discarding stale drag state");
        }
        self.state = DragState::Idle;

        if !event.is_primary() || !store.can_drag_tab(screen_id) {
            return false;
        }
        let Some(screen) = store.screen(screen_id) else {
            return false;
        };
        let (Some(index), Some(tab)) = (screen.tab_index(tab_id), screen.tab(tab_id)) else {
            return false;
        };

        self.state = DragState::Armed {
            pointer_id: event.pointer_id,
            payload: DragPayload {
                tab_id,
                screen_id,
                tab: tab.clone(),
                index,
            },
            origin_x: event.client_x,
            origin_y: event.client_y,
            preview: bounds.map(|b| DragPreview::from_grab(b, event.client_x, event.client_y)),
        };
        true
    }

    /// Feeds pointer movement. Returns true while the gesture is dragging.
    pub fn pointer_move(&mut self, event: &PointerEvent) -> bool {
        let past_threshold = match &self.state {
            DragState::Armed {
                pointer_id,
                origin_x,
                origin_y,
                ..
            } if *pointer_id == event.pointer_id => {
                (event.client_x - origin_x).hypot(event.client_y - origin_y) >= self.threshold_px
            }
            _ => false,
        };
        if past_threshold {
            self.begin_dragging();
        }
        self.is_dragging_pointer(event.pointer_id)
    }

    /// Handles the host's native drag-start, which begins the drag
    /// regardless of the threshold. Returns the placeholder drag image to
    /// hand to the host, or `None` if no gesture is armed for the pointer.
    pub fn native_drag_start(&mut self, pointer_id: PointerId) -> Option<DragImage> {
        if self.state.pointer_id() != Some(pointer_id) {
            return None;
        }
        self.begin_dragging();
        Some(self.drag_image.get())
    }

    /// Starts a drag carrying foreign data, e.g. a file dragged in from
    /// outside the workspace. Such drags can hover but never drop.
    pub fn begin_external(&mut self, pointer_id: PointerId, kind: impl Into<String>) {
        self.state = DragState::Dragging {
            pointer_id,
            data: DragData::Other { kind: kind.into() },
            hover: None,
            preview: None,
        };
    }

    /// Records the target under the pointer. Returns true if the target
    /// accepts the drag; otherwise the hover is cleared.
    pub fn hover(&mut self, pointer_id: PointerId, target: Option<DropTarget>) -> bool {
        let DragState::Dragging {
            pointer_id: p,
            data,
            hover,
            ..
        } = &mut self.state
        else {
            return false;
        };
        if *p != pointer_id {
            return false;
        }
        *hover = target.filter(|t| t.can_drop(data));
        hover.is_some()
    }

    /// Returns the indicator for the currently hovered target.
    #[must_use]
    pub fn drop_indicator(&self) -> Option<DropIndicator> {
        let DragState::Dragging {
            hover: Some(target),
            ..
        } = &self.state
        else {
            return None;
        };
        Some(match *target {
            DropTarget::ScreenBody { screen_id } => DropIndicator {
                screen_id,
                tab_index: None,
                edge: None,
            },
            DropTarget::TabZone {
                screen_id,
                index,
                edge,
            } => DropIndicator {
                screen_id,
                tab_index: Some(index),
                edge: Some(edge),
            },
        })
    }

    /// Completes the gesture on `target` and applies it to the store.
    ///
    /// `modifiers` must be the state at drop time: holding Ctrl/Cmd here
    /// clones a tab dropped on another screen instead of moving it. The
    /// controller is idle afterwards.
    pub fn drop(
        &mut self,
        store: &mut WorkspaceStore,
        pointer_id: PointerId,
        target: DropTarget,
        modifiers: Modifiers,
    ) -> DropOutcome {
        let data = match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Dragging {
                pointer_id: p,
                data,
                ..
            } if p == pointer_id => data,
            other => {
                // A drop for another pointer leaves that pointer's gesture intact
                if other.pointer_id() != Some(pointer_id) {
                    self.state = other;
                }
                return DropOutcome::Rejected(DropRejection::NotDragging);
            }
        };

        if !target.can_drop(&data) {
            debug!(pointer_id = %pointer_id, "Drop target refused foreign payload");
            return DropOutcome::Rejected(DropRejection::NotATab);
        }
        let DragData::Tab(payload) = data else {
            return DropOutcome::Rejected(DropRejection::NotATab);
        };

        let outcome = resolve_drop(store, &payload, target, modifiers);
        debug!(tab_id = %payload.tab_id, ?outcome, "Drop handled");
        outcome
    }

    /// Ends a pointer's gesture without a drop (pointer up outside any
    /// target, pointer cancel, or escape).
    pub fn cancel(&mut self, pointer_id: PointerId) {
        if self.state.pointer_id() == Some(pointer_id) {
            self.state = DragState::Idle;
        }
    }

    /// Cancels any gesture when the window loses focus.
    pub fn window_blur(&mut self) {
        if !self.is_idle() {
            debug!("Drag cancelled by window blur");
        }
        self.state = DragState::Idle;
    }

    /// Returns the placeholder drag image, creating it on first use.
    pub fn drag_image(&mut self) -> DragImage {
        self.drag_image.get()
    }

    /// Returns true if the placeholder drag image has been created.
    #[must_use]
    pub const fn has_drag_image(&self) -> bool {
        self.drag_image.is_initialized()
    }

    /// Releases the placeholder drag image.
    pub fn reset_drag_image(&mut self) {
        self.drag_image.reset();
    }

    fn is_dragging_pointer(&self, pointer_id: PointerId) -> bool {
        matches!(&self.state, DragState::Dragging { pointer_id: p, .. } if *p == pointer_id)
    }

    fn begin_dragging(&mut self) {
        if let DragState::Armed {
            pointer_id,
            payload,
            preview,
            ..
        } = std::mem::replace(&mut self.state, DragState::Idle)
        {
            debug!(pointer_id = %pointer_id, tab_id = %payload.tab_id, "Drag started");
            self.state = DragState::Dragging {
                pointer_id,
                data: DragData::Tab(payload),
                hover: None,
                preview,
            };
        }
    }
}

impl DragState {
    const fn pointer_id(&self) -> Option<PointerId> {
        match self {
            Self::Idle => None,
            Self::Armed { pointer_id, .. } | Self::Dragging { pointer_id, .. } => Some(*pointer_id),
        }
    }
}
