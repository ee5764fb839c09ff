//! The workspace store: single writer of the screen/tab model
//!
//! All mutation of a [`Workspace`] goes through [`WorkspaceStore`]. Every
//! operation runs to completion synchronously and leaves the model with
//! widths summing to 100 and valid active ids. Operations on unknown or
//! stale ids are no-ops returning `None`/`false`, since ids frequently go
//! stale between event dispatch and handling.
//!
//! # Example
//!
//! ```
//! use panedeck_core::workspace::{RouteLocation, TabOverrides, WorkspaceStore};
//!
//! let mut store = WorkspaceStore::new();
//! let screen = store.active_screen_id().unwrap();
//! store.open_route_tab(screen, &RouteLocation::new("/page/42"), TabOverrides::none());
//!
//! // Splitting clones the active tab into the new screen
//! store.add_screen(Vec::new(), None);
//! assert_eq!(store.screen_count(), 2);
//! assert_eq!(store.tab_count(), 2);
//! assert!(store.check_invariants().is_ok());
//! ```

use std::fmt;

use tracing::debug;

use super::error::InvariantViolation;
use super::ids::{IdentifierSource, UuidSource};
use super::route::{MetaBagResolver, RouteMetadataResolver, TabMeta};
use super::types::{RouteLocation, Screen, ScreenId, Tab, TabId, Workspace};
use super::width::{self, MIN_SCREEN_WIDTH_PERCENT, WIDTH_EPSILON};

/// Owns the workspace model and exposes its mutation and query operations.
pub struct WorkspaceStore {
    pub(super) workspace: Workspace,
    pub(super) ids: Box<dyn IdentifierSource + Send>,
    pub(super) resolver: Box<dyn RouteMetadataResolver + Send + Sync>,
    pub(super) min_width_percent: f64,
    pub(super) revision: u64,
}

impl fmt::Debug for WorkspaceStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkspaceStore")
            .field("workspace", &self.workspace)
            .field("min_width_percent", &self.min_width_percent)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl Default for WorkspaceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkspaceStore {
    /// Creates a store with random ids, metadata read from the route's
    /// metadata bag, and a single empty screen.
    #[must_use]
    pub fn new() -> Self {
        Self::with_sources(UuidSource, MetaBagResolver::default())
    }

    /// Creates a store with the given identifier source and route metadata
    /// resolver, holding a single empty screen.
    #[must_use]
    pub fn with_sources(
        ids: impl IdentifierSource + Send + 'static,
        resolver: impl RouteMetadataResolver + Send + Sync + 'static,
    ) -> Self {
        let mut ids: Box<dyn IdentifierSource + Send> = Box::new(ids);
        let workspace = Workspace::single(ids.next_screen_id());
        Self {
            workspace,
            ids,
            resolver: Box::new(resolver),
            min_width_percent: MIN_SCREEN_WIDTH_PERCENT,
            revision: 0,
        }
    }

    /// Sets the minimum screen width enforced while resizing.
    #[must_use]
    pub fn with_min_width_percent(mut self, min_width_percent: f64) -> Self {
        if min_width_percent.is_finite() && min_width_percent >= 0.0 {
            self.min_width_percent = min_width_percent;
        }
        self
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Returns the current model.
    #[must_use]
    pub const fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Returns a counter bumped by every mutation that changed the model.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns the minimum screen width enforced while resizing.
    #[must_use]
    pub const fn min_width_percent(&self) -> f64 {
        self.min_width_percent
    }

    /// Returns the screens in display order.
    pub fn screens(&self) -> impl ExactSizeIterator<Item = &Screen> {
        self.workspace.screens.values()
    }

    /// Returns the screen ids in display order.
    #[must_use]
    pub fn screen_ids(&self) -> Vec<ScreenId> {
        self.workspace.screens.keys().copied().collect()
    }

    /// Returns a screen by id.
    #[must_use]
    pub fn screen(&self, screen_id: ScreenId) -> Option<&Screen> {
        self.workspace.screens.get(&screen_id)
    }

    /// Returns the number of screens.
    #[must_use]
    pub fn screen_count(&self) -> usize {
        self.workspace.screens.len()
    }

    /// Returns the total number of tabs across all screens.
    #[must_use]
    pub fn tab_count(&self) -> usize {
        self.workspace.tab_count()
    }

    /// Returns the active screen id.
    #[must_use]
    pub const fn active_screen_id(&self) -> Option<ScreenId> {
        self.workspace.active_screen_id
    }

    /// Returns the active screen.
    #[must_use]
    pub fn active_screen(&self) -> Option<&Screen> {
        self.workspace
            .active_screen_id
            .and_then(|id| self.workspace.screens.get(&id))
    }

    /// Returns the active tab of the active screen.
    #[must_use]
    pub fn active_tab(&self) -> Option<&Tab> {
        self.active_screen().and_then(Screen::active_tab)
    }

    /// Finds a tab anywhere in the workspace.
    #[must_use]
    pub fn find_tab(&self, tab_id: TabId) -> Option<(&Screen, &Tab)> {
        self.workspace
            .screens
            .values()
            .find_map(|screen| screen.tab(tab_id).map(|tab| (screen, tab)))
    }

    /// Returns the screen currently holding a tab.
    #[must_use]
    pub fn screen_of_tab(&self, tab_id: TabId) -> Option<ScreenId> {
        self.find_tab(tab_id).map(|(screen, _)| screen.id)
    }

    /// Returns the screen displayed to the right of `screen_id`.
    #[must_use]
    pub fn next_screen_id(&self, screen_id: ScreenId) -> Option<ScreenId> {
        let index = self.workspace.screens.get_index_of(&screen_id)?;
        self.workspace
            .screens
            .get_index(index + 1)
            .map(|(id, _)| *id)
    }

    /// Returns a screen's width, or an even share if it has none yet.
    #[must_use]
    pub fn screen_width(&self, screen_id: ScreenId) -> Option<f64> {
        let screen = self.workspace.screens.get(&screen_id)?;
        Some(width::effective_width(
            screen.width,
            self.workspace.screens.len(),
        ))
    }

    /// Resolves the default title and icon for a route.
    #[must_use]
    pub fn resolve_route(&self, location: &RouteLocation) -> TabMeta {
        self.resolver.resolve(location)
    }

    /// Verifies the structural invariants of the model.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant found.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        check_workspace(&self.workspace)
    }

    // ------------------------------------------------------------------
    // Screen mutations
    // ------------------------------------------------------------------

    /// Adds a screen at the right edge and makes it active.
    ///
    /// When `initial_tabs` is empty, the active tab of the active screen is
    /// cloned (new id, same route, title and icon) as the seed tab, so a
    /// split never produces an empty pane unless nothing was open. Tabs
    /// whose ids already exist in the workspace are given fresh ids.
    ///
    /// The new screen starts at `100 / (n + 1)` percent; existing screens
    /// shrink proportionally to make room.
    pub fn add_screen(&mut self, initial_tabs: Vec<Tab>, active_tab_id: Option<TabId>) -> &Screen {
        let mut tabs = initial_tabs;
        if tabs.is_empty() {
            if let Some(seed) = self.clone_active_tab() {
                tabs.push(seed);
            }
        }

        let screen_id = self.ids.next_screen_id();
        let mut screen = Screen::new(screen_id);
        for mut tab in tabs {
            if self.find_tab(tab.id).is_some() || screen.tabs.contains_key(&tab.id) {
                tab.id = self.ids.next_tab_id();
            }
            screen.tabs.insert(tab.id, tab);
        }
        screen.active_tab_id = active_tab_id
            .filter(|id| screen.tabs.contains_key(id))
            .or_else(|| screen.tabs.keys().next().copied());

        let existing = self.workspace.screens.len();
        let new_width = width::new_screen_width(existing);
        let existing_total: f64 = self
            .workspace
            .screens
            .values()
            .map(|s| width::effective_width(s.width, existing))
            .sum();
        if existing_total > 0.0 {
            let factor = (width::FULL_WIDTH_PERCENT - new_width) / existing_total;
            for other in self.workspace.screens.values_mut() {
                other.width = width::effective_width(other.width, existing) * factor;
            }
        }
        screen.width = new_width;

        debug!(
            screen_id = %screen_id,
            tabs = screen.tabs.len(),
            screens = existing + 1,
            "Screen added"
        );

        self.workspace.screens.insert(screen_id, screen);
        self.workspace.active_screen_id = Some(screen_id);
        self.normalize_in_place();
        self.touch();
        &self.workspace.screens[&screen_id]
    }

    /// Removes a screen and redistributes its width to the others.
    ///
    /// Refuses to remove the last screen. If the removed screen was active,
    /// the first remaining screen becomes active.
    pub fn remove_screen(&mut self, screen_id: ScreenId) -> Option<Screen> {
        if self.workspace.screens.len() <= 1 {
            return None;
        }
        let removed = self.workspace.screens.shift_remove(&screen_id)?;

        if self.workspace.active_screen_id == Some(screen_id) {
            self.workspace.active_screen_id = self.workspace.screens.keys().next().copied();
        }
        self.normalize_in_place();
        self.touch();

        debug!(screen_id = %screen_id, tabs = removed.tabs.len(), "Screen removed");
        Some(removed)
    }

    /// Focuses a screen. Returns false if it does not exist.
    pub fn set_active_screen(&mut self, screen_id: ScreenId) -> bool {
        if !self.workspace.screens.contains_key(&screen_id) {
            return false;
        }
        if self.workspace.active_screen_id != Some(screen_id) {
            self.workspace.active_screen_id = Some(screen_id);
            self.touch();
        }
        true
    }

    /// Selects a tab within a screen. Returns false if either is unknown.
    pub fn set_active_tab(&mut self, screen_id: ScreenId, tab_id: TabId) -> bool {
        let Some(screen) = self.workspace.screens.get_mut(&screen_id) else {
            return false;
        };
        if !screen.tabs.contains_key(&tab_id) {
            return false;
        }
        if screen.active_tab_id != Some(tab_id) {
            screen.active_tab_id = Some(tab_id);
            self.touch();
        }
        true
    }

    /// Rescales all widths so they sum to exactly 100.
    pub fn normalize_widths(&mut self) {
        if self.normalize_in_place() {
            self.touch();
        }
    }

    /// Sets one screen's width and scales the others to fill the rest.
    ///
    /// The width is clamped so the other screens can keep the configured
    /// minimum; any of them that would shrink below it is held at the
    /// minimum and the rest give up more. Returns the width actually
    /// applied.
    pub fn set_screen_width(&mut self, screen_id: ScreenId, width_percent: f64) -> Option<f64> {
        if !width_percent.is_finite() || !self.workspace.screens.contains_key(&screen_id) {
            return None;
        }
        let count = self.workspace.screens.len();
        if count == 1 {
            return self.screen_width(screen_id);
        }

        let min = self.min_width_percent.min(width::FULL_WIDTH_PERCENT / count as f64);
        let max = width::FULL_WIDTH_PERCENT - min * (count - 1) as f64;
        let applied = width_percent.clamp(min, max);

        let others: Vec<f64> = self
            .workspace
            .screens
            .values()
            .filter(|s| s.id != screen_id)
            .map(|s| width::effective_width(s.width, count))
            .collect();
        let mut scaled =
            width::scale_with_minimum(&others, width::FULL_WIDTH_PERCENT - applied, min)
                .into_iter();
        for screen in self.workspace.screens.values_mut() {
            if screen.id == screen_id {
                screen.width = applied;
            } else if let Some(width) = scaled.next() {
                screen.width = width;
            }
        }
        self.normalize_in_place();
        self.touch();
        self.screen_width(screen_id)
    }

    /// Moves the divider between two screens by `delta_percent`, computing
    /// from the widths captured when the drag started.
    ///
    /// Returns the clamped new width of `screen_id`, or `None` if either
    /// screen is unknown or the pair has no positive width.
    pub fn resize_screens(
        &mut self,
        screen_id: ScreenId,
        next_screen_id: ScreenId,
        delta_percent: f64,
        start_width: f64,
        start_next_width: f64,
    ) -> Option<f64> {
        if screen_id == next_screen_id
            || !self.workspace.screens.contains_key(&screen_id)
            || !self.workspace.screens.contains_key(&next_screen_id)
        {
            return None;
        }
        let (new_width, new_next_width) = width::resize_pair(
            start_width,
            start_next_width,
            delta_percent,
            self.min_width_percent,
        )?;

        if let Some(screen) = self.workspace.screens.get_mut(&screen_id) {
            screen.width = new_width;
        }
        if let Some(next) = self.workspace.screens.get_mut(&next_screen_id) {
            next.width = new_next_width;
        }
        // Start widths that no longer match the model would break the sum
        if !width::is_normalized(self.workspace.screens.values().map(|s| s.width)) {
            self.normalize_in_place();
        }
        self.touch();

        self.workspace.screens.get(&screen_id).map(|s| s.width)
    }

    /// Replaces the whole model, e.g. with a restored snapshot.
    ///
    /// The incoming workspace is repaired where needed so the store's
    /// invariants hold afterwards.
    pub fn replace(&mut self, workspace: Workspace) {
        self.workspace = workspace;
        self.repair();
        self.touch();
    }

    /// Resets to a single empty screen.
    pub fn reset(&mut self) {
        self.workspace = Workspace::single(self.ids.next_screen_id());
        self.touch();
    }

    // ------------------------------------------------------------------
    // Internal helpers
    // ------------------------------------------------------------------

    pub(super) fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
        debug_assert!(
            self.check_invariants().is_ok(),
            "workspace invariant violated: {:?}",
            self.check_invariants()
        );
    }

    /// Normalizes widths, returning true if any width changed.
    pub(super) fn normalize_in_place(&mut self) -> bool {
        let before: Vec<f64> = self.workspace.screens.values().map(|s| s.width).collect();
        width::normalize(self.workspace.screens.values_mut().map(|s| &mut s.width));
        self.workspace
            .screens
            .values()
            .zip(before)
            .any(|(s, w)| s.width.to_bits() != w.to_bits())
    }

    fn clone_active_tab(&mut self) -> Option<Tab> {
        let source = self.active_tab()?.clone();
        Some(source.duplicate(self.ids.next_tab_id()))
    }

    /// Restores invariants on an externally supplied workspace.
    fn repair(&mut self) {
        if self.workspace.screens.is_empty() {
            self.workspace = Workspace::single(self.ids.next_screen_id());
            return;
        }

        let mut seen = std::collections::HashSet::new();
        for screen in self.workspace.screens.values_mut() {
            screen.tabs.retain(|id, _| seen.insert(*id));
            let active_valid = screen
                .active_tab_id
                .is_some_and(|id| screen.tabs.contains_key(&id));
            if !active_valid {
                screen.active_tab_id = screen.tabs.keys().next().copied();
            }
            if !(screen.width.is_finite() && screen.width >= 0.0) {
                screen.width = 0.0;
            }
        }

        let active_valid = self
            .workspace
            .active_screen_id
            .is_some_and(|id| self.workspace.screens.contains_key(&id));
        if !active_valid {
            self.workspace.active_screen_id = self.workspace.screens.keys().next().copied();
        }

        let widths_ok = self.workspace.screens.values().all(|s| s.width > 0.0)
            && width::is_normalized(self.workspace.screens.values().map(|s| s.width));
        if !widths_ok {
            self.normalize_in_place();
        }
    }
}

/// Checks a workspace against the model invariants.
pub(crate) fn check_workspace(workspace: &Workspace) -> Result<(), InvariantViolation> {
    if workspace.screens.is_empty() {
        return Err(InvariantViolation::NoScreens);
    }
    match workspace.active_screen_id {
        None => return Err(InvariantViolation::NoActiveScreen),
        Some(id) if !workspace.screens.contains_key(&id) => {
            return Err(InvariantViolation::ActiveScreenMissing(id));
        }
        Some(_) => {}
    }

    let mut seen = std::collections::HashSet::new();
    for screen in workspace.screens.values() {
        match screen.active_tab_id {
            Some(tab_id) if !screen.tabs.contains_key(&tab_id) => {
                return Err(InvariantViolation::ActiveTabMissing {
                    screen_id: screen.id,
                    tab_id,
                });
            }
            None if !screen.tabs.is_empty() => {
                return Err(InvariantViolation::NoActiveTab(screen.id));
            }
            _ => {}
        }
        for tab_id in screen.tabs.keys() {
            if !seen.insert(*tab_id) {
                return Err(InvariantViolation::DuplicateTab(*tab_id));
            }
        }
    }

    let total = workspace.total_width();
    if (total - width::FULL_WIDTH_PERCENT).abs() > WIDTH_EPSILON {
        return Err(InvariantViolation::WidthSum(total));
    }
    Ok(())
}
