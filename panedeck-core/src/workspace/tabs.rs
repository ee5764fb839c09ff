//! Tab lifecycle operations
//!
//! Opening, rebinding, closing, reordering, moving and cloning tabs. These
//! live on [`WorkspaceStore`] so the single-writer discipline holds: every
//! change to a screen's tab order or active tab passes through here.

use tracing::debug;

use super::route::{TabMeta, TabOverrides};
use super::store::WorkspaceStore;
use super::types::{RouteLocation, Screen, ScreenId, Tab, TabId};

/// Result of closing a tab.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedTab {
    /// The removed tab.
    pub tab: Tab,
    /// The screen the tab was closed in.
    pub screen_id: ScreenId,
    /// The screen's active tab after the close.
    pub next_active: Option<TabId>,
    /// Whether the emptied screen was removed as well.
    pub screen_removed: bool,
}

/// Result of moving or cloning a tab between screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabTransfer {
    /// Id of the tab in the destination (a fresh id for clones).
    pub tab_id: TabId,
    /// Source screen.
    pub from_screen_id: ScreenId,
    /// Destination screen.
    pub to_screen_id: ScreenId,
    /// Position the tab landed at in the destination.
    pub index: usize,
    /// Whether the source screen was removed because it became empty.
    pub source_screen_removed: bool,
}

/// Returns the index of the tab that becomes active after removing the
/// active tab at `removed` from a screen now holding `remaining` tabs.
///
/// The left neighbour is chosen; when the first tab was removed, the new
/// first tab. `None` if nothing remains.
#[must_use]
pub fn left_neighbor_index(removed: usize, remaining: usize) -> Option<usize> {
    if remaining == 0 {
        return None;
    }
    Some(removed.saturating_sub(1).min(remaining - 1))
}

/// Computes a rebound tab's title and icon.
///
/// An explicit override always wins. Otherwise defaults are applied, except
/// when the path is unchanged and the tab carries a title that differs from
/// the default: that is a manual rename and is kept.
fn rebound_meta(
    tab: &Tab,
    same_path: bool,
    defaults: TabMeta,
    overrides: &TabOverrides,
) -> TabMeta {
    let renamed = same_path && tab.title != defaults.title;
    let base = if renamed {
        TabMeta::new(tab.title.clone(), tab.icon.clone())
    } else {
        defaults
    };
    overrides.apply(base)
}

impl WorkspaceStore {
    /// Opens a new tab bound to `location` at the end of a screen and makes
    /// it the screen's active tab.
    ///
    /// Title and icon come from the route metadata resolver unless
    /// overridden. Returns `None` if the screen does not exist.
    pub fn open_route_tab(
        &mut self,
        screen_id: ScreenId,
        location: &RouteLocation,
        overrides: TabOverrides,
    ) -> Option<&Tab> {
        if !self.workspace.screens.contains_key(&screen_id) {
            return None;
        }
        let meta = overrides.apply(self.resolver.resolve(location));
        let tab_id = self.ids.next_tab_id();
        let tab = Tab {
            id: tab_id,
            title: meta.title,
            route: location.route(),
            icon: meta.icon,
        };

        debug!(
            screen_id = %screen_id,
            tab_id = %tab_id,
            route = %tab.route,
            "Tab opened"
        );

        let screen = self.workspace.screens.get_mut(&screen_id)?;
        screen.tabs.insert(tab_id, tab);
        screen.active_tab_id = Some(tab_id);
        self.touch();
        self.workspace.screens.get(&screen_id)?.tabs.get(&tab_id)
    }

    /// Points the active screen's active tab at `location`, or opens a tab
    /// there if the active screen has none.
    pub fn set_active_route_tab(
        &mut self,
        location: &RouteLocation,
        overrides: TabOverrides,
    ) -> Option<&Tab> {
        let screen_id = self.workspace.active_screen_id?;
        let active_tab = self.workspace.screens.get(&screen_id)?.active_tab_id;
        match active_tab {
            None => self.open_route_tab(screen_id, location, overrides),
            Some(tab_id) => {
                self.rebind_tab(screen_id, tab_id, location, &overrides);
                self.workspace.screens.get(&screen_id)?.tabs.get(&tab_id)
            }
        }
    }

    /// Reuses an existing tab for `location`: focuses its screen, selects
    /// it, and rebinds it to the full route.
    ///
    /// Returns `None` if the tab is not part of the screen.
    pub fn activate_route_tab(
        &mut self,
        screen_id: ScreenId,
        tab_id: TabId,
        location: &RouteLocation,
    ) -> Option<&Tab> {
        if !self
            .workspace
            .screens
            .get(&screen_id)
            .is_some_and(|screen| screen.contains_tab(tab_id))
        {
            return None;
        }
        self.set_active_screen(screen_id);
        self.set_active_tab(screen_id, tab_id);
        self.rebind_tab(screen_id, tab_id, location, &TabOverrides::none());
        self.workspace.screens.get(&screen_id)?.tabs.get(&tab_id)
    }

    /// Applies a user rename or icon change to a tab anywhere in the
    /// workspace.
    pub fn update_tab(&mut self, tab_id: TabId, overrides: TabOverrides) -> Option<&Tab> {
        let screen_id = self.screen_of_tab(tab_id)?;
        let tab = self.workspace.screens.get_mut(&screen_id)?.tabs.get_mut(&tab_id)?;
        let meta = overrides.apply(TabMeta::new(tab.title.clone(), tab.icon.clone()));
        let changed = tab.title != meta.title || tab.icon != meta.icon;
        tab.title = meta.title;
        tab.icon = meta.icon;
        if changed {
            self.touch();
        }
        self.workspace.screens.get(&screen_id)?.tabs.get(&tab_id)
    }

    /// Closes a tab.
    ///
    /// If the tab was active, its left neighbour becomes active (the new
    /// first tab when the first was closed). When the screen is left empty
    /// and other screens exist, the screen is removed too and its width
    /// handed to the others.
    pub fn close_tab(&mut self, screen_id: ScreenId, tab_id: TabId) -> Option<ClosedTab> {
        let screen = self.workspace.screens.get_mut(&screen_id)?;
        let (index, _, tab) = screen.tabs.shift_remove_full(&tab_id)?;

        if screen.active_tab_id == Some(tab_id) {
            screen.active_tab_id = left_neighbor_index(index, screen.tabs.len())
                .and_then(|i| screen.tabs.get_index(i))
                .map(|(id, _)| *id);
        }
        let next_active = screen.active_tab_id;
        let emptied = screen.tabs.is_empty();

        let screen_removed = emptied && self.workspace.screens.len() > 1;
        if screen_removed {
            self.drop_screen(screen_id);
        }
        self.touch();

        debug!(
            screen_id = %screen_id,
            tab_id = %tab_id,
            screen_removed,
            "Tab closed"
        );

        Some(ClosedTab {
            tab,
            screen_id,
            next_active,
            screen_removed,
        })
    }

    /// Moves the tab at position `from` to position `to` within a screen.
    ///
    /// Returns false if the screen is unknown or either index is out of
    /// range. The set of tabs is never changed, only their order.
    pub fn reorder_tabs(&mut self, screen_id: ScreenId, from: usize, to: usize) -> bool {
        let Some(screen) = self.workspace.screens.get_mut(&screen_id) else {
            return false;
        };
        let len = screen.tabs.len();
        if from >= len || to >= len {
            return false;
        }
        if from != to {
            screen.tabs.move_index(from, to);
            self.touch();
            debug!(screen_id = %screen_id, from, to, "Tabs reordered");
        }
        true
    }

    /// Moves a tab from one screen into another at `index` (clamped to the
    /// destination's length) and makes it active there.
    ///
    /// The destination becomes the active screen. The source's active tab
    /// follows the left-neighbour rule, and an emptied source screen is
    /// removed. Returns `None` for unknown ids, a tab not held by the
    /// source, or `from == to` (use [`reorder_tabs`](Self::reorder_tabs)).
    pub fn move_tab_to_screen(
        &mut self,
        tab_id: TabId,
        from_screen_id: ScreenId,
        to_screen_id: ScreenId,
        index: usize,
    ) -> Option<TabTransfer> {
        if from_screen_id == to_screen_id || !self.workspace.screens.contains_key(&to_screen_id) {
            return None;
        }
        let source = self.workspace.screens.get_mut(&from_screen_id)?;
        let (removed_at, _, tab) = source.tabs.shift_remove_full(&tab_id)?;
        if source.active_tab_id == Some(tab_id) {
            source.active_tab_id = left_neighbor_index(removed_at, source.tabs.len())
                .and_then(|i| source.tabs.get_index(i))
                .map(|(id, _)| *id);
        }
        let source_emptied = source.tabs.is_empty();

        let index = self.insert_tab(to_screen_id, index, tab)?;
        self.workspace.active_screen_id = Some(to_screen_id);

        let source_screen_removed = source_emptied && self.workspace.screens.len() > 1;
        if source_screen_removed {
            self.drop_screen(from_screen_id);
        }
        self.touch();

        debug!(
            tab_id = %tab_id,
            from = %from_screen_id,
            to = %to_screen_id,
            index,
            "Tab moved"
        );

        Some(TabTransfer {
            tab_id,
            from_screen_id,
            to_screen_id,
            index,
            source_screen_removed,
        })
    }

    /// Copies a tab into a screen at `index` under a fresh id and makes the
    /// copy active there. The source screen is left untouched; the
    /// destination may be the source screen itself.
    pub fn clone_tab_to_screen(
        &mut self,
        tab_id: TabId,
        from_screen_id: ScreenId,
        to_screen_id: ScreenId,
        index: usize,
    ) -> Option<TabTransfer> {
        if !self.workspace.screens.contains_key(&to_screen_id) {
            return None;
        }
        let source = self
            .workspace
            .screens
            .get(&from_screen_id)?
            .tabs
            .get(&tab_id)?
            .clone();
        let copy = source.duplicate(self.ids.next_tab_id());
        let copy_id = copy.id;

        let index = self.insert_tab(to_screen_id, index, copy)?;
        self.workspace.active_screen_id = Some(to_screen_id);
        self.touch();

        debug!(
            tab_id = %tab_id,
            copy_id = %copy_id,
            to = %to_screen_id,
            index,
            "Tab cloned"
        );

        Some(TabTransfer {
            tab_id: copy_id,
            from_screen_id,
            to_screen_id,
            index,
            source_screen_removed: false,
        })
    }

    /// Returns true if a tab of this screen may start a drag.
    ///
    /// Dragging the only tab of the only screen could not go anywhere, so
    /// it is refused.
    #[must_use]
    pub fn can_drag_tab(&self, screen_id: ScreenId) -> bool {
        self.workspace
            .screens
            .get(&screen_id)
            .is_some_and(|screen| {
                !screen.is_empty()
                    && (screen.tab_count() > 1 || self.workspace.screens.len() > 1)
            })
    }

    // ------------------------------------------------------------------
    // Internal helpers
    // ------------------------------------------------------------------

    /// Inserts a tab at a clamped index and activates it. Returns the index
    /// used.
    fn insert_tab(&mut self, screen_id: ScreenId, index: usize, tab: Tab) -> Option<usize> {
        let screen: &mut Screen = self.workspace.screens.get_mut(&screen_id)?;
        let index = index.min(screen.tabs.len());
        let tab_id = tab.id;
        screen.tabs.shift_insert(index, tab_id, tab);
        screen.active_tab_id = Some(tab_id);
        Some(index)
    }

    /// Removes a screen without the last-screen guard's bookkeeping; the
    /// caller bumps the revision.
    fn drop_screen(&mut self, screen_id: ScreenId) {
        if self.workspace.screens.shift_remove(&screen_id).is_none() {
            return;
        }
        if self.workspace.active_screen_id == Some(screen_id) {
            self.workspace.active_screen_id = self.workspace.screens.keys().next().copied();
        }
        self.normalize_in_place();
    }

    /// Rebinds a tab to a new location. Bumps the revision only if the
    /// route, title or icon actually changed.
    fn rebind_tab(
        &mut self,
        screen_id: ScreenId,
        tab_id: TabId,
        location: &RouteLocation,
        overrides: &TabOverrides,
    ) {
        let route = location.route();
        let defaults = self.resolver.resolve(location);
        let Some(tab) = self
            .workspace
            .screens
            .get_mut(&screen_id)
            .and_then(|screen| screen.tabs.get_mut(&tab_id))
        else {
            return;
        };

        let meta = rebound_meta(tab, tab.route.same_path(&route), defaults, overrides);
        let changed = tab.route != route || tab.title != meta.title || tab.icon != meta.icon;
        if changed {
            debug!(tab_id = %tab_id, route = %route, "Tab rebound");
            tab.route = route;
            tab.title = meta.title;
            tab.icon = meta.icon;
            self.touch();
        }
    }
}
