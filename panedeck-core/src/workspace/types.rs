//! Core type definitions for the workspace model
//!
//! This module contains the identifier newtypes, route references and the
//! screen/tab entities that make up a [`Workspace`].

use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a tab.
///
/// Tab ids are unique across the whole workspace, not only within the
/// screen that currently holds the tab, so drop targets and router
/// synchronisation can resolve a tab without knowing its screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub Uuid);

impl TabId {
    /// Creates a tab ID from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a screen (a resizable pane of the workspace).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScreenId(pub Uuid);

impl ScreenId {
    /// Creates a screen ID from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The route a tab is bound to, stored as the full path including the
/// query string and fragment (e.g. `/page/42?tab=seo`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteRef(String);

impl RouteRef {
    /// Creates a route reference from a full path.
    #[must_use]
    pub fn new(full_path: impl Into<String>) -> Self {
        Self(full_path.into())
    }

    /// Returns the full path, including query and fragment.
    #[must_use]
    pub fn full_path(&self) -> &str {
        &self.0
    }

    /// Returns the path component, without query string or fragment.
    #[must_use]
    pub fn path(&self) -> &str {
        let end = self.0.find(['?', '#']).unwrap_or(self.0.len());
        &self.0[..end]
    }

    /// Returns true if both routes point at the same path, ignoring
    /// query strings and fragments.
    #[must_use]
    pub fn same_path(&self, other: &Self) -> bool {
        self.path() == other.path()
    }
}

impl fmt::Display for RouteRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RouteRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A resolved router location: the navigated route plus the metadata bag
/// the router attached to it (module key, title, icon, permissions, ...).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteLocation {
    /// Full path including query and fragment.
    pub full_path: String,
    /// Arbitrary route metadata.
    pub meta: BTreeMap<String, String>,
}

impl RouteLocation {
    /// Creates a location without metadata.
    #[must_use]
    pub fn new(full_path: impl Into<String>) -> Self {
        Self {
            full_path: full_path.into(),
            meta: BTreeMap::new(),
        }
    }

    /// Adds a metadata entry.
    #[must_use]
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// Returns the route reference a tab bound to this location would hold.
    #[must_use]
    pub fn route(&self) -> RouteRef {
        RouteRef::new(self.full_path.clone())
    }
}

/// A named, route-bound unit of navigation inside a screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    /// Globally unique tab identifier.
    pub id: TabId,
    /// Title shown in the tab header.
    pub title: String,
    /// Route the tab is bound to.
    pub route: RouteRef,
    /// Optional icon name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Tab {
    /// Creates a tab without an icon.
    #[must_use]
    pub fn new(id: TabId, title: impl Into<String>, route: RouteRef) -> Self {
        Self {
            id,
            title: title.into(),
            route,
            icon: None,
        }
    }

    /// Sets the icon.
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Returns a copy of this tab carrying a different id.
    #[must_use]
    pub fn duplicate(&self, id: TabId) -> Self {
        Self {
            id,
            title: self.title.clone(),
            route: self.route.clone(),
            icon: self.icon.clone(),
        }
    }
}

/// A resizable pane holding an ordered set of tabs.
///
/// Tab order is the insertion order of `tabs`; it is the display order.
#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    /// Screen identifier.
    pub id: ScreenId,
    /// Tabs in display order.
    pub(crate) tabs: IndexMap<TabId, Tab>,
    /// The selected tab; `None` only while `tabs` is empty.
    pub(crate) active_tab_id: Option<TabId>,
    /// Width as a percentage of the workspace; `0.0` means unassigned.
    pub(crate) width: f64,
}

impl Screen {
    /// Creates an empty screen with an unassigned width.
    #[must_use]
    pub fn new(id: ScreenId) -> Self {
        Self {
            id,
            tabs: IndexMap::new(),
            active_tab_id: None,
            width: 0.0,
        }
    }

    /// Returns the tabs in display order.
    pub fn tabs(&self) -> impl ExactSizeIterator<Item = &Tab> {
        self.tabs.values()
    }

    /// Returns the tab ids in display order.
    #[must_use]
    pub fn tab_ids(&self) -> Vec<TabId> {
        self.tabs.keys().copied().collect()
    }

    /// Returns the number of tabs.
    #[must_use]
    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    /// Returns true if the screen holds no tabs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Returns a tab by id.
    #[must_use]
    pub fn tab(&self, tab_id: TabId) -> Option<&Tab> {
        self.tabs.get(&tab_id)
    }

    /// Returns the tab at a display position.
    #[must_use]
    pub fn tab_at(&self, index: usize) -> Option<&Tab> {
        self.tabs.get_index(index).map(|(_, tab)| tab)
    }

    /// Returns the display position of a tab.
    #[must_use]
    pub fn tab_index(&self, tab_id: TabId) -> Option<usize> {
        self.tabs.get_index_of(&tab_id)
    }

    /// Returns true if the screen holds the tab.
    #[must_use]
    pub fn contains_tab(&self, tab_id: TabId) -> bool {
        self.tabs.contains_key(&tab_id)
    }

    /// Returns the active tab id.
    #[must_use]
    pub const fn active_tab_id(&self) -> Option<TabId> {
        self.active_tab_id
    }

    /// Returns the active tab.
    #[must_use]
    pub fn active_tab(&self) -> Option<&Tab> {
        self.active_tab_id.and_then(|id| self.tabs.get(&id))
    }

    /// Returns the stored width percentage (`0.0` if unassigned).
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Returns the first tab bound to the same path as `route`.
    #[must_use]
    pub fn find_tab_by_path(&self, route: &RouteRef) -> Option<&Tab> {
        self.tabs.values().find(|tab| tab.route.same_path(route))
    }
}

/// The full set of screens plus the active screen.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Workspace {
    /// Screens in display order (left to right).
    pub(crate) screens: IndexMap<ScreenId, Screen>,
    /// The focused screen; references a live screen whenever any exist.
    pub(crate) active_screen_id: Option<ScreenId>,
}

impl Workspace {
    /// Creates a workspace holding a single empty full-width screen.
    #[must_use]
    pub fn single(screen_id: ScreenId) -> Self {
        let mut screen = Screen::new(screen_id);
        screen.width = 100.0;
        let mut screens = IndexMap::new();
        screens.insert(screen_id, screen);
        Self {
            screens,
            active_screen_id: Some(screen_id),
        }
    }

    /// Returns the screens in display order.
    pub fn screens(&self) -> impl ExactSizeIterator<Item = &Screen> {
        self.screens.values()
    }

    /// Returns a screen by id.
    #[must_use]
    pub fn screen(&self, screen_id: ScreenId) -> Option<&Screen> {
        self.screens.get(&screen_id)
    }

    /// Returns the number of screens.
    #[must_use]
    pub fn screen_count(&self) -> usize {
        self.screens.len()
    }

    /// Returns the active screen id.
    #[must_use]
    pub const fn active_screen_id(&self) -> Option<ScreenId> {
        self.active_screen_id
    }

    /// Returns the total number of tabs across all screens.
    #[must_use]
    pub fn tab_count(&self) -> usize {
        self.screens.values().map(Screen::tab_count).sum()
    }

    /// Returns the sum of all screen widths.
    #[must_use]
    pub fn total_width(&self) -> f64 {
        self.screens.values().map(|s| s.width).sum()
    }
}
