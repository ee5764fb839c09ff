//! Synchronisation between the router and the active tab
//!
//! Every completed navigation is mapped onto the workspace: an existing tab
//! bound to the same path is reused (first in the active screen, then in
//! any other screen), otherwise the active tab is rebound or a tab is
//! opened. Nothing is processed until the session bootstrap has finished,
//! because route metadata may depend on permissions it loads.

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::error::NavigationError;
use crate::tracing::span_names;
use crate::workspace::{RouteLocation, ScreenId, TabId, TabOverrides, WorkspaceStore};

/// The application router.
#[async_trait]
pub trait Router: Send + Sync {
    /// Navigates to `to` and resolves once the navigation completed.
    ///
    /// # Errors
    ///
    /// Returns an error if no route matches or a guard rejected it.
    async fn push(&self, to: &str) -> Result<RouteLocation, NavigationError>;

    /// Returns the current location.
    fn current_route(&self) -> RouteLocation;
}

/// Opens a [`BootstrapGate`] once the session bootstrap finished.
#[derive(Debug)]
pub struct BootstrapSignal {
    tx: watch::Sender<bool>,
}

impl BootstrapSignal {
    /// Marks the bootstrap as finished.
    pub fn open(&self) {
        self.tx.send_replace(true);
    }
}

/// Awaitable barrier that holds back router sync until the session
/// bootstrap has completed.
#[derive(Debug, Clone)]
pub struct BootstrapGate {
    rx: watch::Receiver<bool>,
}

impl BootstrapGate {
    /// Creates a closed gate and the signal that opens it.
    #[must_use]
    pub fn new() -> (BootstrapSignal, Self) {
        let (tx, rx) = watch::channel(false);
        (BootstrapSignal { tx }, Self { rx })
    }

    /// Creates a gate that is already open.
    #[must_use]
    pub fn opened() -> Self {
        let (_, rx) = watch::channel(true);
        Self { rx }
    }

    /// Returns true if the bootstrap has completed.
    #[must_use]
    pub fn is_open(&self) -> bool {
        *self.rx.borrow()
    }

    /// Waits until the gate opens.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::BootstrapAbandoned`] if the signal was
    /// dropped without opening the gate.
    pub async fn wait(&mut self) -> Result<(), NavigationError> {
        self.rx
            .wait_for(|open| *open)
            .await
            .map(|_| ())
            .map_err(|_| NavigationError::BootstrapAbandoned)
    }
}

/// How a navigation was mapped onto the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteSyncOutcome {
    /// A tab of the active screen already showed the path.
    ReusedActiveScreen(TabId),
    /// A tab of another screen showed the path; that screen is now active.
    ReusedOtherScreen {
        /// Screen that became active
        screen_id: ScreenId,
        /// Reused tab
        tab_id: TabId,
    },
    /// The active tab was rebound, or a tab was opened in an empty screen.
    Applied(TabId),
}

impl RouteSyncOutcome {
    /// Returns the tab now showing the navigation target.
    #[must_use]
    pub const fn tab_id(&self) -> TabId {
        match self {
            Self::ReusedActiveScreen(tab_id)
            | Self::ReusedOtherScreen { tab_id, .. }
            | Self::Applied(tab_id) => *tab_id,
        }
    }
}

/// Maps one completed navigation onto the workspace.
///
/// Returns `None` only if the workspace has no active screen.
pub fn sync_route(store: &mut WorkspaceStore, location: &RouteLocation) -> Option<RouteSyncOutcome> {
    let route = location.route();
    let active_screen_id = store.active_screen_id()?;

    let in_active = store
        .screen(active_screen_id)
        .and_then(|screen| screen.find_tab_by_path(&route))
        .map(|tab| tab.id);
    if let Some(tab_id) = in_active {
        store.activate_route_tab(active_screen_id, tab_id, location)?;
        return Some(RouteSyncOutcome::ReusedActiveScreen(tab_id));
    }

    let elsewhere = store
        .screens()
        .filter(|screen| screen.id != active_screen_id)
        .find_map(|screen| screen.find_tab_by_path(&route).map(|tab| (screen.id, tab.id)));
    if let Some((screen_id, tab_id)) = elsewhere {
        store.activate_route_tab(screen_id, tab_id, location)?;
        return Some(RouteSyncOutcome::ReusedOtherScreen { screen_id, tab_id });
    }

    store
        .set_active_route_tab(location, TabOverrides::none())
        .map(|tab| RouteSyncOutcome::Applied(tab.id))
}

/// Feeds router navigations into a [`WorkspaceStore`].
#[derive(Debug)]
pub struct RouteSyncAdapter {
    gate: BootstrapGate,
    bootstrapped: bool,
}

impl RouteSyncAdapter {
    /// Creates an adapter that waits for `gate` before the first navigation.
    #[must_use]
    pub fn new(gate: BootstrapGate) -> Self {
        Self {
            gate,
            bootstrapped: false,
        }
    }

    /// Handles one completed navigation.
    ///
    /// The first call waits for the bootstrap gate.
    ///
    /// # Errors
    ///
    /// Returns an error if the bootstrap was abandoned.
    pub async fn handle_navigation(
        &mut self,
        store: &mut WorkspaceStore,
        location: &RouteLocation,
    ) -> Result<Option<RouteSyncOutcome>, NavigationError> {
        self.ensure_bootstrapped().await?;
        let _span =
            crate::trace_operation!(span_names::ROUTE_SYNC, route = %location.full_path).entered();
        let outcome = sync_route(store, location);
        debug!(route = %location.full_path, ?outcome, "Navigation synced");
        Ok(outcome)
    }

    /// Navigates the router and updates the workspace with the result.
    ///
    /// With `open_in_new_tab` (a modifier-click) a new tab is opened in the
    /// active screen; otherwise the active tab follows the navigation.
    ///
    /// # Errors
    ///
    /// Returns the router's error if the navigation failed.
    pub async fn navigate(
        &mut self,
        store: &mut WorkspaceStore,
        router: &dyn Router,
        to: &str,
        open_in_new_tab: bool,
    ) -> Result<Option<TabId>, NavigationError> {
        let location = router.push(to).await?;
        if open_in_new_tab {
            let Some(screen_id) = store.active_screen_id() else {
                return Ok(None);
            };
            return Ok(store
                .open_route_tab(screen_id, &location, TabOverrides::none())
                .map(|tab| tab.id));
        }
        Ok(store
            .set_active_route_tab(&location, TabOverrides::none())
            .map(|tab| tab.id))
    }

    /// Processes navigation events until the stream ends. Returns how many
    /// events were handled.
    ///
    /// # Errors
    ///
    /// Returns an error if the bootstrap was abandoned.
    pub async fn run<S>(
        &mut self,
        store: &mut WorkspaceStore,
        mut events: S,
    ) -> Result<usize, NavigationError>
    where
        S: Stream<Item = RouteLocation> + Unpin,
    {
        let mut handled = 0;
        while let Some(location) = events.next().await {
            self.handle_navigation(store, &location).await?;
            handled += 1;
        }
        Ok(handled)
    }

    async fn ensure_bootstrapped(&mut self) -> Result<(), NavigationError> {
        if self.bootstrapped {
            return Ok(());
        }
        self.gate.wait().await?;
        self.bootstrapped = true;
        info!("Session bootstrap complete, router sync enabled");
        Ok(())
    }
}
