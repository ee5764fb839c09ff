//! Open route command.

use panedeck_core::route_sync::{BootstrapGate, Router, RouteSyncAdapter};
use panedeck_core::workspace::TabOverrides;
use tracing::debug;

use super::report;
use crate::error::CliError;
use crate::router::PathRouter;
use crate::util::{Context, open_session, short_id};

/// Parameters for the open command
pub struct OpenParams<'a> {
    pub route: &'a str,
    pub title: Option<&'a str>,
    pub icon: Option<&'a str>,
    pub new_tab: bool,
}

/// Open route command handler
pub async fn cmd_open(ctx: &Context, params: OpenParams<'_>) -> Result<(), CliError> {
    let (mut store, persistence) = open_session(ctx)?.into_parts();

    let router = PathRouter::at(store.active_tab().map(|tab| &tab.route));
    debug!(
        from = %router.current_route().full_path,
        to = params.route,
        new_tab = params.new_tab,
        "Navigating"
    );

    // The workspace is already loaded, nothing to wait for
    let mut sync = RouteSyncAdapter::new(BootstrapGate::opened());
    let tab_id = sync
        .navigate(&mut store, &router, params.route, params.new_tab)
        .await?
        .ok_or_else(|| CliError::Rejected("No active screen to open the route in".to_string()))?;

    let mut overrides = TabOverrides::none();
    if let Some(title) = params.title {
        overrides = overrides.with_title(title);
    }
    if let Some(icon) = params.icon {
        overrides = overrides.with_icon(icon);
    }
    if !overrides.is_empty() {
        store.update_tab(tab_id, overrides);
    }

    persistence.persist(&store)?;

    if let Some((_, tab)) = store.find_tab(tab_id) {
        report(
            ctx,
            format!("Opened '{}' in tab {}", tab.route, short_id(&tab.id)),
        );
    }
    Ok(())
}
