//! Show workspace command.

use panedeck_core::persistence::PersistedSnapshot;
use panedeck_core::workspace::WorkspaceStore;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::util::{Context, open_session, short_id};

/// Show workspace command handler
pub fn cmd_show(ctx: &Context, format: OutputFormat) -> Result<(), CliError> {
    let session = open_session(ctx)?;
    match format {
        OutputFormat::Table => print!("{}", render_table(session.store())),
        OutputFormat::Json => println!("{}", render_json(session.store())?),
    }
    Ok(())
}

/// Renders one block per screen; `*` marks the active screen and the
/// active tab of each screen.
pub fn render_table(store: &WorkspaceStore) -> String {
    use std::fmt::Write as _;

    let active_screen = store.active_screen_id();
    let mut out = String::new();
    for (position, screen) in store.screens().enumerate() {
        let marker = if Some(screen.id) == active_screen { '*' } else { ' ' };
        let _ = writeln!(
            out,
            "{marker} Screen {} [{}] {:>5.1}%  {} tab(s)",
            position + 1,
            short_id(&screen.id),
            store.screen_width(screen.id).unwrap_or_default(),
            screen.tab_count()
        );
        for tab in screen.tabs() {
            let marker = if screen.active_tab_id() == Some(tab.id) { '*' } else { ' ' };
            let _ = writeln!(
                out,
                "    {marker} {} {:<24} {}",
                short_id(&tab.id),
                tab.title,
                tab.route
            );
        }
    }
    out
}

/// Renders the workspace snapshot as pretty JSON.
pub fn render_json(store: &WorkspaceStore) -> Result<String, CliError> {
    let snapshot = PersistedSnapshot::from_workspace(store.workspace());
    serde_json::to_string_pretty(&snapshot)
        .map_err(|e| CliError::Storage(format!("Failed to serialize workspace: {e}")))
}
