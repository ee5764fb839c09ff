//! Tab commands: close, activate, move and rename.

use panedeck_core::workspace::TabOverrides;

use super::report;
use crate::error::CliError;
use crate::util::{Context, find_screen, find_tab, open_session, short_id};

/// Close tab command handler
pub fn cmd_close_tab(ctx: &Context, tab: &str) -> Result<(), CliError> {
    let mut session = open_session(ctx)?;
    let (screen_id, tab_id) = find_tab(session.store(), tab)?;
    let closed = session
        .mutate(|store| store.close_tab(screen_id, tab_id))?
        .ok_or_else(|| CliError::TabNotFound(tab.to_string()))?;

    let mut message = format!("Closed tab {} ({})", short_id(&tab_id), closed.tab.title);
    if closed.screen_removed {
        message.push_str(" and its screen");
    }
    report(ctx, message);
    Ok(())
}

/// Activate tab command handler
pub fn cmd_activate(ctx: &Context, tab: &str) -> Result<(), CliError> {
    let mut session = open_session(ctx)?;
    let (screen_id, tab_id) = find_tab(session.store(), tab)?;
    session.mutate(|store| {
        store.set_active_screen(screen_id) && store.set_active_tab(screen_id, tab_id)
    })?;
    report(ctx, format!("Activated tab {}", short_id(&tab_id)));
    Ok(())
}

/// Move tab command handler.
///
/// Moving within the same screen reorders; `--clone` copies instead and
/// may target the same screen.
pub fn cmd_move(
    ctx: &Context,
    tab: &str,
    screen: &str,
    index: Option<usize>,
    clone: bool,
) -> Result<(), CliError> {
    let mut session = open_session(ctx)?;
    let store = session.store();
    let (from_screen_id, tab_id) = find_tab(store, tab)?;
    let to_screen_id = find_screen(store, screen)?;
    let to_len = store
        .screen(to_screen_id)
        .map_or(0, panedeck_core::workspace::Screen::tab_count);
    let index = index.unwrap_or(to_len);

    if clone {
        let transfer = session
            .mutate(|store| store.clone_tab_to_screen(tab_id, from_screen_id, to_screen_id, index))?
            .ok_or_else(|| CliError::TabNotFound(tab.to_string()))?;
        report(
            ctx,
            format!(
                "Copied tab {} to screen {} as {}",
                short_id(&tab_id),
                short_id(&to_screen_id),
                short_id(&transfer.tab_id)
            ),
        );
        return Ok(());
    }

    if from_screen_id == to_screen_id {
        let from = store
            .screen(from_screen_id)
            .and_then(|s| s.tab_index(tab_id))
            .ok_or_else(|| CliError::TabNotFound(tab.to_string()))?;
        let to = index.min(to_len.saturating_sub(1));
        session.mutate(|store| store.reorder_tabs(from_screen_id, from, to))?;
        report(
            ctx,
            format!("Moved tab {} to position {to}", short_id(&tab_id)),
        );
        return Ok(());
    }

    let transfer = session
        .mutate(|store| store.move_tab_to_screen(tab_id, from_screen_id, to_screen_id, index))?
        .ok_or_else(|| CliError::TabNotFound(tab.to_string()))?;
    let mut message = format!(
        "Moved tab {} to screen {} at position {}",
        short_id(&tab_id),
        short_id(&to_screen_id),
        transfer.index
    );
    if transfer.source_screen_removed {
        message.push_str(" (emptied screen closed)");
    }
    report(ctx, message);
    Ok(())
}

/// Rename tab command handler
pub fn cmd_rename(ctx: &Context, tab: &str, title: &str) -> Result<(), CliError> {
    if title.trim().is_empty() {
        return Err(CliError::Rejected("Tab title cannot be empty".to_string()));
    }
    let mut session = open_session(ctx)?;
    let (_, tab_id) = find_tab(session.store(), tab)?;
    let renamed = session
        .mutate(|store| store.update_tab(tab_id, TabOverrides::none().with_title(title)).is_some())?;
    if !renamed {
        return Err(CliError::TabNotFound(tab.to_string()));
    }
    report(ctx, format!("Renamed tab {} to '{title}'", short_id(&tab_id)));
    Ok(())
}
