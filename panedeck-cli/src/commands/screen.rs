//! Screen commands: split, close and resize.

use super::report;
use crate::error::CliError;
use crate::util::{Context, find_screen, open_session, short_id};

/// Split command handler
pub fn cmd_split(ctx: &Context) -> Result<(), CliError> {
    let mut session = open_session(ctx)?;
    let (screen_id, tabs) = session.mutate(|store| {
        let screen = store.add_screen(Vec::new(), None);
        (screen.id, screen.tab_count())
    })?;
    report(
        ctx,
        format!("Added screen {} with {tabs} tab(s)", short_id(&screen_id)),
    );
    Ok(())
}

/// Close screen command handler
pub fn cmd_close_screen(ctx: &Context, screen: &str) -> Result<(), CliError> {
    let mut session = open_session(ctx)?;
    let screen_id = find_screen(session.store(), screen)?;
    let removed = session
        .mutate(|store| store.remove_screen(screen_id))?
        .ok_or_else(|| CliError::Rejected("The last screen cannot be closed".to_string()))?;
    report(
        ctx,
        format!(
            "Closed screen {} and {} tab(s)",
            short_id(&removed.id),
            removed.tab_count()
        ),
    );
    Ok(())
}

/// Resize command handler: moves the divider right of `screen` by `delta`
/// percentage points.
pub fn cmd_resize(ctx: &Context, screen: &str, delta: f64) -> Result<(), CliError> {
    if !delta.is_finite() {
        return Err(CliError::Rejected(format!("Invalid width change: {delta}")));
    }
    let mut session = open_session(ctx)?;
    let store = session.store();
    let screen_id = find_screen(store, screen)?;
    let next_screen_id = store.next_screen_id(screen_id).ok_or_else(|| {
        CliError::Rejected(format!(
            "Screen {} has no right neighbour to resize against",
            short_id(&screen_id)
        ))
    })?;
    let start = store.screen_width(screen_id).unwrap_or_default();
    let start_next = store.screen_width(next_screen_id).unwrap_or_default();

    let width = session
        .mutate(|store| store.resize_screens(screen_id, next_screen_id, delta, start, start_next))?
        .ok_or_else(|| CliError::Rejected("Screens have no width to share".to_string()))?;
    report(
        ctx,
        format!("Screen {} is now {width:.1}% wide", short_id(&screen_id)),
    );
    Ok(())
}
