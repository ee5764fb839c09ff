//! Watch command: follows changes written by other processes.

use panedeck_core::persistence::{ExternalChangeOutcome, IgnoreReason};
use tracing::{debug, info};

use super::report;
use super::show::render_table;
use crate::error::CliError;
use crate::util::{Context, open_session};

/// Watch command handler. Runs until interrupted.
pub async fn cmd_watch(ctx: &Context) -> Result<(), CliError> {
    let mut session = open_session(ctx)?;
    let mut changes = session.persistence().storage().watch()?;
    report(ctx, render_table(session.store()));
    info!(key = session.persistence().key(), "Watching workspace");

    loop {
        tokio::select! {
            change = changes.next() => {
                let Some(change) = change else {
                    debug!("Storage watcher closed");
                    return Ok(());
                };
                match session.apply_external(&change) {
                    ExternalChangeOutcome::Applied => {
                        report(ctx, "--- workspace changed ---");
                        report(ctx, render_table(session.store()));
                    }
                    ExternalChangeOutcome::Ignored(IgnoreReason::Invalid) => {
                        eprintln!("Ignored an invalid workspace written to '{}'", change.key);
                    }
                    ExternalChangeOutcome::Ignored(reason) => {
                        debug!(?reason, key = %change.key, "Storage change ignored");
                    }
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal?;
                return Ok(());
            }
        }
    }
}
