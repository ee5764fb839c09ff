//! Reset workspace command.

use super::report;
use crate::error::CliError;
use crate::util::{Context, open_session};

/// Reset command handler
pub fn cmd_reset(ctx: &Context) -> Result<(), CliError> {
    let mut session = open_session(ctx)?;
    session.mutate(|store| store.reset())?;
    report(ctx, "Workspace reset to a single empty screen");
    Ok(())
}
