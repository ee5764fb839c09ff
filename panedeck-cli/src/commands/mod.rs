//! Command handler modules for the CLI.

mod open;
mod reset;
mod screen;
mod show;
mod tab;
mod watch;

use crate::cli::Commands;
use crate::error::CliError;
use crate::util::Context;

/// Dispatch a CLI command to the appropriate handler.
pub async fn dispatch(ctx: &Context, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Show { format } => show::cmd_show(ctx, format),
        Commands::Open {
            route,
            title,
            icon,
            new_tab,
        } => {
            open::cmd_open(
                ctx,
                open::OpenParams {
                    route: &route,
                    title: title.as_deref(),
                    icon: icon.as_deref(),
                    new_tab,
                },
            )
            .await
        }
        Commands::Split => screen::cmd_split(ctx),
        Commands::CloseScreen { screen } => screen::cmd_close_screen(ctx, &screen),
        Commands::Resize { screen, delta } => screen::cmd_resize(ctx, &screen, delta),
        Commands::CloseTab { tab } => tab::cmd_close_tab(ctx, &tab),
        Commands::Activate { tab } => tab::cmd_activate(ctx, &tab),
        Commands::Move {
            tab,
            screen,
            index,
            clone,
        } => tab::cmd_move(ctx, &tab, &screen, index, clone),
        Commands::Rename { tab, title } => tab::cmd_rename(ctx, &tab, &title),
        Commands::Reset => reset::cmd_reset(ctx),
        Commands::Watch => watch::cmd_watch(ctx).await,
    }
}

/// Prints an informational line unless `--quiet` was given.
fn report(ctx: &Context, message: impl std::fmt::Display) {
    if !ctx.quiet {
        println!("{message}");
    }
}
