//! Panedeck CLI - Command-line interface for Panedeck workspaces
//!
//! Inspects and edits the workspace stored in the file store: screens,
//! their tabs, widths and the active selection. `watch` follows changes
//! made by other processes sharing the store.

mod cli;
mod commands;
mod error;
mod router;
mod util;

use clap::Parser;
use cli::Cli;
use panedeck_core::tracing::{TracingConfig, TracingLevel, init_tracing};
use util::Context;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if cli.verbose > 0 && !cli.quiet {
        let level = TracingLevel::Warn.more_verbose(cli.verbose);
        if let Err(e) = init_tracing(&TracingConfig::new().with_level(level)) {
            eprintln!("Failed to initialize logging: {e}");
        }
    }

    let ctx = Context {
        config_dir: cli.config,
        store_dir: cli.store,
        quiet: cli.quiet,
    };
    let result = commands::dispatch(&ctx, cli.command).await;

    if let Err(e) = result {
        if !ctx.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(e.exit_code());
    }
}
