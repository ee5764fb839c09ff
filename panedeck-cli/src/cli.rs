//! CLI argument parsing types using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Panedeck command-line interface for inspecting and editing a stored
/// workspace
#[derive(Parser)]
#[command(name = "panedeck-cli")]
#[command(author, version, about = "Panedeck command-line interface")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration directory
    #[arg(short, long, global = true, env = "PANEDECK_CONFIG_DIR")]
    pub config: Option<PathBuf>,

    /// Directory of the workspace store (overrides the settings file)
    #[arg(short, long, global = true, env = "PANEDECK_STORE_DIR")]
    pub store: Option<PathBuf>,

    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show the screens and their tabs
    #[command(about = "Show the stored workspace")]
    Show {
        /// Output format
        #[arg(short, long, default_value = "table", value_enum)]
        format: OutputFormat,
    },

    /// Navigate to a route
    #[command(about = "Open a route in the active screen")]
    Open {
        /// Route path, e.g. /users?sort=name
        route: String,

        /// Tab title (defaults to the route's title)
        #[arg(short, long)]
        title: Option<String>,

        /// Tab icon
        #[arg(short, long)]
        icon: Option<String>,

        /// Open in a new tab instead of reusing the active one
        #[arg(short, long)]
        new_tab: bool,
    },

    /// Add a screen holding a copy of the active tab
    #[command(about = "Split the workspace into one more screen")]
    Split,

    /// Close a screen
    #[command(name = "close-screen", about = "Close a screen and its tabs")]
    CloseScreen {
        /// Screen id or unique id prefix
        screen: String,
    },

    /// Close a tab
    #[command(name = "close-tab", about = "Close a tab")]
    CloseTab {
        /// Tab id or unique id prefix
        tab: String,
    },

    /// Focus a tab and its screen
    #[command(about = "Make a tab and its screen active")]
    Activate {
        /// Tab id or unique id prefix
        tab: String,
    },

    /// Move or copy a tab into a screen
    #[command(about = "Move a tab to a screen (or reorder within its screen)")]
    Move {
        /// Tab id or unique id prefix
        tab: String,

        /// Destination screen id or unique id prefix
        screen: String,

        /// Position in the destination (defaults to the end)
        #[arg(long)]
        index: Option<usize>,

        /// Copy the tab instead of moving it
        #[arg(long)]
        clone: bool,
    },

    /// Move the divider right of a screen
    #[command(about = "Resize a screen against its right neighbour")]
    Resize {
        /// Screen id or unique id prefix
        screen: String,

        /// Width change in percentage points (negative shrinks)
        #[arg(allow_hyphen_values = true)]
        delta: f64,
    },

    /// Change a tab's title
    #[command(about = "Rename a tab")]
    Rename {
        /// Tab id or unique id prefix
        tab: String,

        /// New title
        title: String,
    },

    /// Reset to a single empty screen
    #[command(about = "Discard all screens and tabs")]
    Reset,

    /// Print changes written by other processes
    #[command(about = "Follow changes made to the workspace by other processes")]
    Watch,
}

/// Output format for `show`
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Display as formatted table
    Table,
    /// Output as JSON
    Json,
}
