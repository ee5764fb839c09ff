//! Shared utility functions used across command modules.

use std::path::{Path, PathBuf};

use panedeck_core::config::{SettingsManager, WorkspaceSettings};
use panedeck_core::persistence::{FileStore, PersistenceAdapter, WorkspaceSession};
use panedeck_core::workspace::{MetaBagResolver, ScreenId, TabId, UuidSource, WorkspaceStore};
use tracing::debug;

use crate::error::CliError;

/// Global options shared by every command.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Custom configuration directory
    pub config_dir: Option<PathBuf>,
    /// Custom store directory
    pub store_dir: Option<PathBuf>,
    /// Whether informational output is suppressed
    pub quiet: bool,
}

/// Creates a `SettingsManager` using the optional custom config directory
/// from CLI args.
pub fn create_settings_manager(config_dir: Option<&Path>) -> Result<SettingsManager, CliError> {
    match config_dir {
        Some(path) => Ok(SettingsManager::with_config_dir(path)),
        None => SettingsManager::new()
            .map_err(|e| CliError::Config(format!("Failed to initialize settings: {e}"))),
    }
}

/// Loads the settings for this invocation.
pub fn load_settings(ctx: &Context) -> Result<WorkspaceSettings, CliError> {
    Ok(create_settings_manager(ctx.config_dir.as_deref())?.load()?)
}

/// Opens the file store named by `--store` or the settings.
pub fn open_file_store(
    ctx: &Context,
    settings: &WorkspaceSettings,
) -> Result<FileStore, CliError> {
    let dir = match &ctx.store_dir {
        Some(dir) => dir.clone(),
        None => SettingsManager::storage_dir(settings)?,
    };
    debug!(dir = %dir.display(), "Opening workspace store");
    Ok(FileStore::open(dir)?)
}

/// Builds an empty store configured from the settings.
pub fn new_store(settings: &WorkspaceSettings) -> WorkspaceStore {
    WorkspaceStore::with_sources(UuidSource, MetaBagResolver::default())
        .with_min_width_percent(settings.min_screen_width_percent)
}

/// Opens the stored workspace.
pub fn open_session(ctx: &Context) -> Result<WorkspaceSession<FileStore>, CliError> {
    let settings = load_settings(ctx)?;
    let files = open_file_store(ctx, &settings)?;
    let adapter = PersistenceAdapter::with_key(files, settings.storage_key.clone());
    let (session, outcome) = WorkspaceSession::open(new_store(&settings), adapter)?;
    debug!(?outcome, "Workspace loaded");
    Ok(session)
}

/// Matches `query` against a list of ids, by full id or unique prefix.
fn match_id<T: Copy + ToString>(
    kind: &'static str,
    ids: impl IntoIterator<Item = T>,
    query: &str,
) -> Result<Option<T>, CliError> {
    let query = query.trim().to_lowercase();
    let matches: Vec<T> = ids
        .into_iter()
        .filter(|id| id.to_string().starts_with(&query))
        .collect();

    match matches.len() {
        0 => Ok(None),
        1 => Ok(Some(matches[0])),
        _ => {
            if let Some(exact) = matches.iter().find(|id| id.to_string() == query) {
                return Ok(Some(*exact));
            }
            let ids: Vec<String> = matches.iter().map(ToString::to_string).collect();
            Err(CliError::Ambiguous {
                kind,
                prefix: query,
                matches: ids.join(", "),
            })
        }
    }
}

/// Find a screen by id or unique id prefix
pub fn find_screen(store: &WorkspaceStore, query: &str) -> Result<ScreenId, CliError> {
    match_id("screen", store.screen_ids(), query)?
        .ok_or_else(|| CliError::ScreenNotFound(query.to_string()))
}

/// Find a tab by id or unique id prefix, with the screen holding it
pub fn find_tab(store: &WorkspaceStore, query: &str) -> Result<(ScreenId, TabId), CliError> {
    let tabs: Vec<TabId> = store.screens().flat_map(|s| s.tab_ids()).collect();
    let tab_id =
        match_id("tab", tabs, query)?.ok_or_else(|| CliError::TabNotFound(query.to_string()))?;
    store
        .screen_of_tab(tab_id)
        .map(|screen_id| (screen_id, tab_id))
        .ok_or_else(|| CliError::TabNotFound(query.to_string()))
}

/// Shortens an id for table output.
pub fn short_id(id: &impl ToString) -> String {
    id.to_string().chars().take(8).collect()
}
