//! Settings files driving a workspace

use panedeck_core::config::{SettingsManager, WorkspaceSettings};
use panedeck_core::error::ConfigError;
use panedeck_core::tracing::TracingLevel;
use panedeck_core::workspace::{MetaBagResolver, SequentialIdSource, WorkspaceStore};
use tempfile::TempDir;

#[test]
fn saved_settings_configure_the_store() {
    let dir = TempDir::new().unwrap();
    let manager = SettingsManager::with_config_dir(dir.path());
    let settings = WorkspaceSettings {
        min_screen_width_percent: 20.0,
        log_level: TracingLevel::Debug,
        ..WorkspaceSettings::default()
    };
    manager.save(&settings).unwrap();

    let loaded = manager.load().unwrap();
    assert_eq!(loaded, settings);

    let mut store =
        WorkspaceStore::with_sources(SequentialIdSource::default(), MetaBagResolver::default())
            .with_min_width_percent(loaded.min_screen_width_percent);
    let first = store.active_screen_id().unwrap();
    let second = store.add_screen(Vec::new(), None).id;
    let applied = store.resize_screens(first, second, -45.0, 50.0, 50.0).unwrap();
    assert!((applied - 20.0).abs() < 1e-9);
}

#[test]
fn invalid_settings_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let manager = SettingsManager::with_config_dir(dir.path());
    std::fs::write(manager.settings_path(), "min_screen_width_percent = 75.0\n").unwrap();

    assert!(matches!(
        manager.load(),
        Err(ConfigError::Validation { field, .. }) if field == "min_screen_width_percent"
    ));
}
