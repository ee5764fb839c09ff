//! Loading and saving of the settings file

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::settings::WorkspaceSettings;
use crate::error::{ConfigError, ConfigResult};
use crate::tracing::span_names;

const APP_DIR: &str = "panedeck";
const SETTINGS_FILE: &str = "settings.toml";
const STORAGE_SUBDIR: &str = "workspace";

/// Resolves, reads and writes `settings.toml`.
#[derive(Debug, Clone)]
pub struct SettingsManager {
    config_dir: PathBuf,
}

impl SettingsManager {
    /// Uses the platform configuration directory
    /// (`$XDG_CONFIG_HOME/panedeck` on Linux).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoConfigDir`] if the platform has none.
    pub fn new() -> ConfigResult<Self> {
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::with_config_dir(base.join(APP_DIR)))
    }

    /// Uses `config_dir` instead of the platform directory.
    #[must_use]
    pub fn with_config_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// Returns the configuration directory.
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Returns the settings file path.
    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE)
    }

    /// Loads and validates the settings. A missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML or
    /// holds out-of-range values.
    pub fn load(&self) -> ConfigResult<WorkspaceSettings> {
        let _span = crate::trace_operation!(span_names::CONFIG_LOAD).entered();
        let path = self.settings_path();
        let settings = match fs::read_to_string(&path) {
            Ok(text) => WorkspaceSettings::from_toml(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No settings file, using defaults");
                WorkspaceSettings::default()
            }
            Err(source) => return Err(ConfigError::Io { path, source }),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Validates and writes the settings, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if validation, encoding or writing fails.
    pub fn save(&self, settings: &WorkspaceSettings) -> ConfigResult<()> {
        let _span = crate::trace_operation!(span_names::CONFIG_SAVE).entered();
        settings.validate()?;
        let text = settings.to_toml()?;
        fs::create_dir_all(&self.config_dir).map_err(|source| ConfigError::Io {
            path: self.config_dir.clone(),
            source,
        })?;
        let path = self.settings_path();
        fs::write(&path, text).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "Settings saved");
        Ok(())
    }

    /// Returns the directory the file store should use: the configured one,
    /// or `panedeck/workspace` under the platform data directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoConfigDir`] if nothing is configured and the
    /// platform has no data directory.
    pub fn storage_dir(settings: &WorkspaceSettings) -> ConfigResult<PathBuf> {
        if let Some(dir) = &settings.storage_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|base| base.join(APP_DIR).join(STORAGE_SUBDIR))
            .ok_or(ConfigError::NoConfigDir)
    }
}
