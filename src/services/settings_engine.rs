// Gove Settings Engine
// Loads, saves, updates and resets the shell settings.
// Settings are stored as a JSON file at the platform-specific config path.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::ShellSettings;

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<ShellSettings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &ShellSettings;
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &Path;
}

/// Settings engine implementation that persists settings as JSON on disk.
pub struct SettingsEngine {
    config_path: PathBuf,
    settings: ShellSettings,
}

impl SettingsEngine {
    /// Creates a new SettingsEngine.
    ///
    /// If `path_override` is `Some`, uses that path for the config file.
    /// Otherwise, uses the platform-specific config directory with `settings.json`.
    pub fn new(path_override: Option<PathBuf>) -> Self {
        let config_path =
            path_override.unwrap_or_else(|| platform::get_config_dir().join("settings.json"));

        Self {
            config_path,
            settings: ShellSettings::default(),
        }
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Loads settings from the JSON config file.
    ///
    /// A missing file yields defaults; a malformed one is a serialization error.
    /// Fields absent from the file take their default values.
    fn load(&mut self) -> Result<ShellSettings, SettingsError> {
        let path = self.config_path.as_path();

        if !path.exists() {
            debug!(path = %path.display(), "no settings file, using defaults");
            self.settings = ShellSettings::default();
            return Ok(self.settings.clone());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| SettingsError::Io(format!("Failed to read config file: {}", e)))?;

        let settings: ShellSettings = serde_json::from_str(&content).map_err(|e| {
            SettingsError::Serialization(format!("Failed to parse config file: {}", e))
        })?;

        debug!(path = %path.display(), "settings file parsed");
        self.settings = settings;
        Ok(self.settings.clone())
    }

    /// Saves the current settings, creating parent directories if needed.
    fn save(&self) -> Result<(), SettingsError> {
        let path = self.config_path.as_path();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SettingsError::Io(format!("Failed to create config directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(&self.settings).map_err(|e| {
            SettingsError::Serialization(format!("Failed to serialize settings: {}", e))
        })?;

        fs::write(path, json)
            .map_err(|e| SettingsError::Io(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    fn get_settings(&self) -> &ShellSettings {
        &self.settings
    }

    /// Updates one top-level setting by key, validates it by round-tripping
    /// through `ShellSettings`, then saves to disk.
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError> {
        let mut json_value = serde_json::to_value(&self.settings).map_err(|e| {
            SettingsError::Serialization(format!("Failed to serialize settings: {}", e))
        })?;

        match json_value.as_object_mut() {
            Some(map) if map.contains_key(key) => {
                map.insert(key.to_string(), value);
            }
            _ => {
                return Err(SettingsError::Serialization(format!(
                    "Key '{}' not found in settings",
                    key
                )));
            }
        }

        let new_settings: ShellSettings = serde_json::from_value(json_value).map_err(|e| {
            SettingsError::Serialization(format!("Invalid value for key '{}': {}", key, e))
        })?;

        self.settings = new_settings;
        self.save()
    }

    /// Resets all settings to factory defaults and saves to disk.
    fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = ShellSettings::default();
        self.save()
    }

    fn get_config_path(&self) -> &Path {
        &self.config_path
    }
}
