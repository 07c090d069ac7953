// linkvault Settings Engine
// Loads server settings from a JSON file, layers environment overrides on top,
// and updates individual values by dot-notation key.

use std::fs;
use std::path::Path;

use crate::types::errors::SettingsError;
use crate::types::settings::ServerSettings;

/// Environment variable naming the settings file.
pub const CONFIG_PATH_VAR: &str = "LINKVAULT_CONFIG";

/// Settings file used when [`CONFIG_PATH_VAR`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "linkvault.json";

/// Prefix of environment overrides. `LINKVAULT__RATE_LIMIT__MAX_REQUESTS=10`
/// sets `rate_limit.max_requests`.
pub const ENV_OVERRIDE_PREFIX: &str = "LINKVAULT__";

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<ServerSettings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &ServerSettings;
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &str;
}

/// Settings engine backed by a JSON file on disk.
pub struct SettingsEngine {
    config_path: String,
    settings: ServerSettings,
}

impl SettingsEngine {
    /// Creates a new SettingsEngine.
    ///
    /// If `path_override` is `Some`, uses that path for the config file.
    /// Otherwise reads `LINKVAULT_CONFIG`, falling back to `linkvault.json`
    /// in the working directory.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = path_override
            .or_else(|| std::env::var(CONFIG_PATH_VAR).ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

        Self {
            config_path,
            settings: ServerSettings::default(),
        }
    }

    /// Applies `LINKVAULT__SECTION__KEY` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<usize, SettingsError> {
        self.apply_overrides(std::env::vars())
    }

    /// Applies overrides from `vars`, ignoring names without the override prefix.
    ///
    /// Values are parsed as JSON first so numbers and booleans land typed;
    /// anything that does not fit is retried as a plain string.
    /// Returns how many overrides were applied.
    pub fn apply_overrides<I>(&mut self, vars: I) -> Result<usize, SettingsError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut applied = 0;
        for (name, raw) in vars {
            let Some(rest) = name.strip_prefix(ENV_OVERRIDE_PREFIX) else {
                continue;
            };
            let key = rest.to_lowercase().replace("__", ".");

            let result = match serde_json::from_str::<serde_json::Value>(&raw) {
                Ok(parsed) => match self.set_value(&key, parsed) {
                    Err(SettingsError::InvalidValue(_)) => {
                        self.set_value(&key, serde_json::Value::String(raw.clone()))
                    }
                    other => other,
                },
                Err(_) => self.set_value(&key, serde_json::Value::String(raw.clone())),
            };
            result?;

            tracing::debug!(%key, "settings override applied from environment");
            applied += 1;
        }
        Ok(applied)
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Loads settings from the JSON config file.
    ///
    /// If the file does not exist, returns default settings.
    /// If the file exists but is malformed, returns a serialization error.
    /// Sections and keys missing from the file keep their defaults.
    fn load(&mut self) -> Result<ServerSettings, SettingsError> {
        let path = Path::new(&self.config_path);

        if !path.exists() {
            tracing::debug!(path = %self.config_path, "no settings file, using defaults");
            self.settings = ServerSettings::default();
            return Ok(self.settings.clone());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| SettingsError::IoError(format!("Failed to read config file: {}", e)))?;

        let settings: ServerSettings = serde_json::from_str(&content).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to parse config file: {}", e))
        })?;

        self.settings = settings;
        Ok(self.settings.clone())
    }

    /// Saves the current settings to the JSON config file.
    ///
    /// Creates parent directories if they don't exist.
    fn save(&self) -> Result<(), SettingsError> {
        let path = Path::new(&self.config_path);

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    SettingsError::IoError(format!("Failed to create config directory: {}", e))
                })?;
            }
        }

        let json = serde_json::to_string_pretty(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        fs::write(path, json)
            .map_err(|e| SettingsError::IoError(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Returns a reference to the current in-memory settings.
    fn get_settings(&self) -> &ServerSettings {
        &self.settings
    }

    /// Updates an individual setting by dot-notation key path.
    ///
    /// Converts the current settings to a `serde_json::Value`, navigates the
    /// dot-separated key path, updates the target value, then deserializes
    /// back into `ServerSettings`. The change is in memory only; call
    /// [`save`](SettingsEngineTrait::save) to persist it.
    ///
    /// # Examples
    /// - `"server.port"` → updates `settings.server.port`
    /// - `"rate_limit.max_requests"` → updates `settings.rate_limit.max_requests`
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError> {
        if key.is_empty() {
            return Err(SettingsError::InvalidKey("Key cannot be empty".to_string()));
        }

        let parts: Vec<&str> = key.split('.').collect();

        let mut json_value = serde_json::to_value(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        {
            let mut current = &mut json_value;
            for (i, part) in parts.iter().enumerate() {
                if i == parts.len() - 1 {
                    match current {
                        serde_json::Value::Object(map) => {
                            if !map.contains_key(*part) {
                                return Err(SettingsError::InvalidKey(format!(
                                    "Key '{}' not found in settings",
                                    key
                                )));
                            }
                            map.insert(part.to_string(), value.clone());
                        }
                        _ => {
                            return Err(SettingsError::InvalidKey(format!(
                                "Cannot navigate to key '{}': intermediate value is not an object",
                                key
                            )));
                        }
                    }
                } else {
                    current = match current.get_mut(*part) {
                        Some(v) => v,
                        None => {
                            return Err(SettingsError::InvalidKey(format!(
                                "Key '{}' not found in settings",
                                key
                            )));
                        }
                    };
                }
            }
        }

        let new_settings: ServerSettings = serde_json::from_value(json_value).map_err(|e| {
            SettingsError::InvalidValue(format!("Invalid value for key '{}': {}", key, e))
        })?;

        self.settings = new_settings;
        Ok(())
    }

    /// Returns the path to the config file.
    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}
