//! Configuration module for mfbatch
//!
//! Settings live in `config.toml` under the user's config directory
//! (`~/.config/mfbatch/config.toml` on Linux). Every setting can be
//! overridden with an `MFBATCH_` environment variable, e.g.
//! `MFBATCH_METAFLAC_PATH=/opt/flac/bin/metaflac`.

use std::fs;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

/// Batchfile name used when none is configured
pub const DEFAULT_BATCHFILE: &str = "MFBATCH_LIST";

/// Keys accepted by `config get` and `config set`
pub const KEYS: [&str; 6] = [
    "metaflac_path",
    "batchfile",
    "extensions",
    "editor",
    "wrap_width",
    "quiet",
];

fn default_batchfile() -> String {
    DEFAULT_BATCHFILE.to_string()
}

fn default_extensions() -> Vec<String> {
    vec!["flac".to_string()]
}

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MfbatchConfig {
    /// `metaflac` executable, looked up on `PATH` when unset
    #[serde(default)]
    pub metaflac_path: Option<PathBuf>,

    /// Batchfile read by `write` and produced by `create`
    #[serde(default = "default_batchfile")]
    pub batchfile: String,

    /// File extensions picked up by `create`, without the dot
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Editor for `edit`, before `$EDITOR` and `$VISUAL`
    #[serde(default)]
    pub editor: Option<String>,

    /// Preview width, the terminal width when unset
    #[serde(default)]
    pub wrap_width: Option<usize>,

    /// Suppress informational output by default
    #[serde(default)]
    pub quiet: bool,
}

impl Default for MfbatchConfig {
    fn default() -> Self {
        Self {
            metaflac_path: None,
            batchfile: default_batchfile(),
            extensions: default_extensions(),
            editor: None,
            wrap_width: None,
            quiet: false,
        }
    }
}

impl MfbatchConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;

        Ok(config_dir.join("mfbatch").join("config.toml"))
    }

    /// Load configuration from the default location
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path` and the `MFBATCH_` environment.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file or an override cannot be parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix("MFBATCH")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("extensions"),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Save configuration to the default location
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config directory cannot be determined or
    /// the file cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the parent directory cannot be created, the configuration
    /// cannot be serialized to TOML, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// `metaflac` program to run
    #[must_use]
    pub fn metaflac_program(&self) -> PathBuf {
        self.metaflac_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(crate::tags::DEFAULT_PROGRAM))
    }

    /// Display value of a setting, empty when unset
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an unknown key.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        let value = match key {
            "metaflac_path" => self
                .metaflac_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            "batchfile" => self.batchfile.clone(),
            "extensions" => self.extensions.join(","),
            "editor" => self.editor.clone().unwrap_or_default(),
            "wrap_width" => self.wrap_width.map(|w| w.to_string()).unwrap_or_default(),
            "quiet" => self.quiet.to_string(),
            _ => return Err(unknown_key(key)),
        };
        Ok(value)
    }

    /// Change a setting from its text form. An empty value clears optional settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an unknown key or a value of the wrong type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match key {
            "metaflac_path" => self.metaflac_path = non_empty(value).map(PathBuf::from),
            "batchfile" => {
                if value.is_empty() {
                    return Err(ConfigError::Message("batchfile cannot be empty".to_string()));
                }
                self.batchfile = value.to_string();
            }
            "extensions" => {
                let extensions: Vec<String> = value
                    .split(',')
                    .map(|e| e.trim().trim_start_matches('.').to_string())
                    .filter(|e| !e.is_empty())
                    .collect();
                if extensions.is_empty() {
                    return Err(ConfigError::Message(
                        "extensions needs at least one entry".to_string(),
                    ));
                }
                self.extensions = extensions;
            }
            "editor" => self.editor = non_empty(value).map(str::to_string),
            "wrap_width" => {
                self.wrap_width = match non_empty(value) {
                    Some(v) => Some(v.parse().map_err(|_| {
                        ConfigError::Message(format!("Invalid value for wrap_width: '{v}'"))
                    })?),
                    None => None,
                };
            }
            "quiet" => {
                self.quiet = value.parse().map_err(|_| {
                    ConfigError::Message(format!(
                        "Invalid value for quiet: '{value}'. Use 'true' or 'false'"
                    ))
                })?;
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

fn unknown_key(key: &str) -> ConfigError {
    ConfigError::Message(format!(
        "Unknown configuration key: '{key}'. Available keys: {}",
        KEYS.join(", ")
    ))
}
