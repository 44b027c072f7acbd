use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::kernel::constants;
use crate::storage::error::StorageSystemError;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Every extension recognized by [`ConfigFormat::from_path`]
    pub fn known_extensions() -> &'static [&'static str] {
        &[
            "json",
            #[cfg(feature = "yaml-config")]
            "yaml",
            #[cfg(feature = "yaml-config")]
            "yml",
            #[cfg(feature = "toml-config")]
            "toml",
        ]
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }

    /// Deserialize a document in this format
    pub fn parse<T: DeserializeOwned>(&self, data: &str) -> Result<T, StorageSystemError> {
        let deserialization_error = |source: Box<dyn std::error::Error + Send + Sync>| {
            StorageSystemError::DeserializationError { format: self.extension().to_uppercase(), source }
        };
        match self {
            ConfigFormat::Json => serde_json::from_str(data).map_err(|e| deserialization_error(Box::new(e))),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(data).map_err(|e| deserialization_error(Box::new(e))),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(data).map_err(|e| deserialization_error(Box::new(e))),
        }
    }

    /// Read and deserialize a file, picking the format from its extension
    pub fn read_file<T: DeserializeOwned>(path: &Path) -> Result<T, StorageSystemError> {
        let format = Self::from_path(path)
            .ok_or_else(|| StorageSystemError::UnsupportedConfigFormat(path.display().to_string()))?;
        if !path.is_file() {
            return Err(StorageSystemError::FileNotFound(path.to_path_buf()));
        }
        let data = fs::read_to_string(path)
            .map_err(|e| StorageSystemError::io(e, "read_config", path.to_path_buf()))?;
        format.parse(&data)
    }
}

/// Options of the event system
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Log "Dispatching event X" for every dispatch
    pub debug_sent: bool,
    /// Log "Calling listener L on event X" before every listener call
    pub debug_caught: bool,
    /// Run config-driven listeners after the static ones
    pub dynamic_enabled: bool,
    /// Root of the dynamic listener definitions; relative paths are resolved
    /// against the application directory
    pub dynamic_dir: Option<PathBuf>,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            debug_sent: false,
            debug_caught: false,
            dynamic_enabled: true,
            dynamic_dir: None,
        }
    }
}

impl EventsConfig {
    /// Directory holding one sub-directory of definitions per event
    pub fn dynamic_root(&self, app_dir: &Path) -> PathBuf {
        match &self.dynamic_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => app_dir.join(dir),
            None => app_dir.join(constants::DYNAMIC_EVENTS_DIR),
        }
    }
}

/// Load [`EventsConfig`] from a JSON, YAML or TOML file
pub fn load_events_config(path: &Path) -> Result<EventsConfig, StorageSystemError> {
    let config: EventsConfig = ConfigFormat::read_file(path)?;
    log::debug!("Loaded events configuration from {}: {:?}", path.display(), config);
    Ok(config)
}
