use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::kernel::constants;
use crate::kernel::error::Result;
use crate::storage::error::StorageSystemError;
use crate::storage::StorageProvider;

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
}

/// Framework configuration.
///
/// Every field has a default, so an empty document (or a missing file) yields
/// [`FrameworkConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameworkConfig {
    /// Extension of the entry descriptor searched for during bootstrap
    pub entry_extension: String,
    /// Module lists keyed by manager class name, replacing the manager's defaults
    pub managers: BTreeMap<String, Vec<String>>,
}

impl Default for FrameworkConfig {
    fn default() -> Self {
        Self {
            entry_extension: constants::DEFAULT_ENTRY_EXTENSION.to_string(),
            managers: BTreeMap::new(),
        }
    }
}

impl FrameworkConfig {
    /// Configured module list for a manager class, if any
    pub fn modules_for(&self, manager_class: &str) -> Option<&[String]> {
        self.managers.get(manager_class).map(Vec::as_slice)
    }

    /// Serialize to string based on format
    pub fn serialize(&self, format: ConfigFormat) -> Result<String> {
        let serialized = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self)
                .map_err(|e| serialization_error("json", e)),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::to_string(self)
                .map_err(|e| serialization_error("yaml", e)),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::to_string_pretty(self)
                .map_err(|e| serialization_error("toml", e)),
        };
        Ok(serialized?)
    }

    /// Deserialize from string based on format
    pub fn deserialize(data: &str, format: ConfigFormat) -> Result<Self> {
        let parsed = match format {
            ConfigFormat::Json => serde_json::from_str(data)
                .map_err(|e| deserialization_error("json", e)),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(data)
                .map_err(|e| deserialization_error("yaml", e)),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(data)
                .map_err(|e| deserialization_error("toml", e)),
        };
        Ok(parsed?)
    }

    /// Load configuration through a storage provider.
    ///
    /// A missing file yields the defaults; an unknown extension is an error.
    pub fn load(provider: &dyn StorageProvider, path: &Path) -> Result<Self> {
        let format = ConfigFormat::from_path(path)
            .ok_or_else(|| StorageSystemError::UnsupportedConfigFormat(path.to_path_buf()))?;

        if !provider.exists(path) {
            log::debug!("No framework config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = provider.read_to_string(path)?;
        let config = Self::deserialize(&content, format)?;
        log::debug!("Loaded framework config from {}", path.display());
        Ok(config)
    }

    /// Save configuration through a storage provider, format chosen by extension
    pub fn save(&self, provider: &dyn StorageProvider, path: &Path) -> Result<()> {
        let format = ConfigFormat::from_path(path)
            .ok_or_else(|| StorageSystemError::UnsupportedConfigFormat(path.to_path_buf()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            provider.create_dir_all(parent)?;
        }
        let content = self.serialize(format)?;
        provider.write_string(path, &content)
    }
}

fn serialization_error<E>(format: &str, source: E) -> StorageSystemError
where
    E: std::error::Error + Send + Sync + 'static,
{
    StorageSystemError::SerializationError {
        format: format.to_string(),
        source: Box::new(source),
    }
}

fn deserialization_error<E>(format: &str, source: E) -> StorageSystemError
where
    E: std::error::Error + Send + Sync + 'static,
{
    StorageSystemError::DeserializationError {
        format: format.to_string(),
        source: Box::new(source),
    }
}
