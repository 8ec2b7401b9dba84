//! Loading raw layer lists from configuration files
//!
//! The engine itself never touches the filesystem during resolution; this
//! module is the thin adapter that materializes a `Vec<RawLayer>` from a
//! layer file before loading begins. Supported formats:
//!
//! - JSON (`.json`): a top-level array of layer objects
//! - YAML (`.yaml`, `.yml`): a top-level sequence of layer mappings
//! - TOML (`.toml`): a top-level `layers` array of tables
//!
//! Validation of the layers themselves happens later, in
//! [`crate::layer::Layer::normalize`]; this module only reports I/O and
//! syntax errors.

use crate::error::ConfigError;
use crate::layer::RawLayer;
use crate::result::Result;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// TOML cannot express a top-level array, so layers nest under a key
#[derive(Debug, Deserialize)]
struct TomlLayerFile {
    layers: Vec<RawLayer>,
}

/// Loader for layer list files
pub struct LayerLoader;

impl LayerLoader {
    /// Load a raw layer list from a file, dispatching on its extension
    pub fn from_file(path: &Path) -> Result<Vec<RawLayer>> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;

        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let layers = match extension.as_str() {
            "json" => Self::parse_json(path, &content)?,
            "yaml" | "yml" => Self::parse_yaml(path, &content)?,
            "toml" => Self::parse_toml(path, &content)?,
            other => {
                return Err(ConfigError::parse_error(
                    path,
                    format!("unsupported layer file extension '{other}' (expected json, yaml, yml, or toml)"),
                ));
            }
        };

        debug!(path = %path.display(), layers = layers.len(), "layer file parsed");
        Ok(layers)
    }

    /// Parse a JSON array of layer objects
    pub fn from_json_str(content: &str) -> Result<Vec<RawLayer>> {
        Self::parse_json(Path::new("<json>"), content)
    }

    /// Parse a YAML sequence of layer mappings
    pub fn from_yaml_str(content: &str) -> Result<Vec<RawLayer>> {
        Self::parse_yaml(Path::new("<yaml>"), content)
    }

    /// Parse a TOML document with a top-level `layers` array of tables
    pub fn from_toml_str(content: &str) -> Result<Vec<RawLayer>> {
        Self::parse_toml(Path::new("<toml>"), content)
    }

    fn parse_json(path: &Path, content: &str) -> Result<Vec<RawLayer>> {
        serde_json::from_str(content).map_err(|e| ConfigError::parse_error(path, e.to_string()))
    }

    fn parse_yaml(path: &Path, content: &str) -> Result<Vec<RawLayer>> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::parse_error(path, e.to_string()))
    }

    fn parse_toml(path: &Path, content: &str) -> Result<Vec<RawLayer>> {
        let file: TomlLayerFile =
            toml::from_str(content).map_err(|e| ConfigError::parse_error(path, e.to_string()))?;
        Ok(file.layers)
    }
}
