//! Compiler configuration, loaded from a JSON file or from the environment.

use crate::namespaces::Namespaces;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Environment variable holding the unit conversion property id.
pub const SI_CONVERSION_PROPERTY_ENV: &str = "QUERY_BUILDER_SI_CONVERSION_PROPERTY";
/// Environment variable holding the subclass property map as a JSON object.
pub const SUBCLASS_PROPERTY_MAP_ENV: &str = "QUERY_BUILDER_SUBCLASS_PROPERTY_MAP";

/// Key of the fallback entry in the subclass property map.
pub const DEFAULT_SUBCLASS_KEY: &str = "default";

const DEFAULT_LABEL_LANGUAGE: &str = "[AUTO_LANGUAGE]";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file does not exist: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("Cannot read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid value in environment variable {name}: {source}")]
    InvalidEnv {
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Property for conversion to SI units has to be defined")]
    MissingConversionProperty,

    #[error("No subclass property configured for {property_id} and no default entry")]
    MissingSubclassProperty { property_id: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerConfig {
    /// Property linking a unit to its coherent SI unit and conversion factor.
    #[serde(default)]
    pub si_conversion_property: Option<String>,
    /// Property id to subclass-of property id, with a `"default"` fallback.
    #[serde(default)]
    pub subclass_property_map: HashMap<String, String>,
    #[serde(default)]
    pub namespaces: Namespaces,
    #[serde(default = "default_label_language")]
    pub label_language: String,
}

fn default_label_language() -> String {
    DEFAULT_LABEL_LANGUAGE.to_string()
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            si_conversion_property: None,
            subclass_property_map: HashMap::new(),
            namespaces: Namespaces::default(),
            label_language: default_label_language(),
        }
    }
}

impl CompilerConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();

        // Check the file exists
        if !path_ref.exists() {
            return Err(ConfigError::NotFound {
                path: path_ref.to_path_buf(),
            });
        }

        // Read it
        let content = fs::read_to_string(path_ref).map_err(|source| ConfigError::Read {
            path: path_ref.to_path_buf(),
            source,
        })?;

        // Parse the JSON
        let config: CompilerConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path_ref.to_path_buf(),
                source,
            })?;

        debug!(path = %path_ref.display(), "loaded compiler config from file");
        Ok(config)
    }

    /// Reads the conversion property and subclass map from the environment.
    /// Unset variables leave the defaults in place.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = CompilerConfig::default();

        if let Some(property) = lookup(SI_CONVERSION_PROPERTY_ENV).filter(|p| !p.is_empty()) {
            config.si_conversion_property = Some(property);
        }

        // The subclass map is a JSON object, e.g. {"P31": "P279"}
        if let Some(raw_map) = lookup(SUBCLASS_PROPERTY_MAP_ENV).filter(|m| !m.is_empty()) {
            config.subclass_property_map =
                serde_json::from_str(&raw_map).map_err(|source| ConfigError::InvalidEnv {
                    name: SUBCLASS_PROPERTY_MAP_ENV,
                    source,
                })?;
        }

        debug!(
            conversion_property = ?config.si_conversion_property,
            subclass_entries = config.subclass_property_map.len(),
            "loaded compiler config from environment"
        );
        Ok(config)
    }

    pub fn with_si_conversion_property(mut self, property_id: impl Into<String>) -> Self {
        self.si_conversion_property = Some(property_id.into());
        self
    }

    pub fn with_subclass_property(
        mut self,
        property_id: impl Into<String>,
        subclass_property_id: impl Into<String>,
    ) -> Self {
        self.subclass_property_map
            .insert(property_id.into(), subclass_property_id.into());
        self
    }

    pub fn si_conversion_property(&self) -> Result<&str, ConfigError> {
        self.si_conversion_property
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or(ConfigError::MissingConversionProperty)
    }

    /// Subclass-of property for `property_id`, falling back to the `"default"` entry.
    pub fn subclass_property_for(&self, property_id: &str) -> Result<&str, ConfigError> {
        self.subclass_property_map
            .get(property_id)
            .or_else(|| self.subclass_property_map.get(DEFAULT_SUBCLASS_KEY))
            .map(String::as_str)
            .ok_or_else(|| ConfigError::MissingSubclassProperty {
                property_id: property_id.to_string(),
            })
    }
}
