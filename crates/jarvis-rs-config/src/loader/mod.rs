//! Layered configuration loader.
//!
//! Discovers configuration layers (system/user/cwd/runtime), validates their
//! schema, merges them in precedence order, and produces a final
//! `AssistantConfig`.

mod layer_io;
mod merge;
mod schema;


use crate::{AssistantConfig, ConfigError};
use log::{debug, info};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Default config filename in local layers.
const DEFAULT_CONFIG_FILE: &str = "jarvis.json5";
/// Default config directory under the user home.
const DEFAULT_CONFIG_DIR: &str = ".jarvis";

#[cfg(unix)]
/// Default system config path on Unix.
const SYSTEM_CONFIG_PATH: &str = "/etc/jarvis/jarvis.json5";
#[cfg(windows)]
/// Default system config path on Windows.
const SYSTEM_CONFIG_PATH: &str = "C:\\ProgramData\\jarvis\\jarvis.json5";

/// Effective config plus metadata about which layers were loaded.
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// The merged, validated config.
    pub config: AssistantConfig,
    /// Metadata for each layer that contributed.
    pub layers: Vec<ConfigLayer>,
}

/// Origin for a single config layer in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayerSource {
    /// System-wide configuration.
    System,
    /// User-specific configuration.
    User,
    /// Current working directory configuration.
    Cwd,
    /// Runtime overrides (highest precedence).
    Runtime,
}

/// Metadata about a loaded config layer.
#[derive(Debug, Clone)]
pub struct ConfigLayer {
    /// Layer origin (system, user, runtime, etc).
    pub source: ConfigLayerSource,
    /// Location on disk.
    pub path: PathBuf,
}

/// Options controlling layered config discovery and overrides.
#[derive(Debug, Clone)]
pub struct LayeredConfigOptions {
    /// Working directory used to resolve the cwd layer.
    pub cwd: PathBuf,
    /// Optional system config path (defaults to `/etc/jarvis/jarvis.json5` on Unix).
    pub system_config_path: Option<PathBuf>,
    /// Optional user config path (defaults to `~/.jarvis/jarvis.json5`).
    pub user_config_path: Option<PathBuf>,
    /// Runtime override config paths applied last.
    pub runtime_paths: Vec<PathBuf>,
}

impl LayeredConfigOptions {
    /// Create options with default layer locations for the provided cwd.
    pub fn new(cwd: impl AsRef<Path>) -> Self {
        Self {
            cwd: cwd.as_ref().to_path_buf(),
            system_config_path: layer_io::default_system_config_path(),
            user_config_path: layer_io::default_user_config_path(),
            runtime_paths: Vec::new(),
        }
    }

    /// Add a runtime override config path that is applied last.
    pub fn with_runtime_path(mut self, path: impl AsRef<Path>) -> Self {
        self.runtime_paths.push(path.as_ref().to_path_buf());
        self
    }
}

impl AssistantConfig {
    /// Load a single config from a path (no layering).
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("loading config from path: {}", path.display());
        let contents = fs::read_to_string(path).map_err(|err| ConfigError::read(path, err))?;
        let origin = path.display().to_string();
        let value: Value =
            json5::from_str(&contents).map_err(|err| ConfigError::parse(origin.as_str(), err))?;
        config_from_value(value, &origin)
    }

    /// Load a single config from JSON5 contents (no layering).
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("loading config from raw contents (len={})", contents.len());
        let value: Value =
            json5::from_str(contents).map_err(|err| ConfigError::parse("config", err))?;
        config_from_value(value, "config")
    }

    /// Load a layered config stack using the default layer locations.
    pub fn load_layered(cwd: impl AsRef<Path>) -> Result<LayeredConfig, ConfigError> {
        info!(
            "loading layered config with defaults (cwd={})",
            cwd.as_ref().display()
        );
        Self::load_layered_with_options(LayeredConfigOptions::new(cwd))
    }

    /// Load a layered config stack using explicit layer locations and overrides.
    ///
    /// Layer precedence (low -> high): system, user, cwd, runtime overrides.
    pub fn load_layered_with_options(
        options: LayeredConfigOptions,
    ) -> Result<LayeredConfig, ConfigError> {
        let cwd = layer_io::canonical_cwd(&options.cwd)?;
        debug!("normalized cwd for config load: {}", cwd.display());
        let mut layers = Vec::new();
        let mut merged = Value::Object(serde_json::Map::new());
        let mut seen_paths = HashSet::new();

        let optional_layers = [
            (
                ConfigLayerSource::System,
                options.system_config_path.clone(),
            ),
            (ConfigLayerSource::User, options.user_config_path.clone()),
            (
                ConfigLayerSource::Cwd,
                Some(cwd.join(DEFAULT_CONFIG_FILE)),
            ),
        ];
        for (source, path) in optional_layers {
            let Some(path) = path else {
                continue;
            };
            if !seen_paths.insert(layer_io::dedup_key(&path)) {
                debug!(
                    "skipping duplicate layer (source={:?}, path={})",
                    source,
                    path.display()
                );
                continue;
            }
            if let Some(layer) = layer_io::load_optional_layer(source, &path)? {
                debug!("loaded {:?} layer", source);
                merge::merge_json_values(&mut merged, &layer.value);
                layers.push(layer.meta);
            }
        }

        for runtime_path in &options.runtime_paths {
            let layer = layer_io::load_required_layer(ConfigLayerSource::Runtime, runtime_path)?;
            debug!("loaded runtime layer (path={})", runtime_path.display());
            merge::merge_json_values(&mut merged, &layer.value);
            layers.push(layer.meta);
        }

        let config = config_from_value(merged, "effective")?;
        info!("layered config loaded (layers={})", layers.len());
        Ok(LayeredConfig { config, layers })
    }

    /// Validate configuration invariants that cannot be expressed in serde.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("command_prefix", &self.command_prefix),
            ("remember_prefix", &self.remember_prefix),
            ("list_memory_command", &self.list_memory_command),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Constraint {
                    field,
                    requirement: "cannot be empty",
                });
            }
        }
        if self
            .exit_keywords
            .iter()
            .all(|keyword| keyword.trim().is_empty())
        {
            return Err(ConfigError::Constraint {
                field: "exit_keywords",
                requirement: "must contain at least one keyword",
            });
        }
        if self.memory_file.as_os_str().is_empty() {
            return Err(ConfigError::Constraint {
                field: "memory_file",
                requirement: "cannot be empty",
            });
        }
        if self.generator.max_turns == 0 {
            return Err(ConfigError::Constraint {
                field: "generator.max_turns",
                requirement: "must be at least 1",
            });
        }
        if self.generator.timeout_secs == 0 {
            return Err(ConfigError::Constraint {
                field: "generator.timeout_secs",
                requirement: "must be at least 1",
            });
        }
        if let Some(fallback) = &self.generator.fallback
            && fallback.timeout_secs == 0
        {
            return Err(ConfigError::Constraint {
                field: "generator.fallback.timeout_secs",
                requirement: "must be at least 1",
            });
        }
        Ok(())
    }
}

/// Internal representation of a loaded config layer.
#[derive(Debug, Clone)]
struct LoadedLayer {
    meta: ConfigLayer,
    value: Value,
}

fn config_from_value(value: Value, label: &str) -> Result<AssistantConfig, ConfigError> {
    schema::validate_layer_schema(&value, label)?;
    let config: AssistantConfig = serde_json::from_value(value)?;
    config.validate()?;
    Ok(config)
}
