//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/kinforest/kinforest.toml`
//! 3. Local config: `<dir>/.kinforest.toml`
//! 4. Environment variables: `KINFOREST_*` prefix

use std::fmt;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::UnknownRelationPolicy;

/// How layouts are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented tree text
    #[default]
    Tree,
    /// JSON document
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tree => f.write_str("tree"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Unified configuration for kinforest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Relations whose kind is neither descent nor pairing
    pub unknown_relations: UnknownRelationPolicy,
    /// Default output format of `layout`
    pub output: OutputFormat,
    /// Colored terminal output
    pub color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            unknown_relations: UnknownRelationPolicy::Ignore,
            output: OutputFormat::Tree,
            color: true,
        }
    }
}

/// Raw settings for intermediate parsing.
///
/// `None` means the layer does not mention the key and the value below it
/// stays in effect.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub unknown_relations: Option<UnknownRelationPolicy>,
    pub output: Option<OutputFormat>,
    pub color: Option<bool>,
}

/// Get the XDG config directory for kinforest.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "kinforest").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("kinforest.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".kinforest.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

fn parse_policy(value: &str) -> Result<UnknownRelationPolicy, ApplicationError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "ignore" => Ok(UnknownRelationPolicy::Ignore),
        "reject" => Ok(UnknownRelationPolicy::Reject),
        other => Err(ApplicationError::Config {
            message: format!("unknown_relations must be 'ignore' or 'reject', got '{other}'"),
        }),
    }
}

fn parse_output(value: &str) -> Result<OutputFormat, ApplicationError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "tree" => Ok(OutputFormat::Tree),
        "json" => Ok(OutputFormat::Json),
        other => Err(ApplicationError::Config {
            message: format!("output must be 'tree' or 'json', got '{other}'"),
        }),
    }
}

impl Settings {
    /// Overlay the keys a layer specifies onto self.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            unknown_relations: overlay.unknown_relations.unwrap_or(self.unknown_relations),
            output: overlay.output.unwrap_or(self.output),
            color: overlay.color.unwrap_or(self.color),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.kinforest.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables
        Self::apply_env_overrides(current)
    }

    /// Load defaults plus a single config file, ignoring global config and
    /// environment.
    pub fn load_file(path: &Path) -> Result<Self, ApplicationError> {
        let raw = load_raw_settings(path)?;
        Ok(Self::default().merge_with(&raw))
    }

    /// Apply KINFOREST_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("KINFOREST").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("unknown_relations") {
            settings.unknown_relations = parse_policy(&val)?;
        }
        if let Ok(val) = config.get_string("output") {
            settings.output = parse_output(&val)?;
        }
        if let Ok(val) = config.get_bool("color") {
            settings.color = val;
        }

        Ok(settings)
    }

    /// Render as TOML, as written in a config file.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {e}"),
        })
    }
}
