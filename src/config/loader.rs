//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use toml::Table;

use crate::config::provider::ConfigProvider;
use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A configuration file named without its extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    /// File stem (`config` for `config.toml`).
    pub name: String,

    /// Directory holding the file.
    pub path: PathBuf,
}

impl ConfigFile {
    pub const EXTENSION: &'static str = "toml";

    /// Split a path given on the command line. The extension is optional:
    /// `conf/app` and `conf/app.toml` name the same file.
    pub fn from_path(full_path: &str) -> Self {
        let path = Path::new(full_path);
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Self { name, path: dir }
    }

    /// Full path of the TOML file.
    pub fn resolve(&self) -> PathBuf {
        self.path.join(format!("{}.{}", self.name, Self::EXTENSION))
    }
}

/// Read a TOML file into a raw table.
pub fn load_table(path: &Path) -> Result<Table, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Deserialize and validate the typed sections of a raw table.
pub fn parse_app_config(table: &Table) -> Result<AppConfig, ConfigError> {
    let config = AppConfig::deserialize(toml::Value::Table(table.clone()))?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    parse_app_config(&load_table(path)?)
}

/// Startup load: the validated config plus a provider over the same table.
/// On failure, defaults and an empty provider are returned with the error
/// so the caller can report it once logging is up.
pub fn load_or_default(path: &Path) -> (AppConfig, ConfigProvider, Option<ConfigError>) {
    let loaded = load_table(path).and_then(|table| Ok((parse_app_config(&table)?, table)));
    match loaded {
        Ok((config, table)) => (config, ConfigProvider::new(table), None),
        Err(e) => (AppConfig::default(), ConfigProvider::default(), Some(e)),
    }
}
