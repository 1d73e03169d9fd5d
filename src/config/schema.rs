//! Configuration schema definitions.
//!
//! Sections and keys use PascalCase (`[Logger]`, `Level = "info"`) so the
//! same names work as dotted paths in the provider (`Logger.Level`).

use serde::{Deserialize, Serialize};

use crate::logger::Level;
use crate::trace::TraceOptions;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default, rename_all = "PascalCase")]
pub struct AppConfig {
    /// Server identity.
    pub server: ServerConfig,

    /// Logger settings.
    pub logger: LoggerConfig,
}

/// Server section.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ServerConfig {
    /// Deployment environment (e.g., "production").
    #[serde(rename = "ENV")]
    pub env: String,

    /// Service name.
    pub name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            env: "undefine".to_string(),
            name: "diaglog".to_string(),
        }
    }
}

/// Where formatted output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Output {
    #[default]
    Stdout,
    Stderr,
}

/// Line format of the subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Text,
    Json,
}

/// Logger section.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct LoggerConfig {
    /// Minimum level handed to the sink.
    pub level: Level,

    /// Output stream.
    pub output: Output,

    /// Output format.
    pub format: Format,

    /// Include frames in captured traces.
    pub with_trace: bool,

    /// Outermost frame first.
    pub invert_trace: bool,

    /// Root cause first.
    pub invert_output: bool,

    /// Process exit status after a fatal entry.
    pub fatal_exit_code: i32,
}

impl LoggerConfig {
    pub fn trace_options(&self) -> TraceOptions {
        TraceOptions {
            with_trace: self.with_trace,
            invert_trace: self.invert_trace,
            invert_output: self.invert_output,
        }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: Level::Debug,
            output: Output::Stdout,
            format: Format::Text,
            with_trace: true,
            invert_trace: true,
            invert_output: true,
            fatal_exit_code: 1,
        }
    }
}
