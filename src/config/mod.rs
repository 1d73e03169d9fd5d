//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! -c conf/app (extension optional)
//!     → loader.rs (ConfigFile::resolve, read TOML table)
//!     → schema.rs + validation.rs (typed Server/Logger sections)
//!     → provider.rs (dotted-path lookups over the raw table)
//!     → database.rs and callers read values with defaults
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads and validates
//!     → atomic swap of the provider's table
//!     → logger level re-applied to the subscriber filter
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - An invalid file never replaces a valid one
//! - Unset paths fall back to the first non-zero default

pub mod database;
pub mod defaults;
pub mod loader;
pub mod provider;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use database::{Cluster, DatabaseConfig};
pub use loader::{load_config, load_or_default, parse_app_config, ConfigError, ConfigFile};
pub use provider::ConfigProvider;
pub use schema::{AppConfig, Format, LoggerConfig, Output, ServerConfig};
pub use watcher::{ConfigWatcher, WatchError};
