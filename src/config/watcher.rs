//! Configuration file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use thiserror::Error;

use crate::config::loader::{load_table, parse_app_config, ConfigError};
use crate::config::provider::ConfigProvider;
use crate::observability::logging::apply_log_level;

/// Error type for starting a watcher.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("Cannot watch {}: {source}", .path.display())]
    Notify {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
}

/// Watches one configuration file and swaps it into a provider on change.
pub struct ConfigWatcher {
    path: PathBuf,
    provider: Arc<ConfigProvider>,
}

impl ConfigWatcher {
    pub fn new(path: &Path, provider: Arc<ConfigProvider>) -> Self {
        Self {
            path: path.to_path_buf(),
            provider,
        }
    }

    /// Start watching. Events stop when the returned watcher is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, WatchError> {
        let path = self.path.clone();
        let provider = Arc::clone(&self.provider);

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!(path = %path.display(), "Config file change detected, reloading...");
                        if let Err(e) = reload(&path, &provider) {
                            tracing::error!(
                                error = %e,
                                "Failed to reload config. Keeping current configuration."
                            );
                        }
                    }
                }
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )
        .map_err(|source| self.notify_error(source))?;

        watcher
            .watch(&self.path, RecursiveMode::NonRecursive)
            .map_err(|source| self.notify_error(source))?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }

    fn notify_error(&self, source: notify::Error) -> WatchError {
        WatchError::Notify {
            path: self.path.clone(),
            source,
        }
    }
}

/// Validate the file, then publish it and re-apply the logger level.
pub fn reload(path: &Path, provider: &ConfigProvider) -> Result<(), ConfigError> {
    let table = load_table(path)?;
    let config = parse_app_config(&table)?;
    provider.reload(table);
    apply_log_level(config.logger.level);
    tracing::info!(level = %config.logger.level, "Config reloaded");
    Ok(())
}
