//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber from `[Logger]`
//! - Configure log level at runtime
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, text format for development
//! - Log level configurable via config and environment

use std::sync::OnceLock;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, reload, EnvFilter, Layer, Registry};

use crate::config::{Format, LoggerConfig, Output};
use crate::logger::Level;

type Filtered = Layered<reload::Layer<EnvFilter, Registry>, Registry>;

static RELOAD_HANDLE: OnceLock<reload::Handle<EnvFilter, Registry>> = OnceLock::new();

/// Filter that passes `level` and everything more severe.
pub fn level_filter(level: Level) -> EnvFilter {
    EnvFilter::default().add_directive(LevelFilter::from_level(level.as_tracing()).into())
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_subscriber(config: &LoggerConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| level_filter(config.level));
    let (filter_layer, handle) = reload::Layer::new(filter);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer(config))
        .try_init()?;

    let _ = RELOAD_HANDLE.set(handle);
    Ok(())
}

/// Swap the subscriber filter. Returns false when no reloadable subscriber
/// was installed by this crate.
pub fn apply_log_level(level: Level) -> bool {
    let Some(handle) = RELOAD_HANDLE.get() else {
        return false;
    };
    match handle.modify(|filter| *filter = level_filter(level)) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to apply log level");
            false
        }
    }
}

fn fmt_layer(config: &LoggerConfig) -> Box<dyn Layer<Filtered> + Send + Sync> {
    let writer = match config.output {
        Output::Stdout => BoxMakeWriter::new(std::io::stdout),
        Output::Stderr => BoxMakeWriter::new(std::io::stderr),
    };

    match config.format {
        Format::Json => fmt::layer().json().with_writer(writer).boxed(),
        Format::Text => fmt::layer().with_writer(writer).boxed(),
    }
}
