//! Entry building and emission.
//!
//! # Data Flow
//! ```text
//! logger() / Logger::entry()
//!     → entry.rs (decorators accumulate PendingEntry)
//!     → terminal level call
//!         → trace capture (error and above, or with_trace)
//!         → context walk (explicit scope, ambient scope, base scope)
//!         → payload.rs (non-empty fields only)
//!         → Sink::emit
//!     → PendingEntry reset
//! ```
//!
//! # Design Decisions
//! - `Logger` is shared and immutable; every call chain owns its own `Entry`
//! - Six levels dispatch through one private `emit`
//! - The pending entry is moved out before the sink runs

pub mod entry;
pub mod global;
pub mod level;
pub mod payload;

pub use entry::Entry;
pub use global::{init, init_from_config, logger, LoggerError};
pub use level::{Level, ParseLevelError};
pub use payload::Payload;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::config::LoggerConfig;
use crate::context::Scope;
use crate::sink::{Sink, TracingSink};
use crate::trace::TraceOptions;

struct Shared {
    sink: Arc<dyn Sink>,
    min_level: Level,
    trace: TraceOptions,
    base: Scope,
}

/// Handle to a sink plus the options every entry is rendered with.
///
/// Cloning is cheap and clones share the same sink.
#[derive(Clone)]
pub struct Logger {
    shared: Arc<Shared>,
}

macro_rules! level_shortcuts {
    ($($plain:ident, $formatted:ident;)*) => {
        $(
            #[doc = concat!("Emit a fresh entry with no metadata. See [`Entry::", stringify!($plain), "`].")]
            pub fn $plain(&self, message: impl fmt::Display) {
                self.entry().$plain(message);
            }

            #[doc = concat!("See [`Entry::", stringify!($formatted), "`].")]
            pub fn $formatted(&self, args: fmt::Arguments<'_>) {
                self.entry().$formatted(args);
            }
        )*
    };
}

impl Logger {
    /// A logger with default options: everything from debug up, full traces.
    pub fn new(sink: impl Sink + 'static) -> Self {
        Self::builder(sink).build()
    }

    pub fn builder(sink: impl Sink + 'static) -> LoggerBuilder {
        LoggerBuilder {
            sink: Arc::new(sink),
            min_level: Level::Debug,
            trace: TraceOptions::default(),
            base: Scope::root(),
        }
    }

    /// A `tracing`-backed logger configured from the `Logger` section.
    pub fn from_config(config: &LoggerConfig) -> Self {
        let sink = TracingSink::new().with_exit_code(config.fatal_exit_code);
        Self::builder(sink)
            .min_level(config.level)
            .trace_options(config.trace_options())
            .build()
    }

    /// Start a new, empty entry.
    pub fn entry(&self) -> Entry {
        Entry::new(self.clone())
    }

    pub fn min_level(&self) -> Level {
        self.shared.min_level
    }

    /// Whether entries at `level` reach the sink.
    pub fn enabled(&self, level: Level) -> bool {
        level.is_terminal() || level >= self.shared.min_level
    }

    pub fn trace_options(&self) -> TraceOptions {
        self.shared.trace
    }

    /// Scope walked when an entry has neither an explicit nor an ambient one.
    pub fn base_scope(&self) -> &Scope {
        &self.shared.base
    }

    pub(crate) fn sink(&self) -> &dyn Sink {
        self.shared.sink.as_ref()
    }

    pub fn code(&self, code: impl Into<String>) -> Entry {
        let mut entry = self.entry();
        entry.code(code);
        entry
    }

    pub fn hint(&self, hint: impl Into<String>) -> Entry {
        let mut entry = self.entry();
        entry.hint(hint);
        entry
    }

    pub fn domain(&self, domain: impl Into<String>) -> Entry {
        let mut entry = self.entry();
        entry.domain(domain);
        entry
    }

    pub fn owner(&self, owner: impl Into<Value>) -> Entry {
        let mut entry = self.entry();
        entry.owner(owner);
        entry
    }

    pub fn user(&self, user: impl Into<Value>) -> Entry {
        let mut entry = self.entry();
        entry.user(user);
        entry
    }

    pub fn tags<I, T>(&self, tags: I) -> Entry
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut entry = self.entry();
        entry.tags(tags);
        entry
    }

    pub fn with<I, K, V>(&self, data: I) -> Entry
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut entry = self.entry();
        entry.with(data);
        entry
    }

    pub fn with_trace(&self) -> Entry {
        let mut entry = self.entry();
        entry.with_trace();
        entry
    }

    pub fn cause<E>(&self, err: &E) -> Entry
    where
        E: std::error::Error + ?Sized,
    {
        let mut entry = self.entry();
        entry.cause(err);
        entry
    }

    pub fn context(&self, scope: Scope) -> Entry {
        let mut entry = self.entry();
        entry.context(scope);
        entry
    }

    level_shortcuts! {
        debug, debug_fmt;
        info, info_fmt;
        warning, warning_fmt;
        error, error_fmt;
        fatal, fatal_fmt;
        panic, panic_fmt;
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("min_level", &self.shared.min_level)
            .field("trace", &self.shared.trace)
            .field("base", &self.shared.base)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Logger`].
pub struct LoggerBuilder {
    sink: Arc<dyn Sink>,
    min_level: Level,
    trace: TraceOptions,
    base: Scope,
}

impl LoggerBuilder {
    /// Entries below this level are dropped. Fatal and panic never are.
    pub fn min_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    pub fn trace_options(mut self, options: TraceOptions) -> Self {
        self.trace = options;
        self
    }

    pub fn base_scope(mut self, scope: Scope) -> Self {
        self.base = scope;
        self
    }

    pub fn build(self) -> Logger {
        Logger {
            shared: Arc::new(Shared {
                sink: self.sink,
                min_level: self.min_level,
                trace: self.trace,
                base: self.base,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use serde_json::json;

    #[test]
    fn test_decorator_starts_fresh_entry() {
        let sink = MemorySink::new();
        let logger = Logger::new(sink.clone());

        logger.domain("main").info("logger was running");
        logger.info("no metadata");

        let records = sink.records();
        assert_eq!(records[0].payload.get("domain"), Some(&json!("main")));
        assert!(records[1].payload.is_empty());
    }

    #[test]
    fn test_base_scope_is_fallback() {
        let sink = MemorySink::new();
        let logger = Logger::builder(sink.clone())
            .base_scope(Scope::root().with_value("service", "billing"))
            .build();

        logger.info("base");
        assert_eq!(
            sink.last().unwrap().payload.get("context"),
            Some(&json!({"service": "billing"}))
        );

        let _guard = Scope::root().with_value("request_id", "r-1").enter();
        logger.info("ambient");
        assert_eq!(
            sink.last().unwrap().payload.get("context"),
            Some(&json!({"request_id": "r-1"}))
        );
    }

    #[test]
    fn test_terminal_levels_bypass_filter() {
        let logger = Logger::builder(MemorySink::new())
            .min_level(Level::Panic)
            .build();
        assert!(!logger.enabled(Level::Error));
        assert!(logger.enabled(Level::Fatal));
        assert!(logger.enabled(Level::Panic));
    }

    #[test]
    fn test_from_config() {
        let config = LoggerConfig {
            level: Level::Info,
            invert_trace: false,
            ..LoggerConfig::default()
        };
        let logger = Logger::from_config(&config);
        assert_eq!(logger.min_level(), Level::Info);
        assert!(!logger.trace_options().invert_trace);
        assert!(logger.trace_options().invert_output);
    }
}
