//! Structured diagnostic logging with captured stack traces and ambient
//! context.

pub mod config;
pub mod context;
pub mod logger;
pub mod observability;
pub mod sink;
pub mod trace;

pub use context::Scope;
pub use logger::{init, init_from_config, logger, Entry, Level, Logger, Payload};
pub use sink::{MemorySink, Sink, TracingSink};
