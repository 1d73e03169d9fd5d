//! Leveled destinations for rendered entries.
//!
//! # Data Flow
//! ```text
//! Entry::emit
//!     → Sink::emit(level, payload, message)
//!         → tracing_sink.rs (tracing events; fatal exits, panic unwinds)
//!         → memory.rs (in-process record, no side effects)
//! ```
//!
//! # Design Decisions
//! - Transport, rotation and delivery belong to the sink, never to the entry
//! - Process effects of fatal/panic are sink behavior; the entry is already
//!   reset when `emit` is called
//! - Sinks are shared across threads, so they must be `Send + Sync`

pub mod memory;
pub mod tracing_sink;

pub use memory::{MemorySink, Record};
pub use tracing_sink::TracingSink;

use crate::logger::{Level, Payload};

/// An abstract leveled emitter.
pub trait Sink: Send + Sync {
    /// Write one rendered entry. For [`Level::Fatal`] and [`Level::Panic`]
    /// the sink may terminate the process or unwind after writing.
    fn emit(&self, level: Level, payload: &Payload, message: &str);
}

impl<S: Sink + ?Sized> Sink for std::sync::Arc<S> {
    fn emit(&self, level: Level, payload: &Payload, message: &str) {
        (**self).emit(level, payload, message)
    }
}
