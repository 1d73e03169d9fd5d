//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Entry::emit
//!     → TracingSink (one `diaglog` event per entry)
//!     → logging.rs subscriber (reloadable filter, text or JSON)
//!     → stdout / stderr
//!
//! Config reload:
//!     watcher.rs → apply_log_level → filter swapped in place
//! ```
//!
//! # Design Decisions
//! - One global subscriber, installed once by the binary
//! - `RUST_LOG` wins over the configured level at startup

pub mod logging;
