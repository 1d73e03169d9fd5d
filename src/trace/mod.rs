//! Stack trace capture.
//!
//! # Data Flow
//! ```text
//! trigger message (+ optional cause chain)
//!     → capture.rs (walk frames, resolve and demangle symbols, drop internal frames)
//!     → ordering (TraceOptions: invert_trace, invert_output)
//!     → (rendered message, StackTrace)
//! ```
//!
//! # Design Decisions
//! - Capture never fails; unsupported platforms yield a trace without frames
//! - Frames are innermost-first until inverted
//! - The capture-site frame carries the triggering message

pub mod capture;
pub mod frame;

pub use capture::{capture, capture_with_causes};
pub use frame::{Frame, StackTrace, TraceOptions};
