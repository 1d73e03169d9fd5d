//! Ambient request-scoped context.
//!
//! # Data Flow
//! ```text
//! caller / request handler
//!     → scope.rs (Scope::with_value, enter() per thread, scope() per task)
//!     → walker.rs (innermost-first flatten, first key seen wins)
//!     → payload `context` field
//! ```
//!
//! # Design Decisions
//! - Scopes are immutable `Arc` chains; adding a value makes a child
//! - Task-local scope takes precedence over thread-entered scopes
//! - The walker only needs `parent` and local enumeration, so foreign
//!   carriers can implement `ContextCarrier` directly

pub mod scope;
pub mod walker;

pub use scope::{Scope, ScopeGuard};
pub use walker::{walk, ContextCarrier};
