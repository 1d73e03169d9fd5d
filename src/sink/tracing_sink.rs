//! Sink that forwards entries to `tracing`.

use crate::logger::{Level, Payload};
use crate::sink::Sink;

/// Default sink. Every entry becomes one `tracing` event under the
/// `diaglog` target with the payload in a `root` field.
///
/// Fatal entries exit the process with [`TracingSink::exit_code`] after the
/// event is written; panic entries unwind with the message.
#[derive(Debug, Clone)]
pub struct TracingSink {
    exit_code: i32,
}

impl TracingSink {
    pub fn new() -> Self {
        Self { exit_code: 1 }
    }

    /// Exit status used for fatal entries.
    pub fn with_exit_code(mut self, exit_code: i32) -> Self {
        self.exit_code = exit_code;
        self
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for TracingSink {
    fn emit(&self, level: Level, payload: &Payload, message: &str) {
        match level {
            Level::Debug => tracing::debug!(target: "diaglog", root = %payload, "{}", message),
            Level::Info => tracing::info!(target: "diaglog", root = %payload, "{}", message),
            Level::Warning => tracing::warn!(target: "diaglog", root = %payload, "{}", message),
            Level::Error | Level::Fatal | Level::Panic => tracing::error!(
                target: "diaglog",
                severity = level.as_str(),
                root = %payload,
                "{}",
                message
            ),
        }

        match level {
            Level::Fatal => std::process::exit(self.exit_code),
            Level::Panic => std::panic::panic_any(message.to_string()),
            _ => {}
        }
    }
}
