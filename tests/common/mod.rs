//! Shared utilities for integration tests.

use diaglog::{Level, Logger, MemorySink, Payload, Sink};

/// A logger writing into a fresh in-memory sink.
#[allow(dead_code)]
pub fn memory_logger() -> (Logger, MemorySink) {
    let sink = MemorySink::new();
    (Logger::new(sink.clone()), sink)
}

/// Records like [`MemorySink`], then unwinds on every emission.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct PanickingSink {
    pub inner: MemorySink,
}

impl Sink for PanickingSink {
    fn emit(&self, level: Level, payload: &Payload, message: &str) {
        self.inner.emit(level, payload, message);
        panic!("sink failure: {message}");
    }
}

/// String field of a payload, if present.
#[allow(dead_code)]
pub fn field<'a>(payload: &'a Payload, key: &str) -> Option<&'a str> {
    payload.get(key).and_then(|v| v.as_str())
}
