//! In-memory sink.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::logger::{Level, Payload};
use crate::sink::Sink;

/// One emitted entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub level: Level,
    pub payload: Payload,
    pub message: String,
}

/// Keeps every emitted entry in memory. Clones share the same buffer.
///
/// Fatal and panic entries are recorded like any other; this sink has no
/// process-level effects.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<Record>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far.
    pub fn records(&self) -> Vec<Record> {
        self.lock().clone()
    }

    pub fn last(&self) -> Option<Record> {
        self.lock().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drain the buffer.
    pub fn take(&self) -> Vec<Record> {
        std::mem::take(&mut *self.lock())
    }

    // A panicking caller must not lose the records already written.
    fn lock(&self) -> MutexGuard<'_, Vec<Record>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Sink for MemorySink {
    fn emit(&self, level: Level, payload: &Payload, message: &str) {
        self.lock().push(Record {
            level,
            payload: payload.clone(),
            message: message.to_string(),
        });
    }
}
