//! Structured stack trace types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One stack frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Demangled function path, without the trailing hash.
    pub function: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,

    /// Message segment attached to this frame. Only the capture site carries one.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}

impl Frame {
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            file: None,
            line: None,
            message: String::new(),
        }
    }

    /// `function:file:line`, dropping whatever parts are unknown.
    pub fn location(&self) -> String {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => format!("{}:{}:{}", self.function, file, line),
            (Some(file), None) => format!("{}:{}", self.function, file),
            _ => self.function.clone(),
        }
    }

    fn to_value(&self) -> Value {
        let mut frame = Map::new();
        frame.insert("function".into(), Value::String(self.function.clone()));
        frame.insert("location".into(), Value::String(self.location()));
        if let Some(file) = &self.file {
            frame.insert("file".into(), Value::String(file.clone()));
        }
        if let Some(line) = self.line {
            frame.insert("line".into(), Value::from(line));
        }
        if !self.message.is_empty() {
            frame.insert("message".into(), Value::String(self.message.clone()));
        }
        Value::Object(frame)
    }
}

/// A captured trace: the cause chain plus the frames, both already in
/// presentation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackTrace {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub frames: Vec<Frame>,
}

impl StackTrace {
    pub fn is_empty(&self) -> bool {
        self.causes.is_empty() && self.frames.is_empty()
    }

    /// The frame that carries the triggering message, if any frame does.
    pub fn capture_site(&self) -> Option<&Frame> {
        self.frames.iter().find(|f| !f.message.is_empty())
    }

    /// JSON form used in payloads. Empty parts are omitted, so an empty
    /// trace renders as `{}`.
    pub fn to_value(&self) -> Value {
        let mut trace = Map::new();
        if !self.causes.is_empty() {
            trace.insert(
                "causes".into(),
                Value::Array(self.causes.iter().cloned().map(Value::String).collect()),
            );
        }
        if !self.frames.is_empty() {
            trace.insert(
                "frames".into(),
                Value::Array(self.frames.iter().map(Frame::to_value).collect()),
            );
        }
        Value::Object(trace)
    }
}

/// How a captured trace is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceOptions {
    /// Include frames at all. Without them only the cause chain is kept.
    pub with_trace: bool,

    /// Outermost frame first instead of innermost first.
    pub invert_trace: bool,

    /// Root cause first instead of most recent cause first. Also governs
    /// the order of segments in the rendered message.
    pub invert_output: bool,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            with_trace: true,
            invert_trace: true,
            invert_output: true,
        }
    }
}
