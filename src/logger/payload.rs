//! The rendered form of one entry.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

/// Payload field names.
pub mod keys {
    pub const CODE: &str = "code";
    pub const CONTEXT: &str = "context";
    pub const DOMAIN: &str = "domain";
    pub const HINT: &str = "hint";
    pub const MESSAGE: &str = "message";
    pub const OWNER: &str = "owner";
    pub const STACKTRACE: &str = "stacktrace";
    pub const TAGS: &str = "tags";
    pub const USER: &str = "user";
    pub const WITH: &str = "with";
}

/// Immutable JSON object holding only the non-empty fields of an entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Payload(Map<String, Value>);

impl Payload {
    pub(crate) fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
