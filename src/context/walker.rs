//! Flattening of chained context carriers.

use serde_json::{Map, Value};

/// A chained key/value scope supplied by the calling environment.
pub trait ContextCarrier {
    /// The scope this one wraps.
    fn parent(&self) -> Option<&dyn ContextCarrier>;

    /// Visit the keys and values stored directly in this scope.
    fn for_each_local(&self, f: &mut dyn FnMut(&str, &Value));
}

/// Collect every key in the chain, innermost scope first. A key seen
/// closer to the innermost scope shadows the same key further out.
pub fn walk(carrier: Option<&dyn ContextCarrier>) -> Map<String, Value> {
    let mut values = Map::new();
    let mut current = carrier;

    while let Some(scope) = current {
        scope.for_each_local(&mut |key, value| {
            if !values.contains_key(key) {
                values.insert(key.to_string(), value.clone());
            }
        });
        current = scope.parent();
    }

    values
}
