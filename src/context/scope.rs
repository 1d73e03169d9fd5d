//! Chained request-scoped key/value carrier.

use std::cell::RefCell;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::context::walker::ContextCarrier;

tokio::task_local! {
    static TASK_SCOPE: Scope;
}

thread_local! {
    static THREAD_SCOPES: RefCell<ThreadScopes> = const {
        RefCell::new(ThreadScopes {
            next_id: 0,
            entered: Vec::new(),
        })
    };
}

/// Scopes entered on this thread, innermost last, keyed by guard id.
struct ThreadScopes {
    next_id: u64,
    entered: Vec<(u64, Scope)>,
}

/// One layer of the chain.
#[derive(Debug)]
struct Layer {
    values: Map<String, Value>,
    parent: Option<Arc<Layer>>,
}

impl ContextCarrier for Layer {
    fn parent(&self) -> Option<&dyn ContextCarrier> {
        self.parent.as_deref().map(|p| p as &dyn ContextCarrier)
    }

    fn for_each_local(&self, f: &mut dyn FnMut(&str, &Value)) {
        for (key, value) in &self.values {
            f(key, value);
        }
    }
}

/// An immutable chain of key/value layers.
///
/// Adding values never mutates a scope: it returns a child that wraps the
/// original, so scopes can be shared freely across threads and tasks.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    top: Option<Arc<Layer>>,
}

impl Scope {
    /// The empty scope.
    pub fn root() -> Self {
        Self::default()
    }

    /// An empty child layer. Values added to it later shadow the parent's
    /// without touching it.
    pub fn child(&self) -> Self {
        self.push(Map::new())
    }

    /// A child scope holding a single value.
    pub fn with_value(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut values = Map::new();
        values.insert(key.into(), value.into());
        self.push(values)
    }

    /// A child scope holding every given value in one layer.
    pub fn with_values<K, V>(&self, values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let values = values
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.push(values)
    }

    fn push(&self, values: Map<String, Value>) -> Self {
        Self {
            top: Some(Arc::new(Layer {
                values,
                parent: self.top.clone(),
            })),
        }
    }

    /// The scope this one wraps, if any.
    pub fn parent(&self) -> Option<Scope> {
        let top = self.top.as_ref()?;
        Some(Self {
            top: top.parent.clone(),
        })
    }

    /// Number of layers in the chain.
    pub fn depth(&self) -> usize {
        std::iter::successors(self.top.as_deref(), |layer| layer.parent.as_deref()).count()
    }

    pub fn is_empty(&self) -> bool {
        std::iter::successors(self.top.as_deref(), |layer| layer.parent.as_deref())
            .all(|layer| layer.values.is_empty())
    }

    /// The innermost layer as a walkable carrier.
    pub fn as_carrier(&self) -> Option<&dyn ContextCarrier> {
        self.top.as_deref().map(|layer| layer as &dyn ContextCarrier)
    }

    /// Make this scope the ambient scope of the current thread until the
    /// guard is dropped. Guards may be dropped in any order; each removes
    /// only its own scope.
    pub fn enter(&self) -> ScopeGuard {
        let id = THREAD_SCOPES.with(|scopes| {
            let mut scopes = scopes.borrow_mut();
            let id = scopes.next_id;
            scopes.next_id += 1;
            scopes.entered.push((id, self.clone()));
            id
        });
        ScopeGuard {
            id,
            _not_send: PhantomData,
        }
    }

    /// Run a future with this scope as the ambient scope of the task.
    pub async fn scope<F>(self, fut: F) -> F::Output
    where
        F: Future,
    {
        TASK_SCOPE.scope(self, fut).await
    }

    /// Run a closure with this scope as the task's ambient scope.
    pub fn sync_scope<F, R>(self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        TASK_SCOPE.sync_scope(self, f)
    }

    /// The ambient scope: the task scope if one is set, else the innermost
    /// scope entered on this thread.
    pub fn current() -> Option<Scope> {
        if let Ok(scope) = TASK_SCOPE.try_with(Scope::clone) {
            return Some(scope);
        }
        THREAD_SCOPES.with(|scopes| {
            scopes
                .borrow()
                .entered
                .last()
                .map(|(_, scope)| scope.clone())
        })
    }
}

/// Leaves the entered thread scope on drop.
#[must_use = "the scope is left as soon as the guard is dropped"]
#[derive(Debug)]
pub struct ScopeGuard {
    id: u64,
    _not_send: PhantomData<*const ()>,
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        THREAD_SCOPES.with(|scopes| {
            let mut scopes = scopes.borrow_mut();
            if let Some(pos) = scopes.entered.iter().rposition(|(id, _)| *id == self.id) {
                scopes.entered.remove(pos);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::walker::walk;

    #[test]
    fn test_chain_depth() {
        let root = Scope::root();
        assert_eq!(root.depth(), 0);
        assert!(root.is_empty());

        let scope = root.with_value("a", 1).with_values([("b", 2), ("c", 3)]);
        assert_eq!(scope.depth(), 2);
        assert!(!scope.is_empty());
        assert_eq!(scope.parent().unwrap().depth(), 1);
    }

    #[test]
    fn test_child_layer() {
        let parent = Scope::root().with_value("a", 1);
        let child = parent.child();
        assert_eq!(child.depth(), 2);
        assert_eq!(walk(child.as_carrier()), walk(parent.as_carrier()));

        let shadowed = child.with_value("a", 2);
        assert_eq!(walk(shadowed.as_carrier())["a"], 2);
        assert_eq!(walk(parent.as_carrier())["a"], 1);
        assert!(Scope::root().child().is_empty());
    }

    #[test]
    fn test_child_does_not_mutate_parent() {
        let outer = Scope::root().with_value("a", 1);
        let _inner = outer.with_value("b", 2);
        let values = walk(outer.as_carrier());
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn test_enter_and_leave() {
        assert!(Scope::current().is_none());
        let outer = Scope::root().with_value("request_id", "r-1");
        {
            let _outer = outer.enter();
            let inner = Scope::root().with_value("request_id", "r-2");
            {
                let _inner = inner.enter();
                let current = Scope::current().unwrap();
                assert_eq!(walk(current.as_carrier())["request_id"], "r-2");
            }
            let current = Scope::current().unwrap();
            assert_eq!(walk(current.as_carrier())["request_id"], "r-1");
        }
        assert!(Scope::current().is_none());
    }

    #[test]
    fn test_guards_dropped_out_of_order() {
        let a = Scope::root().with_value("who", "a");
        let b = Scope::root().with_value("who", "b");

        let guard_a = a.enter();
        let guard_b = b.enter();
        drop(guard_a);

        let current = Scope::current().unwrap();
        assert_eq!(walk(current.as_carrier())["who"], "b");

        drop(guard_b);
        assert!(Scope::current().is_none());
    }

    #[test]
    fn test_sync_scope_wins_over_thread_scope() {
        let thread = Scope::root().with_value("who", "thread");
        let _guard = thread.enter();
        let task = Scope::root().with_value("who", "task");
        let seen = task.sync_scope(|| {
            let current = Scope::current().unwrap();
            walk(current.as_carrier())["who"].clone()
        });
        assert_eq!(seen, "task");
    }

    #[tokio::test]
    async fn test_task_scope() {
        let scope = Scope::root().with_value("request_id", "abc");
        let seen = scope
            .scope(async {
                tokio::task::yield_now().await;
                Scope::current().map(|s| walk(s.as_carrier()))
            })
            .await
            .unwrap();
        assert_eq!(seen["request_id"], "abc");
        assert!(Scope::current().is_none());
    }
}
