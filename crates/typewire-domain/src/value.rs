//! Type-erased values and per-call state
//!
//! All resolved values travel as shared [`Value`] handles. Sharing is what
//! makes singleton identity observable: two resolutions of a singleton type
//! return clones of the same `Arc`.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// A resolved value: a shared, type-erased handle.
pub type Value = Arc<dyn Any + Send + Sync>;

/// Named per-call inputs supplied to a single invocation.
///
/// Keys are the names declared by state bindings; only the keys a pipeline
/// actually demands need to be present.
#[derive(Default)]
pub struct CallState {
    entries: HashMap<String, Value>,
}

impl CallState {
    /// Empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a typed value under `name`.
    pub fn insert<T: Send + Sync + 'static>(&mut self, name: impl Into<String>, value: T) {
        self.entries.insert(name.into(), Arc::new(value));
    }

    /// Insert an already type-erased value under `name`.
    pub fn insert_value(&mut self, name: impl Into<String>, value: Value) {
        self.entries.insert(name.into(), value);
    }

    /// Look up the value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    /// Whether `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
}
