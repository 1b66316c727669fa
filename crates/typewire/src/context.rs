//! Per-invocation state
//!
//! A `CallContext` lives for exactly one `run`: the call-scoped cache, the
//! previous-result holder, the in-progress build stack used for cycle
//! detection, and a borrow of the per-call state map. It is exclusively
//! owned by that invocation and discarded in full when it returns or fails.

use std::collections::HashMap;
use std::sync::Arc;

use typewire_domain::{CallState, Scope, TypeKey, Value};

pub(crate) struct CallContext<'a> {
    cache: HashMap<TypeKey, (Value, Scope)>,
    previous: Value,
    stack: Vec<TypeKey>,
    state: &'a CallState,
}

impl<'a> CallContext<'a> {
    pub(crate) fn new(state: &'a CallState) -> Self {
        Self {
            cache: HashMap::new(),
            // Initial sentinel: the unit value, until the first step completes.
            previous: Arc::new(()),
            stack: Vec::new(),
            state,
        }
    }

    pub(crate) fn cached(&self, key: TypeKey) -> Option<(Value, Scope)> {
        self.cache.get(&key).cloned()
    }

    /// Cache a resolved value at its scope. Also used by the executor to
    /// override a type with a step's declared output.
    pub(crate) fn store(&mut self, key: TypeKey, value: Value, scope: Scope) {
        self.cache.insert(key, (value, scope));
    }

    pub(crate) fn previous(&self) -> Value {
        Arc::clone(&self.previous)
    }

    pub(crate) fn set_previous(&mut self, value: Value) {
        self.previous = value;
    }

    pub(crate) fn state(&self) -> &CallState {
        self.state
    }

    pub(crate) fn in_progress(&self, key: TypeKey) -> bool {
        self.stack.contains(&key)
    }

    pub(crate) fn push_in_progress(&mut self, key: TypeKey) {
        self.stack.push(key);
    }

    pub(crate) fn pop_in_progress(&mut self) {
        self.stack.pop();
    }

    /// The in-progress chain rendered for a cycle error, outermost first.
    pub(crate) fn chain(&self, key: TypeKey) -> String {
        let mut names: Vec<&str> = self.stack.iter().map(TypeKey::name).collect();
        names.push(key.name());
        names.join(" -> ")
    }
}
