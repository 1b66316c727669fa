//! Type-keyed bindings, validated at construction
//!
//! The registry indexes every source a type can be served from: producers by
//! their output key, pre-resolved values by their key, and per-call state
//! bindings by the key they populate. Each key may be claimed by exactly one
//! source; conflicts (including the reserved marker keys, which the engine
//! itself serves) are a construction-time `ConflictingBinding` error. The
//! registry is immutable after construction and shared by concurrent runs.

use std::collections::HashMap;
use std::sync::Arc;

use typewire_domain::{Error, ParamInfo, Result, ReturnValue, TypeKey, Value};

use crate::producer::Producer;

/// A pre-supplied value bound directly to its type key, never built by a
/// producer, always global scope.
pub struct ResolvedValue {
    key: TypeKey,
    value: Value,
}

impl ResolvedValue {
    /// Bind `value` under the key of its concrete type.
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self {
            key: TypeKey::of::<T>(),
            value: Arc::new(value),
        }
    }

    /// Key the value is bound under.
    pub fn key(&self) -> TypeKey {
        self.key
    }
}

/// A declared mapping from a per-call state key to the type it populates.
///
/// The binding is lazy: the state entry is extracted only when the type is
/// demanded, and `run` never requires unused declared keys to be present.
#[derive(Clone, Debug)]
pub struct StateBinding {
    name: String,
    key: TypeKey,
}

impl StateBinding {
    /// Declare that state entry `name` populates values of type `T`.
    pub fn new<T: Send + Sync + 'static>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: TypeKey::of::<T>(),
        }
    }

    /// State entry name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key of the populated type.
    pub fn key(&self) -> TypeKey {
        self.key
    }
}

/// One validated source for a type key.
pub(crate) enum Binding {
    /// Served by a registered producer.
    Producer(Producer),
    /// Served by a pre-supplied value.
    Resolved(Value),
    /// Served by extracting the named per-call state entry.
    State(String),
}

/// Immutable index of every binding, built once at injector construction.
pub(crate) struct Registry {
    bindings: HashMap<TypeKey, Binding>,
    producer_count: usize,
}

impl Registry {
    pub(crate) fn build(
        producers: Vec<Producer>,
        state_bindings: Vec<StateBinding>,
        resolved: Vec<ResolvedValue>,
    ) -> Result<Self> {
        let producer_count = producers.len();
        let mut bindings = HashMap::new();

        for producer in producers {
            let key = producer.output();
            Self::claim(&mut bindings, key, Binding::Producer(producer))?;
        }
        for value in resolved {
            Self::claim(&mut bindings, value.key, Binding::Resolved(value.value))?;
        }
        for binding in state_bindings {
            Self::claim(&mut bindings, binding.key, Binding::State(binding.name))?;
        }

        Ok(Self {
            bindings,
            producer_count,
        })
    }

    fn claim(
        bindings: &mut HashMap<TypeKey, Binding>,
        key: TypeKey,
        binding: Binding,
    ) -> Result<()> {
        // The marker keys are served by the engine itself.
        if key == TypeKey::of::<ReturnValue>() || key == TypeKey::of::<ParamInfo>() {
            return Err(Error::conflicting_binding(key.name()));
        }
        if bindings.insert(key, binding).is_some() {
            return Err(Error::conflicting_binding(key.name()));
        }
        Ok(())
    }

    pub(crate) fn lookup(&self, key: TypeKey) -> Option<&Binding> {
        self.bindings.get(&key)
    }

    pub(crate) fn producer_count(&self) -> usize {
        self.producer_count
    }

    pub(crate) fn binding_count(&self) -> usize {
        self.bindings.len()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("producers", &self.producer_count)
            .field("bindings", &self.bindings.len())
            .finish_non_exhaustive()
    }
}
