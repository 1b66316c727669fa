//! Reserved marker types
//!
//! Two type keys are reserved by the engine and never served by a producer,
//! resolved value, or state binding:
//!
//! - [`ReturnValue`] binds to the previous pipeline step's result.
//! - [`ParamInfo`] binds to the descriptor of the very parameter being
//!   filled, letting a producer introspect its consumer (for example to pull
//!   a named field out of a per-call state blob).

use crate::key::TypeKey;
use crate::value::Value;
use std::sync::Arc;

/// The previous pipeline step's result.
///
/// On the first step this holds the initial sentinel, a unit value.
#[derive(Clone)]
pub struct ReturnValue(Value);

impl ReturnValue {
    /// Wrap a raw previous-result value.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Initial sentinel used before any step has completed.
    pub fn sentinel() -> Self {
        Self(Arc::new(()))
    }

    /// The raw, type-erased previous result.
    pub fn raw(&self) -> &Value {
        &self.0
    }

    /// Read the previous result as a `T`, if that is its concrete type.
    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Take a shared handle to the previous result as a `T`.
    pub fn downcast<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.0).downcast::<T>().ok()
    }

    /// Whether the previous result is still the initial sentinel.
    pub fn is_sentinel(&self) -> bool {
        self.0.is::<()>()
    }
}

/// Descriptor of the parameter currently being filled.
#[derive(Clone, Debug)]
pub struct ParamInfo {
    name: String,
    key: TypeKey,
}

impl ParamInfo {
    /// Descriptor for a parameter `name` declared with type key `key`.
    pub fn new(name: impl Into<String>, key: TypeKey) -> Self {
        Self {
            name: name.into(),
            key,
        }
    }

    /// Name of the parameter being filled.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type key of the parameter being filled.
    pub fn key(&self) -> TypeKey {
        self.key
    }
}
