//! Declared parameter descriptors
//!
//! A [`ParamSpec`] is the declaration-side view of one parameter: its name
//! and, when annotated, the key of its declared type. A missing key is legal
//! at declaration time and becomes a `MissingAnnotation` error when the
//! parameter is first demanded.

use crate::key::TypeKey;

/// One declared parameter of a callable or producer.
#[derive(Clone, Debug)]
pub struct ParamSpec {
    name: String,
    key: Option<TypeKey>,
}

impl ParamSpec {
    /// Parameter declared with the type `T`.
    pub fn of<T: ?Sized + 'static>(name: impl Into<String>) -> Self {
        Self::annotated(name, TypeKey::of::<T>())
    }

    /// Parameter declared with an explicit type key.
    pub fn annotated(name: impl Into<String>, key: TypeKey) -> Self {
        Self {
            name: name.into(),
            key: Some(key),
        }
    }

    /// Parameter declared without a type annotation.
    pub fn unannotated(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: None,
        }
    }

    /// Declared parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type key, if the parameter is annotated.
    pub fn key(&self) -> Option<TypeKey> {
        self.key
    }

    /// Rename the parameter, keeping its annotation.
    pub fn renamed(self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: self.key,
        }
    }
}
