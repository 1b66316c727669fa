//! Type identity and value scopes
//!
//! Every declared type is looked up under a [`TypeKey`]: its `TypeId` plus
//! the type name kept for diagnostics. Equality and hashing use the `TypeId`
//! only, so two keys built from the same type are always the same key.

use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity under which a type is registered and resolved.
#[derive(Clone, Copy, Debug)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Key for the type `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Underlying `TypeId`.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Full type name, for error messages and logging.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Lifetime tag on every cached value.
///
/// `Global` values survive for the process lifetime (pre-resolved values and
/// singleton producer outputs); `Call` values are valid only for the current
/// invocation and are discarded with it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    /// Valid for the process lifetime.
    Global,
    /// Valid only for the current invocation.
    Call,
}

impl Scope {
    /// Whether the value is scoped to a single invocation.
    pub fn is_call(self) -> bool {
        matches!(self, Scope::Call)
    }
}
