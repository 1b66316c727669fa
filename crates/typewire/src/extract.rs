//! Typed parameter extraction and closure binding
//!
//! Bridges the type-erased engine and plain Rust closures. A closure passed
//! to [`Callable::new`](crate::Callable::new) or
//! [`Producer::new`](crate::Producer::new) declares its dependencies through
//! its parameter types: each must implement [`FromResolved`], which names
//! the key the engine resolves and recovers the typed value from the shared
//! handle. Dependencies are received as `Arc<T>` service pointers; the
//! reserved markers [`ReturnValue`] and [`ParamInfo`] extract by value.

use std::sync::Arc;

use typewire_domain::{Error, ParamInfo, ParamSpec, Result, ReturnValue, TypeKey, Value};

/// A parameter type the engine knows how to supply.
pub trait FromResolved: Sized {
    /// Key under which the parameter's value is resolved.
    fn type_key() -> TypeKey;

    /// Recover the typed parameter from a resolved value.
    ///
    /// Returns `None` when the value's concrete type does not match, which
    /// the invocation glue reports as the demanded type being unresolvable.
    fn from_resolved(value: &Value) -> Option<Self>;
}

impl<T: Send + Sync + 'static> FromResolved for Arc<T> {
    fn type_key() -> TypeKey {
        TypeKey::of::<T>()
    }

    fn from_resolved(value: &Value) -> Option<Self> {
        Arc::clone(value).downcast::<T>().ok()
    }
}

impl FromResolved for ReturnValue {
    fn type_key() -> TypeKey {
        TypeKey::of::<ReturnValue>()
    }

    fn from_resolved(value: &Value) -> Option<Self> {
        value.downcast_ref::<ReturnValue>().cloned()
    }
}

impl FromResolved for ParamInfo {
    fn type_key() -> TypeKey {
        TypeKey::of::<ParamInfo>()
    }

    fn from_resolved(value: &Value) -> Option<Self> {
        value.downcast_ref::<ParamInfo>().cloned()
    }
}

/// Closure-side binding: parameter specs, output key, and type-erased
/// invocation for a plain `Fn` of a supported arity (0 through 6).
///
/// Implemented for closures and fn pointers whose parameters all implement
/// [`FromResolved`] and whose return type is `Send + Sync + 'static`.
pub trait TypedFn<Args>: Send + Sync + 'static {
    /// Parameter declarations inferred from the closure signature, with
    /// positional names `arg0..argN`.
    fn param_specs() -> Vec<ParamSpec>;

    /// Key of the closure's return type.
    fn return_key() -> TypeKey;

    /// Invoke with resolved values, extracting each typed parameter.
    /// `unit` is the declaring unit's name, used in error payloads.
    fn call(&self, unit: &str, args: &[Value]) -> Result<Value>;
}

macro_rules! impl_typed_fn {
    ($(($arg:ident, $idx:tt)),*) => {
        impl<F, R, $($arg,)*> TypedFn<($($arg,)*)> for F
        where
            F: Fn($($arg),*) -> R + Send + Sync + 'static,
            R: Send + Sync + 'static,
            $($arg: FromResolved,)*
        {
            fn param_specs() -> Vec<ParamSpec> {
                vec![$(ParamSpec::annotated(concat!("arg", $idx), $arg::type_key()),)*]
            }

            fn return_key() -> TypeKey {
                TypeKey::of::<R>()
            }

            #[allow(unused_variables)]
            fn call(&self, unit: &str, args: &[Value]) -> Result<Value> {
                $(
                    let $arg = args
                        .get($idx)
                        .and_then(|value| <$arg as FromResolved>::from_resolved(value))
                        .ok_or_else(|| {
                            Error::unresolvable(<$arg as FromResolved>::type_key().name(), unit)
                        })?;
                )*
                Ok(Arc::new((self)($($arg),*)) as Value)
            }
        }
    };
}

impl_typed_fn!();
impl_typed_fn!((A0, 0));
impl_typed_fn!((A0, 0), (A1, 1));
impl_typed_fn!((A0, 0), (A1, 1), (A2, 2));
impl_typed_fn!((A0, 0), (A1, 1), (A2, 2), (A3, 3));
impl_typed_fn!((A0, 0), (A1, 1), (A2, 2), (A3, 3), (A4, 4));
impl_typed_fn!((A0, 0), (A1, 1), (A2, 2), (A3, 3), (A4, 4), (A5, 5));
