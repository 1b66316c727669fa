//! The recursive resolution algorithm
//!
//! Produces a value for a required type inside one call context, on behalf
//! of a top-level callable parameter or a producer input. Resolution order:
//!
//! 1. Reserved markers (`ReturnValue`, `ParamInfo`) are served by the
//!    engine and never cached.
//! 2. The call-scoped cache.
//! 3. A pre-resolved value (global scope, memoized into the cache).
//! 4. The singleton store (global scope).
//! 5. A state binding whose entry is present in the per-call state
//!    (call scope, extracted lazily).
//! 6. The registered producer: inputs are resolved recursively, the
//!    singleton-safety check runs before invocation, and the output is
//!    stored at the scope the producer's kind dictates.
//!
//! Cycles are detected through the context's in-progress build stack; a
//! singleton producer whose resolved inputs carry call scope fails with
//! `IllegalSingletonDependency` before the producer ever runs.

use std::sync::Arc;

use tracing::{debug, trace};
use typewire_domain::{Error, ParamInfo, ParamSpec, Result, ReturnValue, Scope, TypeKey, Value};

use crate::context::CallContext;
use crate::producer::Producer;
use crate::registry::{Binding, Registry};
use crate::singleton::SingletonStore;

pub(crate) struct Resolver<'a> {
    registry: &'a Registry,
    singletons: &'a SingletonStore,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(registry: &'a Registry, singletons: &'a SingletonStore) -> Self {
        Self {
            registry,
            singletons,
        }
    }

    /// Produce a value for the parameter `spec` declared by `required_by`.
    pub(crate) fn resolve(
        &self,
        ctx: &mut CallContext<'_>,
        spec: &ParamSpec,
        required_by: &str,
    ) -> Result<(Value, Scope)> {
        let key = spec
            .key()
            .ok_or_else(|| Error::missing_annotation(required_by, spec.name()))?;

        if key == TypeKey::of::<ReturnValue>() {
            let value: Value = Arc::new(ReturnValue::new(ctx.previous()));
            return Ok((value, Scope::Call));
        }
        if key == TypeKey::of::<ParamInfo>() {
            let value: Value = Arc::new(ParamInfo::new(spec.name(), key));
            return Ok((value, Scope::Call));
        }

        if let Some((value, scope)) = ctx.cached(key) {
            trace!(key = key.name(), ?scope, "call cache hit");
            return Ok((value, scope));
        }

        let binding = self
            .registry
            .lookup(key)
            .ok_or_else(|| Error::unresolvable(key.name(), required_by))?;

        match binding {
            Binding::Resolved(value) => {
                let value = Arc::clone(value);
                ctx.store(key, Arc::clone(&value), Scope::Global);
                Ok((value, Scope::Global))
            }
            Binding::State(name) => self.extract_state(ctx, key, name, required_by),
            Binding::Producer(producer) => self.resolve_via_producer(ctx, key, spec, producer),
        }
    }

    /// Lazy state extraction: the declared entry is required only when the
    /// bound type is actually demanded.
    fn extract_state(
        &self,
        ctx: &mut CallContext<'_>,
        key: TypeKey,
        name: &str,
        required_by: &str,
    ) -> Result<(Value, Scope)> {
        match ctx.state().get(name) {
            // The state map is caller-supplied; reject an entry whose
            // concrete type does not match the declared binding.
            Some(value) if (**value).type_id() == key.id() => {
                let value = Arc::clone(value);
                ctx.store(key, Arc::clone(&value), Scope::Call);
                Ok((value, Scope::Call))
            }
            _ => Err(Error::unresolvable(key.name(), required_by)),
        }
    }

    fn resolve_via_producer(
        &self,
        ctx: &mut CallContext<'_>,
        key: TypeKey,
        target: &ParamSpec,
        producer: &Producer,
    ) -> Result<(Value, Scope)> {
        if producer.is_singleton() {
            if let Some(value) = self.singletons.get(key) {
                ctx.store(key, Arc::clone(&value), Scope::Global);
                return Ok((value, Scope::Global));
            }
        }

        // Deferred error: an unannotated producer input surfaces the first
        // time the producer is demanded.
        for input in producer.params() {
            if input.key().is_none() {
                return Err(Error::missing_annotation(producer.name(), input.name()));
            }
        }
        if producer.is_asynchronous() {
            return Err(Error::unsupported_callable(producer.name()));
        }
        if ctx.in_progress(key) {
            return Err(Error::cyclic_dependency(key.name(), ctx.chain(key)));
        }

        ctx.push_in_progress(key);
        let inputs = self.resolve_inputs(ctx, producer, target, key);
        ctx.pop_in_progress();
        let inputs = inputs?;

        if producer.is_singleton() {
            // A process-wide value must never be built from per-call data;
            // checked before the producer is invoked.
            for (input, (_, scope)) in producer.params().iter().zip(&inputs) {
                if scope.is_call() {
                    return Err(Error::illegal_singleton_dependency(
                        producer.name(),
                        input.key().map_or("<unannotated>", |k| k.name()),
                    ));
                }
            }

            let args: Vec<Value> = inputs.iter().map(|(value, _)| Arc::clone(value)).collect();
            let value = self.singletons.get_or_try_init(key, || {
                debug!(producer = producer.name(), "invoking singleton producer");
                producer.produce(&args)
            })?;
            ctx.store(key, Arc::clone(&value), Scope::Global);
            Ok((value, Scope::Global))
        } else {
            debug!(producer = producer.name(), "invoking producer");
            let args: Vec<Value> = inputs.into_iter().map(|(value, _)| value).collect();
            let value = producer.produce(&args)?;
            ctx.store(key, Arc::clone(&value), Scope::Call);
            Ok((value, Scope::Call))
        }
    }

    fn resolve_inputs(
        &self,
        ctx: &mut CallContext<'_>,
        producer: &Producer,
        target: &ParamSpec,
        target_key: TypeKey,
    ) -> Result<Vec<(Value, Scope)>> {
        let mut inputs = Vec::with_capacity(producer.params().len());
        for input in producer.params() {
            if input.key() == Some(TypeKey::of::<ParamInfo>()) {
                // A producer's ParamInfo input describes the parameter its
                // own output fills, one level up.
                let info: Value = Arc::new(ParamInfo::new(target.name(), target_key));
                inputs.push((info, Scope::Call));
            } else {
                inputs.push(self.resolve(ctx, input, producer.name())?);
            }
        }
        Ok(inputs)
    }
}
