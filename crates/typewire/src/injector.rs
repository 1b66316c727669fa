//! The facade owning registry and singleton store
//!
//! An [`Injector`] is constructed once from its producers, state bindings,
//! and pre-resolved values, then drives any number of pipeline invocations.
//! Construction validates the registry; `run` is the single public entry
//! point for execution. Concurrent runs share the immutable registry and
//! the singleton store, while every run owns its own call-scoped state.

use tracing::info;
use typewire_domain::{CallState, Result, Value};

use crate::callable::Callable;
use crate::executor::Executor;
use crate::producer::Producer;
use crate::registry::{Registry, ResolvedValue, StateBinding};
use crate::singleton::SingletonStore;

/// The dependency-resolution engine's facade.
pub struct Injector {
    registry: Registry,
    singletons: SingletonStore,
}

impl Injector {
    /// Build an injector from its declared sources.
    ///
    /// Fails with `ConflictingBinding` when two sources claim the same type
    /// key. The registry is immutable afterwards; singleton values are
    /// created lazily on first demand and live until the injector is
    /// dropped.
    pub fn new(
        producers: Vec<Producer>,
        state_bindings: Vec<StateBinding>,
        resolved: Vec<ResolvedValue>,
    ) -> Result<Self> {
        let registry = Registry::build(producers, state_bindings, resolved)?;
        info!(
            producers = registry.producer_count(),
            bindings = registry.binding_count(),
            "injector constructed"
        );
        Ok(Self {
            registry,
            singletons: SingletonStore::new(),
        })
    }

    /// Run `pipeline` as one invocation and return the last step's result.
    ///
    /// Each run gets a fresh call-scoped cache, discarded in full when the
    /// run returns or fails; no partial result is ever returned. `state`
    /// need only contain the entries the pipeline actually demands.
    pub fn run(&self, pipeline: &[Callable], state: &CallState) -> Result<Value> {
        Executor::new(&self.registry, &self.singletons).run(pipeline, state)
    }
}

impl std::fmt::Debug for Injector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Injector")
            .field("producers", &self.registry.producer_count())
            .field("bindings", &self.registry.binding_count())
            .finish_non_exhaustive()
    }
}
