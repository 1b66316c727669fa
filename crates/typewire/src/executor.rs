//! Runs one pipeline invocation
//!
//! The executor drives an ordered sequence of callables as one logical
//! invocation: it pre-validates the whole pipeline, resolves every declared
//! parameter through the resolver, threads the previous-result value, and
//! lets a step's declared output override its type for the remaining steps.
//!
//! Pre-validation runs before anything executes: an asynchronous step or a
//! top-level parameter without a type annotation fails the invocation while
//! the cache is still empty and no callable has run.

use std::sync::Arc;

use tracing::debug;
use typewire_domain::{CallState, Error, Result, Scope, Value};

use crate::callable::Callable;
use crate::context::CallContext;
use crate::registry::Registry;
use crate::resolver::Resolver;
use crate::singleton::SingletonStore;

pub(crate) struct Executor<'a> {
    resolver: Resolver<'a>,
}

impl<'a> Executor<'a> {
    pub(crate) fn new(registry: &'a Registry, singletons: &'a SingletonStore) -> Self {
        Self {
            resolver: Resolver::new(registry, singletons),
        }
    }

    /// Execute `pipeline` against a fresh call context, returning the last
    /// step's result. An empty pipeline returns the initial sentinel.
    pub(crate) fn run(&self, pipeline: &[Callable], state: &CallState) -> Result<Value> {
        self.validate(pipeline)?;

        let mut ctx = CallContext::new(state);
        let mut result: Value = Arc::new(());

        for callable in pipeline {
            let mut args = Vec::with_capacity(callable.params().len());
            for spec in callable.params() {
                let (value, _) = self.resolver.resolve(&mut ctx, spec, callable.name())?;
                args.push(value);
            }

            debug!(callable = callable.name(), "invoking pipeline step");
            let returned = callable.call(&args)?;

            // The previous-result marker always tracks the latest step.
            ctx.set_previous(Arc::clone(&returned));

            // A declared output supersedes any cached value of that type,
            // state-extracted or produced, for the rest of the pipeline.
            if let Some(output) = callable.output() {
                ctx.store(output, Arc::clone(&returned), Scope::Call);
            }
            result = returned;
        }

        Ok(result)
    }

    fn validate(&self, pipeline: &[Callable]) -> Result<()> {
        for callable in pipeline {
            if callable.is_asynchronous() {
                return Err(Error::unsupported_callable(callable.name()));
            }
            for spec in callable.params() {
                if spec.key().is_none() {
                    return Err(Error::missing_annotation(callable.name(), spec.name()));
                }
            }
        }
        Ok(())
    }
}
