//! Declared units that build one typed output
//!
//! A [`Producer`] converts zero or more typed inputs into one typed output.
//! Non-singleton producers run at most once per invocation (their output is
//! memoized in the call-scoped cache); singleton producers run at most once
//! per process and must not depend on call-scoped data.

use std::fmt;

use typewire_domain::{ParamSpec, Result, TypeKey, Value};

use crate::callable::InvokeFn;
use crate::extract::TypedFn;

/// A registered unit producing one typed output from typed inputs.
pub struct Producer {
    name: String,
    output: TypeKey,
    params: Vec<ParamSpec>,
    singleton: bool,
    asynchronous: bool,
    factory: InvokeFn,
}

impl Producer {
    /// Build a producer from a closure; the output key is the closure's
    /// return type, input keys are inferred from its parameters.
    pub fn new<Args, F>(name: impl Into<String>, f: F) -> Self
    where
        F: TypedFn<Args>,
    {
        let name = name.into();
        let unit = name.clone();
        Self {
            output: F::return_key(),
            params: F::param_specs(),
            singleton: false,
            asynchronous: false,
            factory: Box::new(move |args| f.call(&unit, args)),
            name,
        }
    }

    /// Build a producer from an explicit descriptor.
    pub fn from_parts(
        name: impl Into<String>,
        output: TypeKey,
        params: Vec<ParamSpec>,
        factory: InvokeFn,
    ) -> Self {
        Self {
            name: name.into(),
            output,
            params,
            singleton: false,
            asynchronous: false,
            factory,
        }
    }

    /// Mark the producer singleton: its output lives for the whole process
    /// and is shared across invocations.
    pub fn singleton(mut self) -> Self {
        self.singleton = true;
        self
    }

    /// Mark the producer asynchronous. The resolver rejects such producers
    /// with `UnsupportedCallable` before invoking them.
    pub fn asynchronous(mut self) -> Self {
        self.asynchronous = true;
        self
    }

    /// Replace the positional input names, in declaration order.
    pub fn param_names<I>(mut self, names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let specs = std::mem::take(&mut self.params);
        let mut names = names.into_iter();
        self.params = specs
            .into_iter()
            .map(|spec| match names.next() {
                Some(name) => spec.renamed(name),
                None => spec,
            })
            .collect();
        self
    }

    /// Diagnostic name of the producer.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key of the produced type.
    pub fn output(&self) -> TypeKey {
        self.output
    }

    /// Declared inputs, in order.
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Whether the producer is marked singleton.
    pub fn is_singleton(&self) -> bool {
        self.singleton
    }

    /// Whether the producer was marked asynchronous.
    pub fn is_asynchronous(&self) -> bool {
        self.asynchronous
    }

    pub(crate) fn produce(&self, args: &[Value]) -> Result<Value> {
        (self.factory)(args)
    }
}

impl fmt::Debug for Producer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer")
            .field("name", &self.name)
            .field("output", &self.output)
            .field("params", &self.params)
            .field("singleton", &self.singleton)
            .field("asynchronous", &self.asynchronous)
            .finish_non_exhaustive()
    }
}
