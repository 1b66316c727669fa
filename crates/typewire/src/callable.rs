//! Pipeline step descriptors
//!
//! A [`Callable`] is one step of a pipeline: its declared parameters, an
//! optional declared output key, and the boxed invocation. Steps are usually
//! built from plain closures via [`Callable::new`]; [`Callable::from_parts`]
//! exposes the full descriptor for units the typed layer cannot express
//! (unannotated parameters, asynchronous units that must be rejected).

use std::fmt;

use typewire_domain::{ParamSpec, Result, TypeKey, Value};

use crate::extract::TypedFn;

/// Boxed type-erased invocation shared by callables and producers.
pub type InvokeFn = Box<dyn Fn(&[Value]) -> Result<Value> + Send + Sync>;

/// One step of a pipeline invocation.
pub struct Callable {
    name: String,
    params: Vec<ParamSpec>,
    output: Option<TypeKey>,
    return_key: Option<TypeKey>,
    asynchronous: bool,
    invoke: InvokeFn,
}

impl Callable {
    /// Build a step from a closure; parameter keys are inferred from the
    /// closure signature and named positionally (`arg0..argN`).
    pub fn new<Args, F>(name: impl Into<String>, f: F) -> Self
    where
        F: TypedFn<Args>,
    {
        let name = name.into();
        let unit = name.clone();
        Self {
            params: F::param_specs(),
            output: None,
            return_key: Some(F::return_key()),
            asynchronous: false,
            invoke: Box::new(move |args| f.call(&unit, args)),
            name,
        }
    }

    /// Build a step from an explicit descriptor.
    pub fn from_parts(
        name: impl Into<String>,
        params: Vec<ParamSpec>,
        output: Option<TypeKey>,
        invoke: InvokeFn,
    ) -> Self {
        Self {
            name: name.into(),
            params,
            output,
            return_key: output,
            asynchronous: false,
            invoke,
        }
    }

    /// Declare the step's return type as its output key, so the returned
    /// value overrides that type for the rest of the pipeline.
    pub fn bind_output(mut self) -> Self {
        self.output = self.return_key;
        self
    }

    /// Mark the step as asynchronous. The executor rejects such steps with
    /// `UnsupportedCallable` before anything runs.
    pub fn asynchronous(mut self) -> Self {
        self.asynchronous = true;
        self
    }

    /// Replace the positional parameter names, in declaration order.
    /// Needed when a producer introspects its consumer via `ParamInfo`.
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

    /// Diagnostic name of the step.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared parameters, in order.
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Declared output key, if any.
    pub fn output(&self) -> Option<TypeKey> {
        self.output
    }

    /// Whether the step was marked asynchronous.
    pub fn is_asynchronous(&self) -> bool {
        self.asynchronous
    }

    pub(crate) fn call(&self, args: &[Value]) -> Result<Value> {
        (self.invoke)(args)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("output", &self.output)
            .field("asynchronous", &self.asynchronous)
            .finish_non_exhaustive()
    }
}
