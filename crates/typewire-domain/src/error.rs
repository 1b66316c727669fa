//! Error taxonomy with reason codes
//!
//! Every failure surfaces as one public [`Error`] carrying a reason code
//! ([`ErrorKind`]) callers can branch on. These are wiring errors, not
//! transient faults: a failed `run` offers no retry or fallback, the remedy
//! is fixing the dependency declarations.

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Reason code identifying an [`Error`] variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A parameter has no declared type.
    MissingAnnotation,
    /// A required type has no producer, resolved value, or state binding.
    Unresolvable,
    /// A singleton producer's dependency subgraph reaches a call-scoped value.
    IllegalSingletonDependency,
    /// An asynchronous unit appeared where a synchronous invocation is required.
    UnsupportedCallable,
    /// Two sources claim the same type key at registration.
    ConflictingBinding,
    /// A type key reappeared in its own in-progress dependency chain.
    CyclicDependency,
}

/// Main error type for the dependency-resolution engine
#[derive(Error, Debug)]
pub enum Error {
    /// A parameter lacks a type annotation
    #[error("parameter `{parameter}` of `{unit}` has no declared type")]
    MissingAnnotation {
        /// Callable or producer declaring the parameter
        unit: String,
        /// The undeclared parameter's name
        parameter: String,
    },

    /// No source can supply the required type
    #[error("no producer, resolved value, or state binding serves `{type_name}` (required by `{required_by}`)")]
    Unresolvable {
        /// Name of the type that could not be resolved
        type_name: &'static str,
        /// Unit whose parameter demanded the type
        required_by: String,
    },

    /// A process-wide value would be built from per-call data
    #[error("singleton producer `{producer}` depends on call-scoped `{dependency}`")]
    IllegalSingletonDependency {
        /// The offending singleton producer
        producer: String,
        /// Name of the call-scoped type it reached
        dependency: &'static str,
    },

    /// An asynchronous unit in a synchronous pipeline
    #[error("`{unit}` is asynchronous; only direct synchronous invocation is supported")]
    UnsupportedCallable {
        /// The offending callable or producer
        unit: String,
    },

    /// Two sources registered for one type key
    #[error("`{type_name}` is bound by more than one producer, resolved value, or state binding")]
    ConflictingBinding {
        /// Name of the doubly-bound type
        type_name: &'static str,
    },

    /// A dependency chain loops back on itself
    #[error("cyclic dependency while resolving `{type_name}` (chain: {chain})")]
    CyclicDependency {
        /// The type whose resolution re-entered itself
        type_name: &'static str,
        /// The in-progress chain, outermost first
        chain: String,
    },
}

impl Error {
    /// Create a missing-annotation error
    pub fn missing_annotation<U: Into<String>, P: Into<String>>(unit: U, parameter: P) -> Self {
        Self::MissingAnnotation {
            unit: unit.into(),
            parameter: parameter.into(),
        }
    }

    /// Create an unresolvable-type error
    pub fn unresolvable<U: Into<String>>(type_name: &'static str, required_by: U) -> Self {
        Self::Unresolvable {
            type_name,
            required_by: required_by.into(),
        }
    }

    /// Create an illegal-singleton-dependency error
    pub fn illegal_singleton_dependency<P: Into<String>>(
        producer: P,
        dependency: &'static str,
    ) -> Self {
        Self::IllegalSingletonDependency {
            producer: producer.into(),
            dependency,
        }
    }

    /// Create an unsupported-callable error
    pub fn unsupported_callable<U: Into<String>>(unit: U) -> Self {
        Self::UnsupportedCallable { unit: unit.into() }
    }

    /// Create a conflicting-binding error
    pub fn conflicting_binding(type_name: &'static str) -> Self {
        Self::ConflictingBinding { type_name }
    }

    /// Create a cyclic-dependency error
    pub fn cyclic_dependency<C: Into<String>>(type_name: &'static str, chain: C) -> Self {
        Self::CyclicDependency {
            type_name,
            chain: chain.into(),
        }
    }

    /// Reason code for this error, for callers that branch without matching
    /// on payloads.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingAnnotation { .. } => ErrorKind::MissingAnnotation,
            Self::Unresolvable { .. } => ErrorKind::Unresolvable,
            Self::IllegalSingletonDependency { .. } => ErrorKind::IllegalSingletonDependency,
            Self::UnsupportedCallable { .. } => ErrorKind::UnsupportedCallable,
            Self::ConflictingBinding { .. } => ErrorKind::ConflictingBinding,
            Self::CyclicDependency { .. } => ErrorKind::CyclicDependency,
        }
    }
}
