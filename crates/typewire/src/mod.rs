//! # typewire
//!
//! A type-driven dependency-resolution engine. Given a pipeline of callables
//! whose parameters are declared by type, the engine supplies each
//! parameter's value by locating, constructing (or reusing) a producer for
//! that type, and threads results between pipeline steps. Process-wide
//! singleton values are distinguished from values scoped to one invocation.
//!
//! ## Module Map
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`callable`] | Pipeline step descriptors |
//! | [`executor`] | Runs one pipeline invocation |
//! | [`extract`] | Typed parameter extraction and closure binding |
//! | [`injector`] | The facade owning registry and singleton store |
//! | [`producer`] | Declared units that build one typed output |
//! | [`registry`] | Type-keyed bindings, validated at construction |
//! | [`resolver`] | The recursive resolution algorithm |
//! | [`singleton`] | Write-once process-lifetime value store |
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use typewire::{CallState, Callable, Injector, Producer, ResolvedValue};
//!
//! struct Config { greeting: &'static str }
//! struct Greeter { prefix: String }
//!
//! let producers = vec![
//!     Producer::new("greeter", |config: Arc<Config>| Greeter {
//!         prefix: config.greeting.to_string(),
//!     })
//!     .singleton(),
//! ];
//! let resolved = vec![ResolvedValue::new(Config { greeting: "hello" })];
//!
//! let injector = Injector::new(producers, vec![], resolved).unwrap();
//! let pipeline = [Callable::new("greet", |greeter: Arc<Greeter>| {
//!     format!("{}, world", greeter.prefix)
//! })];
//!
//! let out = injector.run(&pipeline, &CallState::new()).unwrap();
//! assert_eq!(out.downcast_ref::<String>().unwrap(), "hello, world");
//! ```

pub mod callable;
pub mod executor;
pub mod extract;
pub mod injector;
pub mod producer;
pub mod registry;
pub mod resolver;
pub mod singleton;

mod context;

// Re-export the domain surface alongside the engine types
pub use typewire_domain::{
    CallState, Error, ErrorKind, ParamInfo, ParamSpec, Result, ReturnValue, Scope, TypeKey, Value,
};

pub use callable::{Callable, InvokeFn};
pub use extract::{FromResolved, TypedFn};
pub use injector::Injector;
pub use producer::Producer;
pub use registry::{ResolvedValue, StateBinding};
