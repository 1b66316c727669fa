//! # Domain Layer
//!
//! Core value types shared by every part of the engine.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Error taxonomy with reason codes |
//! | [`key`] | Type identity and value scopes |
//! | [`markers`] | Reserved marker types (`ReturnValue`, `ParamInfo`) |
//! | [`param`] | Declared parameter descriptors |
//! | [`value`] | Type-erased values and per-call state |

pub mod error;
pub mod key;
pub mod markers;
pub mod param;
pub mod value;

// Re-export commonly used types
pub use error::{Error, ErrorKind, Result};
pub use key::{Scope, TypeKey};
pub use markers::{ParamInfo, ReturnValue};
pub use param::ParamSpec;
pub use value::{CallState, Value};
