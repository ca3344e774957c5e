//! # strainer-core
//!
//! Core traits for the Strainer sandboxed filter dispatcher.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! libraries that only need to *declare* filters, without pulling in the
//! registry and dispatcher from `strainer-std`.
//!
//! # Layers
//!
//! Strainer separates what a template may call from how it gets called:
//!
//! ## Operations ([`Operation`], [`Operations`])
//!
//! A plain Rust function `Fn(&T, A1, .., An) -> R` becomes an operation once
//! its parameters implement [`FromArg`] and its return value implements
//! [`IntoFilterResult`]. Arity and argument types are checked at call time
//! and reported as [`CallError`]s.
//!
//! ## Filter sets ([`FilterSet`], [`FromContext`])
//!
//! A filter set is a type whose instances carry the operations. A fresh
//! instance is constructed from the render context for every single call,
//! so no state survives between invocations.
//!
//! ## Providers ([`Provider`], [`BoundOperations`])
//!
//! The object-safe view of a filter set used by registries: a name, the
//! exposed operation names, and a way to bind an instance to a context.
//!
//! # Error Types
//!
//! - [`FilterError`] - Template-facing error taxonomy
//! - [`CallError`] - Failures raised while calling a single operation

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod args;
mod context;
mod error;
mod operation;
mod provider;
mod value;

// Re-exports
pub use args::{FromArg, IntoFilterResult};
pub use context::{Context, RenderContext};
pub use error::{BoxError, CallError, FilterError};
pub use operation::{Arity, ErasedOperation, FilterSet, FromContext, Operation, Operations};
pub use provider::{BoundOperations, FilterFn, Provider, Registrable};
pub use serde_json::{Map, Value};
pub use value::value_kind;
