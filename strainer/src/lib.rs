//! # strainer - Sandboxed Filter Dispatch for Templates
//!
//! `strainer` decides which filters a template may call and calls them.
//! Only operations that were explicitly registered are reachable; every
//! invocation runs on a freshly constructed instance bound to the current
//! render context, so filters never share state across calls.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use strainer::prelude::*;
//!
//! #[derive(Default)]
//! struct Text;
//!
//! #[strainer::filters]
//! impl Text {
//!     pub fn upcase(&self, input: String) -> String {
//!         input.to_uppercase()
//!     }
//! }
//!
//! let registry = FilterRegistry::<Context>::new();
//! registry.register_set::<Text>()?;
//!
//! let ctx = Context::new();
//! let out = registry.dispatcher(&ctx).invoke("upcase", &[Value::from("abc")])?;
//! assert_eq!(out, Value::from("ABC"));
//! ```
//!
//! ## Unknown Filters
//!
//! With strict filters enabled on the context, calling an unregistered name
//! fails with [`FilterError::UndefinedFilter`]. Otherwise the first argument
//! is passed through unchanged (or `null` when there is none).
//!
//! ## Features
//!
//! - `macros` (default): the [`filters`] attribute
//! - `tracing`: `tracing` events for registration and dispatch
//! - `inventory`: link-time collection with [`submit_filters!`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use strainer_core::{
    // Operations
    Arity,
    // Errors
    BoxError,
    // Providers
    BoundOperations,
    CallError,
    // Context
    Context,
    ErasedOperation,
    FilterError,
    FilterFn,
    FilterSet,
    // Arguments and results
    FromArg,
    FromContext,
    IntoFilterResult,
    // Values
    Map,
    Operation,
    Operations,
    Provider,
    Registrable,
    RenderContext,
    Value,
    value_kind,
};

pub use strainer_std::{Bound, Dispatcher, FilterModule, FilterRegistry, FnProvider, bind};

#[cfg(feature = "macros")]
pub use strainer_macros::filters;

#[cfg(feature = "inventory")]
pub use strainer_std::{collect::ProviderRegistration, submit_filters};

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use strainer_std::testing::*;
}

/// Prelude module - common imports for Strainer.
///
/// # Usage
///
/// ```rust,ignore
/// use strainer::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Errors
        CallError,
        // Context
        Context,
        // Dispatch
        Dispatcher,
        FilterError,
        FilterModule,
        FilterRegistry,
        // Core traits
        FilterSet,
        FromContext,
        RenderContext,
        Value,
    };
}
