//! # strainer-std
//!
//! Standard implementations for the Strainer sandboxed filter dispatcher.
//!
//! This crate provides:
//! - **Registry**: [`FilterRegistry`], the name → provider table
//! - **Binding**: [`FilterModule`], [`Bound`] and [`bind`], which construct a
//!   fresh filter-set instance per invocation
//! - **Dispatch**: [`Dispatcher`], the per-render entry point applying the
//!   strict/lenient policy and error translation
//! - **Collection**: link-time provider registration (feature `inventory`)
//! - **Testing**: helpers for exercising filters in tests

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use strainer_core;

// Modules
pub mod binder;
#[cfg(feature = "inventory")]
pub mod collect;
pub mod dispatch;
pub mod registry;
pub mod testing;

pub use binder::{Bound, FilterModule, FnProvider, bind};
pub use dispatch::Dispatcher;
pub use registry::FilterRegistry;

#[cfg(feature = "inventory")]
pub use inventory;
