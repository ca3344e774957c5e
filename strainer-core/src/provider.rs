//! # Providers
//!
//! A provider is the object-safe face of a filter set: it names the
//! operations it exposes and binds a fresh instance to a render context on
//! request. Registries store providers behind `Arc<dyn Provider<C>>` and
//! never see the concrete filter-set type.

use crate::error::CallError;
use serde_json::Value;
use std::{fmt, sync::Arc};

/// A capability set of named operations.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a filter provider for contexts of type `{C}`",
    label = "missing `Provider` implementation",
    note = "Wrap a `FilterSet` in `FilterModule` to get a provider."
)]
pub trait Provider<C>: Send + Sync + 'static {
    /// Provider name used in diagnostics.
    fn name(&self) -> &str;

    /// Names of every operation this provider exposes.
    fn operations(&self) -> Vec<&str>;

    /// Construct a fresh instance bound to `context`.
    fn bind<'a>(&'a self, context: &'a C) -> Box<dyn BoundOperations + 'a>;
}

/// A provider instance bound to one render context.
///
/// Lives for a single invocation and is discarded afterwards.
pub trait BoundOperations {
    /// Whether the bound provider exposes `name`.
    fn contains(&self, name: &str) -> bool;

    /// Call the operation `name` with `args`.
    fn call(&self, name: &str, args: &[Value]) -> Result<Value, CallError>;
}

/// A bare filter function.
pub type FilterFn = Arc<dyn Fn(&[Value]) -> Result<Value, CallError> + Send + Sync>;

/// Anything that can be handed to a registry's `register`.
///
/// Only [`Registrable::Provider`] is accepted; a bare function carries no
/// operation names and is rejected with a type mismatch.
pub enum Registrable<C> {
    /// A provider exposing a set of named operations.
    Provider(Arc<dyn Provider<C>>),
    /// A single callable without a name.
    Function(FilterFn),
}

impl<C> Registrable<C> {
    /// Kind name of providers.
    pub const PROVIDER_KIND: &'static str = "provider/module";
    /// Kind name of bare functions.
    pub const FUNCTION_KIND: &'static str = "function/closure";

    /// Wrap a bare function.
    pub fn function<F>(func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, CallError> + Send + Sync + 'static,
    {
        Registrable::Function(Arc::new(func))
    }

    /// The kind of value this is, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Registrable::Provider(_) => Self::PROVIDER_KIND,
            Registrable::Function(_) => Self::FUNCTION_KIND,
        }
    }
}

impl<C> From<Arc<dyn Provider<C>>> for Registrable<C> {
    fn from(provider: Arc<dyn Provider<C>>) -> Self {
        Registrable::Provider(provider)
    }
}

impl<C: 'static> fmt::Debug for Registrable<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Registrable::Provider(provider) => f
                .debug_tuple("Provider")
                .field(&provider.name())
                .finish(),
            Registrable::Function(_) => f.write_str("Function"),
        }
    }
}
