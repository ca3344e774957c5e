//! Binding providers to render contexts.
//!
//! Every invocation gets its own instance: [`bind`] constructs a new
//! filter-set value from the context each time it is called and nothing is
//! cached, so an operation can never observe state left behind by an
//! earlier call.

use std::sync::Arc;
use strainer_core::{
    BoundOperations, CallError, FilterFn, FilterSet, FromContext, Operations, Provider,
    Registrable, Value,
};

/// Bind `provider` to `context`, producing a fresh instance.
pub fn bind<'a, C: 'static>(
    provider: &'a dyn Provider<C>,
    context: &'a C,
) -> Box<dyn BoundOperations + 'a> {
    #[cfg(feature = "tracing")]
    tracing::trace!(provider = provider.name(), "binding provider instance");
    provider.bind(context)
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let path = full.split('<').next().unwrap_or(full);
    path.rsplit("::").next().unwrap_or(path)
}

/// The provider for a [`FilterSet`].
///
/// The operation table is built once, when the module is created; binding
/// only constructs the instance.
pub struct FilterModule<T: FilterSet> {
    name: &'static str,
    ops: Operations<T>,
}

impl<T: FilterSet> FilterModule<T> {
    /// Create a module named after the filter-set type.
    pub fn new() -> Self {
        Self::named(short_type_name::<T>())
    }

    /// Create a module with an explicit name.
    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            ops: Operations::of(),
        }
    }

    /// The operation table.
    pub fn table(&self) -> &Operations<T> {
        &self.ops
    }
}

impl<T: FilterSet> Default for FilterModule<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, T> Provider<C> for FilterModule<T>
where
    T: FilterSet + FromContext<C>,
{
    fn name(&self) -> &str {
        self.name
    }

    fn operations(&self) -> Vec<&str> {
        self.ops.names().collect()
    }

    fn bind<'a>(&'a self, context: &'a C) -> Box<dyn BoundOperations + 'a> {
        Box::new(Bound {
            instance: T::from_context(context),
            ops: &self.ops,
            provider: self.name,
        })
    }
}

impl<C, T> From<FilterModule<T>> for Registrable<C>
where
    C: 'static,
    T: FilterSet + FromContext<C>,
{
    fn from(module: FilterModule<T>) -> Self {
        Registrable::Provider(Arc::new(module))
    }
}

/// A filter-set instance bound to one render context.
///
/// Constructed by [`bind`] for a single invocation.
pub struct Bound<'a, T> {
    instance: T,
    ops: &'a Operations<T>,
    provider: &'a str,
}

impl<T> Bound<'_, T> {
    /// The bound instance.
    pub fn instance(&self) -> &T {
        &self.instance
    }
}

impl<T: 'static> BoundOperations for Bound<'_, T> {
    fn contains(&self, name: &str) -> bool {
        self.ops.contains(name)
    }

    fn call(&self, name: &str, args: &[Value]) -> Result<Value, CallError> {
        match self.ops.get(name) {
            Some(op) => op.invoke(&self.instance, args),
            None => Err(CallError::Failed(
                format!("`{name}` is not an operation of {}", self.provider).into(),
            )),
        }
    }
}

/// A provider exposing a single named function.
///
/// Backs `FilterRegistry::register_fn`, the supported way to register a
/// closure.
pub struct FnProvider {
    name: String,
    func: FilterFn,
}

impl FnProvider {
    /// Create a provider exposing `func` as `name`.
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, CallError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }
}

impl<C> Provider<C> for FnProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn operations(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }

    fn bind<'a>(&'a self, _context: &'a C) -> Box<dyn BoundOperations + 'a> {
        Box::new(BoundFn { provider: self })
    }
}

struct BoundFn<'a> {
    provider: &'a FnProvider,
}

impl BoundOperations for BoundFn<'_> {
    fn contains(&self, name: &str) -> bool {
        self.provider.name == name
    }

    fn call(&self, name: &str, args: &[Value]) -> Result<Value, CallError> {
        if self.contains(name) {
            (self.provider.func)(args)
        } else {
            Err(CallError::Failed(
                format!("`{name}` is not an operation of {}", self.provider.name).into(),
            ))
        }
    }
}
