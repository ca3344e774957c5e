//! The filter registry.
//!
//! Maps every externally visible filter name to the provider that
//! implements it. Names are case-sensitive and unique: registering a
//! provider that exposes an existing name takes that name over, while the
//! previous provider keeps its other names.
//!
//! # Concurrency
//!
//! Readers load an immutable snapshot of the name table and never block.
//! Writers serialize on a mutex, build the next table and publish it in a
//! single swap, so all names of one provider appear together.

use crate::{binder::FnProvider, dispatch::Dispatcher};
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::{collections::HashMap, fmt, sync::Arc};
use strainer_core::{
    CallError, FilterError, FilterSet, FromContext, Provider, Registrable, RenderContext, Value,
};

type Table<C> = HashMap<String, Arc<dyn Provider<C>>>;

/// A name → provider table for contexts of type `C`.
///
/// Build it once during application setup and share it (usually via `Arc`)
/// with every render.
///
/// # Example
/// ```ignore
/// let registry = FilterRegistry::<Context>::new();
/// registry.register_set::<TextFilters>()?;
///
/// let ctx = Context::new();
/// let value = registry.dispatcher(&ctx).invoke("upcase", &[json!("abc")])?;
/// ```
pub struct FilterRegistry<C> {
    table: ArcSwap<Table<C>>,
    writer: Mutex<()>,
}

impl<C: 'static> FilterRegistry<C> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            table: ArcSwap::from_pointee(HashMap::new()),
            writer: Mutex::new(()),
        }
    }

    /// Register a provider under every operation name it exposes.
    ///
    /// Fails with [`FilterError::TypeMismatch`] for anything that is not a
    /// provider.
    pub fn register(&self, item: impl Into<Registrable<C>>) -> Result<(), FilterError> {
        match item.into() {
            Registrable::Provider(provider) => {
                self.insert_provider(provider);
                Ok(())
            }
            other => Err(FilterError::TypeMismatch {
                expected: Registrable::<C>::PROVIDER_KIND,
                actual: other.kind(),
            }),
        }
    }

    /// Register a single closure under `name`.
    pub fn register_fn<F>(&self, name: impl Into<String>, func: F)
    where
        F: Fn(&[Value]) -> Result<Value, CallError> + Send + Sync + 'static,
    {
        self.insert_provider(Arc::new(FnProvider::new(name, func)));
    }

    pub(crate) fn insert_provider(&self, provider: Arc<dyn Provider<C>>) {
        let _guard = self.writer.lock();
        let mut next: Table<C> = (**self.table.load()).clone();
        for name in provider.operations() {
            let previous = next.insert(name.to_string(), Arc::clone(&provider));
            #[cfg(feature = "tracing")]
            if let Some(previous) = previous {
                tracing::debug!(
                    filter = name,
                    previous = previous.name(),
                    provider = provider.name(),
                    "filter overwritten"
                );
            }
            #[cfg(not(feature = "tracing"))]
            let _ = previous;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(
            provider = provider.name(),
            filters = provider.operations().len(),
            "registered filter provider"
        );
        self.table.store(Arc::new(next));
    }

    /// Whether `name` is a registered filter.
    pub fn is_registered(&self, name: &str) -> bool {
        self.table.load().contains_key(name)
    }

    /// The provider registered for `name`.
    pub fn provider_for(&self, name: &str) -> Option<Arc<dyn Provider<C>>> {
        self.table.load().get(name).cloned()
    }

    /// All registered filter names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.table.load().keys().cloned().collect();
        names.sort();
        names
    }

    /// Get the number of registered filter names.
    pub fn len(&self) -> usize {
        self.table.load().len()
    }

    /// Check if no filter is registered.
    pub fn is_empty(&self) -> bool {
        self.table.load().is_empty()
    }

    /// Create an independent registry starting from the current filters.
    ///
    /// Registrations on the fork do not affect this registry and the other
    /// way round, which lets a template add local filters on top of the
    /// application-wide set.
    pub fn fork(&self) -> Self {
        Self {
            table: ArcSwap::new(self.table.load_full()),
            writer: Mutex::new(()),
        }
    }

    /// Create a dispatcher for one render.
    pub fn dispatcher<'a>(&'a self, context: &'a C) -> Dispatcher<'a, C>
    where
        C: RenderContext,
    {
        Dispatcher::new(self, context)
    }

    /// Register the filter set `T`.
    pub fn register_set<T>(&self) -> Result<(), FilterError>
    where
        T: FilterSet + FromContext<C>,
    {
        self.register(crate::binder::FilterModule::<T>::new())
    }
}

impl<C: 'static> Default for FilterRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: 'static> fmt::Debug for FilterRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.table.load();
        let mut entries: Vec<(&str, &str)> = table
            .iter()
            .map(|(name, provider)| (name.as_str(), provider.name()))
            .collect();
        entries.sort();
        f.debug_map().entries(entries).finish()
    }
}
