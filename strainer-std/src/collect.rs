//! # Link-time Provider Collection
//!
//! Filter sets can be submitted from anywhere in the program with
//! [`submit_filters!`](crate::submit_filters) and gathered into a registry
//! at startup with [`FilterRegistry::collected`].
//!
//! # Example
//!
//! ```rust,ignore
//! strainer::submit_filters!(Context, TextFilters);
//!
//! let registry = FilterRegistry::<Context>::collected();
//! assert!(registry.is_registered("upcase"));
//! ```

use crate::{binder::FilterModule, registry::FilterRegistry};
use std::{
    any::{Any, TypeId},
    sync::Arc,
};
use strainer_core::{FilterSet, FromContext, Provider};

/// Registration entry for a filter set in the global collection.
///
/// This struct is submitted to `inventory` for automatic collection.
pub struct ProviderRegistration {
    context: fn() -> TypeId,
    name: fn() -> &'static str,
    build: fn() -> Box<dyn Any + Send + Sync>,
}

inventory::collect!(ProviderRegistration);

fn build<C, T>() -> Box<dyn Any + Send + Sync>
where
    C: 'static,
    T: FilterSet + FromContext<C>,
{
    let provider: Arc<dyn Provider<C>> = Arc::new(FilterModule::<T>::new());
    Box::new(provider)
}

impl ProviderRegistration {
    /// Registration of filter set `T` for contexts of type `C`.
    pub const fn of<C, T>() -> Self
    where
        C: 'static,
        T: FilterSet + FromContext<C>,
    {
        Self {
            context: TypeId::of::<C>,
            name: std::any::type_name::<T>,
            build: build::<C, T>,
        }
    }

    /// Full type name of the filter set.
    pub fn name(&self) -> &'static str {
        (self.name)()
    }

    fn provider<C: 'static>(&self) -> Option<Arc<dyn Provider<C>>> {
        if (self.context)() != TypeId::of::<C>() {
            return None;
        }
        (self.build)()
            .downcast::<Arc<dyn Provider<C>>>()
            .ok()
            .map(|provider| *provider)
    }
}

impl<C: 'static> FilterRegistry<C> {
    /// Build a registry from every filter set submitted for `C`.
    ///
    /// Registrations are applied in order of their type names, so overlaps
    /// resolve the same way on every run.
    pub fn collected() -> Self {
        let registry = Self::new();
        let mut entries: Vec<&ProviderRegistration> =
            inventory::iter::<ProviderRegistration>.into_iter().collect();
        entries.sort_by_key(|entry| entry.name());

        for entry in entries {
            if let Some(provider) = entry.provider::<C>() {
                #[cfg(feature = "tracing")]
                tracing::debug!(filter_set = entry.name(), "collected filter set");
                registry.insert_provider(provider);
            }
        }
        registry
    }
}

/// Submit a filter set for collection by [`FilterRegistry::collected`].
///
/// ```rust,ignore
/// submit_filters!(Context, TextFilters);
/// ```
#[macro_export]
macro_rules! submit_filters {
    ($context:ty, $set:ty) => {
        $crate::inventory::submit! {
            $crate::collect::ProviderRegistration::of::<$context, $set>()
        }
    };
}
