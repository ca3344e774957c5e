//! # Filter Dispatch
//!
//! The [`Dispatcher`] is the only path from a template to host code. It is
//! created once per render, bound to that render's context, and resolves
//! each filter application against its registry:
//!
//! 1. A registered name binds a fresh provider instance to the context and
//!    calls the operation. Argument problems come back as
//!    [`FilterError::Argument`] carrying the original message.
//! 2. An unknown name fails with [`FilterError::UndefinedFilter`] when the
//!    context asks for strict filters.
//! 3. Otherwise the unknown filter is a no-op returning its subject (the
//!    first argument), or `null` when there is none.
//!
//! # Example
//!
//! ```rust,ignore
//! let ctx = Context::new();
//! let dispatcher = Dispatcher::new(&registry, &ctx);
//!
//! assert_eq!(dispatcher.invoke("upcase", &[json!("abc")])?, json!("ABC"));
//! assert_eq!(dispatcher.invoke("missing", &[json!("abc")])?, json!("abc"));
//! ```

use crate::{binder::bind, registry::FilterRegistry};
use strainer_core::{FilterError, RenderContext, Value};

/// Per-render filter dispatcher.
pub struct Dispatcher<'a, C> {
    registry: &'a FilterRegistry<C>,
    context: &'a C,
}

impl<'a, C: RenderContext + 'static> Dispatcher<'a, C> {
    /// Create a dispatcher for one render.
    pub fn new(registry: &'a FilterRegistry<C>, context: &'a C) -> Self {
        Self { registry, context }
    }

    /// The render context.
    pub fn context(&self) -> &'a C {
        self.context
    }

    /// Whether `name` resolves to a registered filter.
    pub fn is_invokable(&self, name: &str) -> bool {
        self.registry.is_registered(name)
    }

    /// Apply the filter `name` to `args`.
    ///
    /// `args[0]` is the filter's subject; the rest are the arguments written
    /// after the filter name in the template.
    pub fn invoke(&self, name: &str, args: &[Value]) -> Result<Value, FilterError> {
        let Some(provider) = self.registry.provider_for(name) else {
            return self.fallback(name, args);
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(
            filter = name,
            provider = provider.name(),
            args = args.len(),
            "invoking filter"
        );

        let bound = bind(provider.as_ref(), self.context);
        bound.call(name, args).map_err(|err| {
            #[cfg(feature = "tracing")]
            tracing::debug!(filter = name, provider = provider.name(), error = %err, "filter call failed");
            FilterError::from_call(name, provider.name(), err)
        })
    }

    fn fallback(&self, name: &str, args: &[Value]) -> Result<Value, FilterError> {
        if self.context.strict_filters() {
            return Err(FilterError::UndefinedFilter(name.to_string()));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(filter = name, "unknown filter passed through");

        Ok(args.first().cloned().unwrap_or(Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use strainer_core::{CallError, Context, FilterSet, Operations};

    #[derive(Default)]
    struct Text;

    impl Text {
        fn upcase(&self, input: String) -> String {
            input.to_uppercase()
        }

        fn truncate(&self, input: String, length: Option<i64>) -> Result<String, CallError> {
            let length = length.unwrap_or(50);
            if length < 0 {
                return Err(CallError::invalid("length must not be negative"));
            }
            Ok(input.chars().take(length as usize).collect())
        }

        fn explode(&self, _input: Value) -> Result<Value, std::io::Error> {
            Err(std::io::Error::other("boom"))
        }

        fn divided_by(&self, input: f64, divisor: f64) -> f64 {
            input / divisor
        }
    }

    impl FilterSet for Text {
        fn operations(ops: &mut Operations<Self>) {
            ops.add("upcase", Text::upcase)
                .add("truncate", Text::truncate)
                .add("explode", Text::explode)
                .add("divided_by", Text::divided_by);
        }
    }

    fn registry() -> FilterRegistry<Context> {
        let registry = FilterRegistry::new();
        registry.register_set::<Text>().unwrap();
        registry
    }

    #[test]
    fn test_registered_filter_is_called() {
        let registry = registry();
        let ctx = Context::new();
        let dispatcher = Dispatcher::new(&registry, &ctx);
        assert!(dispatcher.is_invokable("upcase"));
        assert_eq!(dispatcher.invoke("upcase", &[json!("abc")]).unwrap(), json!("ABC"));
    }

    #[test]
    fn test_unknown_filter_passes_subject_through() {
        let registry = registry();
        let ctx = Context::new();
        let dispatcher = registry.dispatcher(&ctx);
        assert_eq!(
            dispatcher.invoke("missing", &[json!("abc"), json!(1)]).unwrap(),
            json!("abc")
        );
        assert_eq!(dispatcher.invoke("missing", &[]).unwrap(), Value::Null);
    }

    #[test]
    fn test_unknown_filter_under_strict_filters() {
        let registry = registry();
        let ctx = Context::strict();
        let err = registry
            .dispatcher(&ctx)
            .invoke("missing", &[json!("abc")])
            .unwrap_err();
        assert!(matches!(err, FilterError::UndefinedFilter(ref name) if name == "missing"));
        assert_eq!(err.to_string(), "undefined filter missing");
    }

    #[test]
    fn test_arity_error_is_translated() {
        let registry = registry();
        let ctx = Context::new();
        let err = registry
            .dispatcher(&ctx)
            .invoke("upcase", &[json!("a"), json!("b")])
            .unwrap_err();
        assert!(err.is_argument_error());
        assert_eq!(
            err.to_string(),
            "wrong number of arguments (given 2, expected 1)"
        );
    }

    #[test]
    fn test_invalid_argument_is_translated() {
        let registry = registry();
        let ctx = Context::strict();
        let err = registry
            .dispatcher(&ctx)
            .invoke("truncate", &[json!("abc"), json!(-1)])
            .unwrap_err();
        assert!(err.is_argument_error());
        assert_eq!(err.to_string(), "length must not be negative");
    }

    #[test]
    fn test_other_failures_are_not_argument_errors() {
        let registry = registry();
        let ctx = Context::new();
        let err = registry
            .dispatcher(&ctx)
            .invoke("explode", &[json!(1)])
            .unwrap_err();
        assert!(matches!(err, FilterError::Failed(_)));
        assert_eq!(err.to_string(), "boom");
    }

    fn apply<C: RenderContext + 'static>(
        registry: &FilterRegistry<C>,
        context: &C,
        name: &str,
        args: &[Value],
    ) -> Result<Value, FilterError> {
        registry.dispatcher(context).invoke(name, args)
    }

    #[test]
    fn test_non_finite_result_is_a_failure() {
        let registry = registry();
        let ctx = Context::new();
        let dispatcher = registry.dispatcher(&ctx);
        assert_eq!(
            dispatcher.invoke("divided_by", &[json!(3), json!(2)]).unwrap(),
            json!(1.5)
        );

        let err = dispatcher
            .invoke("divided_by", &[json!(1), json!(0)])
            .unwrap_err();
        assert!(matches!(err, FilterError::Failed(_)));
        assert_eq!(err.to_string(), "filter returned non-finite number inf");
    }

    #[test]
    fn test_dispatch_through_generic_context() {
        let registry = registry();
        assert_eq!(
            apply(&registry, &Context::new(), "upcase", &[json!("abc")]).unwrap(),
            json!("ABC")
        );
        assert!(apply(&registry, &Context::strict(), "missing", &[]).is_err());

        let lenient = FilterRegistry::<()>::new();
        assert_eq!(apply(&lenient, &(), "missing", &[]).unwrap(), Value::Null);
        assert_eq!(format!("{lenient:?}"), "{}");
    }

    #[test]
    fn test_absent_context_is_lenient() {
        let registry = FilterRegistry::<Option<Context>>::new();
        let ctx: Option<Context> = None;
        let dispatcher = registry.dispatcher(&ctx);
        assert_eq!(dispatcher.invoke("anything", &[json!(3)]).unwrap(), json!(3));
    }
}
