//! # Render Context
//!
//! The dispatcher only needs one thing from the context of a render: whether
//! unknown filters are an error. Everything else a context carries is opaque
//! host state that filter sets may read while being constructed (see
//! [`FromContext`](crate::FromContext)).

use serde_json::Value;
use std::collections::HashMap;

/// The context of a single render as seen by the dispatcher.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be used as a render context",
    label = "missing `RenderContext` implementation",
    note = "Implement `RenderContext` and report whether unknown filters are an error."
)]
pub trait RenderContext: Send + Sync {
    /// Whether invoking an unregistered filter is an error.
    fn strict_filters(&self) -> bool;
}

impl<C: RenderContext + ?Sized> RenderContext for &C {
    fn strict_filters(&self) -> bool {
        (**self).strict_filters()
    }
}

// A missing context behaves leniently.
impl<C: RenderContext> RenderContext for Option<C> {
    fn strict_filters(&self) -> bool {
        self.as_ref().is_some_and(RenderContext::strict_filters)
    }
}

impl RenderContext for () {
    fn strict_filters(&self) -> bool {
        false
    }
}

/// A ready-made render context.
///
/// Carries the strict-filters flag and named registers: host-supplied values
/// such as the current locale, a currency, or a base URL.
///
/// # Example
///
/// ```rust
/// use strainer_core::{Context, RenderContext};
///
/// let ctx = Context::new()
///     .with_strict_filters(true)
///     .with_register("locale", "fr");
///
/// assert!(ctx.strict_filters());
/// assert_eq!(ctx.register("locale").and_then(|v| v.as_str()), Some("fr"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    strict_filters: bool,
    registers: HashMap<String, Value>,
}

impl Context {
    /// Create a lenient context without registers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context that rejects unknown filters.
    pub fn strict() -> Self {
        Self::new().with_strict_filters(true)
    }

    /// Set whether unknown filters are an error.
    pub fn with_strict_filters(mut self, strict: bool) -> Self {
        self.strict_filters = strict;
        self
    }

    /// Add a register.
    pub fn with_register(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_register(name, value);
        self
    }

    /// Add or replace a register (mutable version).
    pub fn set_register(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.registers.insert(name.into(), value.into());
    }

    /// Get a register by name.
    pub fn register(&self, name: &str) -> Option<&Value> {
        self.registers.get(name)
    }

    /// All registers.
    pub fn registers(&self) -> &HashMap<String, Value> {
        &self.registers
    }
}

impl RenderContext for Context {
    fn strict_filters(&self) -> bool {
        self.strict_filters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_context_defaults_to_lenient() {
        let ctx = Context::new();
        assert!(!ctx.strict_filters());
        assert!(ctx.registers().is_empty());
    }

    #[test]
    fn test_strict_context() {
        assert!(Context::strict().strict_filters());
        assert!(!Context::new().with_strict_filters(false).strict_filters());
    }

    #[test]
    fn test_registers() {
        let mut ctx = Context::new().with_register("currency", "EUR");
        ctx.set_register("precision", 2);
        assert_eq!(ctx.register("currency"), Some(&json!("EUR")));
        assert_eq!(ctx.register("precision"), Some(&json!(2)));
        assert_eq!(ctx.register("missing"), None);
    }

    #[test]
    fn test_absent_context_is_lenient() {
        assert!(!None::<Context>.strict_filters());
        assert!(Some(Context::strict()).strict_filters());
        assert!(!().strict_filters());
        assert!((&Context::strict()).strict_filters());
    }
}
