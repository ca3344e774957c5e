#![allow(dead_code)]

use std::sync::Once;
use strainer::{CallError, Context, FromContext, Value, value_kind};

// ============================================================================
// Logging
// ============================================================================

static INIT: Once = Once::new();

/// Route `tracing` output through the test harness; `RUST_LOG` picks the level.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

// ============================================================================
// Filter Sets
// ============================================================================

#[derive(Default)]
pub struct Text;

#[strainer::filters]
impl Text {
    pub fn upcase(&self, input: String) -> String {
        input.to_uppercase()
    }

    pub fn downcase(&self, input: String) -> String {
        input.to_lowercase()
    }

    pub fn append(&self, input: String, suffix: String) -> String {
        self.join(&input, &suffix)
    }

    pub fn truncate(&self, input: String, length: Option<i64>) -> Result<String, CallError> {
        let length = length.unwrap_or(50);
        if length < 0 {
            return Err(CallError::invalid("invalid truncate length"));
        }
        Ok(input.chars().take(length as usize).collect())
    }

    #[filter(name = "size")]
    pub fn length(&self, input: Value) -> usize {
        match input {
            Value::String(s) => s.chars().count(),
            Value::Array(items) => items.len(),
            Value::Object(map) => map.len(),
            _ => 0,
        }
    }

    pub fn r#type(&self, input: Value) -> &'static str {
        value_kind(&input)
    }

    #[filter(skip)]
    pub fn describe(&self) -> &'static str {
        "text filters"
    }

    pub fn shared() -> Self {
        Text
    }

    fn join(&self, left: &str, right: &str) -> String {
        format!("{left}{right}")
    }
}

/// Takes `upcase` over from [`Text`] when registered after it.
#[derive(Default)]
pub struct Shouting;

#[strainer::filters]
impl Shouting {
    pub fn upcase(&self, input: String) -> String {
        format!("{}!", input.to_uppercase())
    }

    pub fn whisper(&self, input: String) -> String {
        input.to_lowercase()
    }
}

/// Reads the `currency` register of the render context.
pub struct Money {
    currency: String,
}

impl FromContext<Context> for Money {
    fn from_context(context: &Context) -> Self {
        let currency = context
            .register("currency")
            .and_then(Value::as_str)
            .unwrap_or("USD");
        Self {
            currency: currency.to_string(),
        }
    }
}

#[strainer::filters]
impl Money {
    pub fn money(&self, amount: f64) -> String {
        format!("{amount:.2} {}", self.currency)
    }
}

/// Generic filter sets get a generic `FilterSet` implementation.
#[derive(Default)]
pub struct Tagged<T> {
    _tag: std::marker::PhantomData<fn() -> T>,
}

#[strainer::filters]
impl<T: 'static> Tagged<T> {
    pub fn tag(&self, input: String) -> String {
        format!("<{}>{input}", std::any::type_name::<T>())
    }
}
