//! Integration tests for filter dispatch.

#![cfg(feature = "macros")]

mod common;

use common::{Money, Text, init_tracing};
use serde_json::json;
use std::error::Error;
use strainer::{CallError, Context, FilterError, FilterRegistry};

fn text_registry() -> FilterRegistry<Context> {
    let registry = FilterRegistry::new();
    registry.register_set::<Text>().unwrap();
    registry
}

#[test]
fn test_registered_filter_is_called() {
    init_tracing();
    let registry = text_registry();
    let ctx = Context::new();
    let dispatcher = registry.dispatcher(&ctx);

    assert_eq!(dispatcher.invoke("upcase", &[json!("abc")]).unwrap(), json!("ABC"));
    assert_eq!(
        dispatcher.invoke("append", &[json!("abc"), json!("def")]).unwrap(),
        json!("abcdef")
    );
}

#[test]
fn test_unknown_filter_passes_subject_through() {
    let registry = text_registry();
    let ctx = Context::new();
    let dispatcher = registry.dispatcher(&ctx);

    assert_eq!(dispatcher.invoke("missing", &[json!("abc")]).unwrap(), json!("abc"));
    assert_eq!(
        dispatcher.invoke("missing", &[json!(1), json!(2)]).unwrap(),
        json!(1)
    );
    assert_eq!(dispatcher.invoke("missing", &[]).unwrap(), json!(null));
}

#[test]
fn test_unknown_filter_is_an_error_in_strict_mode() {
    let registry = text_registry();
    let ctx = Context::strict();
    let dispatcher = registry.dispatcher(&ctx);

    let err = dispatcher.invoke("missing", &[json!("abc")]).unwrap_err();
    assert!(matches!(&err, FilterError::UndefinedFilter(name) if name == "missing"));
    assert_eq!(err.to_string(), "undefined filter missing");

    // Registered filters still work.
    assert_eq!(dispatcher.invoke("upcase", &[json!("abc")]).unwrap(), json!("ABC"));
}

#[test]
fn test_wrong_arity_becomes_argument_error() {
    let registry = text_registry();
    let ctx = Context::new();
    let dispatcher = registry.dispatcher(&ctx);

    let err = dispatcher
        .invoke("upcase", &[json!("a"), json!("b")])
        .unwrap_err();
    assert!(err.is_argument_error());
    assert_eq!(err.to_string(), "wrong number of arguments (given 2, expected 1)");

    assert!(err.backtrace().is_some());

    let source = err.source().unwrap();
    assert!(matches!(
        source.downcast_ref::<CallError>(),
        Some(CallError::Arity { given: 2, .. })
    ));

    let err = dispatcher.invoke("truncate", &[]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "wrong number of arguments (given 0, expected 1..2)"
    );
}

#[test]
fn test_argument_error_names_filter_and_provider() {
    let registry = text_registry();
    let ctx = Context::new();
    let dispatcher = registry.dispatcher(&ctx);

    let err = dispatcher.invoke("upcase", &[json!(5)]).unwrap_err();
    match err {
        FilterError::Argument {
            filter,
            provider,
            message,
            ..
        } => {
            assert_eq!(filter, "upcase");
            assert_eq!(provider, "Text");
            assert_eq!(
                message,
                "wrong argument type number for argument 1 (expected string)"
            );
        }
        other => panic!("expected an argument error, got {other:?}"),
    }
}

#[test]
fn test_invalid_argument_from_operation() {
    let registry = text_registry();
    let ctx = Context::new();
    let dispatcher = registry.dispatcher(&ctx);

    assert_eq!(
        dispatcher.invoke("truncate", &[json!("abcdef"), json!(3)]).unwrap(),
        json!("abc")
    );
    assert_eq!(
        dispatcher.invoke("truncate", &[json!("abcdef"), json!(2.0)]).unwrap(),
        json!("ab")
    );

    let err = dispatcher
        .invoke("truncate", &[json!("abcdef"), json!(-1)])
        .unwrap_err();
    assert!(err.is_argument_error());
    assert_eq!(err.to_string(), "invalid truncate length");
}

#[test]
fn test_other_failures_are_not_argument_errors() {
    let registry = text_registry();
    registry.register_fn("explode", |_args| {
        Err(CallError::Failed(std::io::Error::other("boom").into()))
    });
    let ctx = Context::new();

    let err = registry.dispatcher(&ctx).invoke("explode", &[]).unwrap_err();
    assert!(matches!(err, FilterError::Failed(_)));
    assert!(!err.is_argument_error());
    assert_eq!(err.to_string(), "boom");
}

#[test]
fn test_filter_set_reads_render_context() {
    let registry = FilterRegistry::new();
    registry.register_set::<Money>().unwrap();

    let usd = Context::new();
    let eur = Context::new().with_register("currency", "EUR");

    assert_eq!(
        registry.dispatcher(&usd).invoke("money", &[json!(1.5)]).unwrap(),
        json!("1.50 USD")
    );
    assert_eq!(
        registry.dispatcher(&eur).invoke("money", &[json!(1.5)]).unwrap(),
        json!("1.50 EUR")
    );
}

#[test]
fn test_is_invokable() {
    let registry = text_registry();
    let ctx = Context::new();
    let dispatcher = registry.dispatcher(&ctx);

    assert!(dispatcher.is_invokable("upcase"));
    assert!(!dispatcher.is_invokable("missing"));
}
