//! Error types for Strainer.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`FilterError`] - Template-facing errors returned by registration and dispatch
//! - [`CallError`] - Errors raised while a single operation is being called

use crate::operation::Arity;
use std::{backtrace::Backtrace, sync::Arc};
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Template-facing error type for all Strainer operations.
///
/// Host runtime failures never cross the template boundary as their own
/// types: argument problems are folded into [`FilterError::Argument`] with
/// the original [`CallError`] kept as the source.
#[derive(Error, Debug)]
pub enum FilterError {
    /// A value that is not a provider was handed to `register`.
    #[error("wrong argument type {actual} (expected {expected})")]
    TypeMismatch {
        /// The kind `register` accepts.
        expected: &'static str,
        /// The kind that was actually supplied.
        actual: &'static str,
    },

    /// An unregistered filter was invoked under strict filters.
    #[error("undefined filter {0}")]
    UndefinedFilter(String),

    /// A registered filter was called with incompatible arguments.
    ///
    /// Displays the underlying message verbatim.
    #[error("{message}")]
    Argument {
        /// The invoked filter name.
        filter: String,
        /// Name of the provider that implements the filter.
        provider: String,
        /// The original diagnostic.
        message: String,
        /// The original call-time error.
        #[source]
        source: CallError,
        /// Where the original error was raised, when it captured one.
        backtrace: Option<Arc<Backtrace>>,
    },

    /// The filter failed for a reason other than its arguments.
    #[error(transparent)]
    Failed(BoxError),
}

impl FilterError {
    /// Translate a call-time error raised by `filter` of `provider`.
    pub fn from_call(filter: &str, provider: &str, err: CallError) -> Self {
        match err {
            CallError::Failed(inner) => FilterError::Failed(inner),
            other => FilterError::Argument {
                filter: filter.to_string(),
                provider: provider.to_string(),
                message: other.to_string(),
                backtrace: other.shared_backtrace(),
                source: other,
            },
        }
    }

    /// The backtrace of the original argument error, if one was captured.
    pub fn backtrace(&self) -> Option<&Backtrace> {
        match self {
            FilterError::Argument { backtrace, .. } => backtrace.as_deref(),
            _ => None,
        }
    }

    /// Returns true for argument errors.
    pub fn is_argument_error(&self) -> bool {
        matches!(self, FilterError::Argument { .. })
    }
}

/// Errors raised while calling a single operation.
#[derive(Error, Debug)]
pub enum CallError {
    /// The number of arguments does not fit the operation's arity.
    #[error("wrong number of arguments (given {given}, expected {expected})")]
    Arity {
        /// Number of arguments supplied, subject included.
        given: usize,
        /// Arity of the operation.
        expected: Arity,
        /// Captured where the count was checked.
        backtrace: Arc<Backtrace>,
    },

    /// An argument could not be converted to the parameter type.
    #[error("wrong argument type {actual} for argument {position} (expected {expected})")]
    ArgumentType {
        /// 1-based argument position; position 1 is the filter subject.
        position: usize,
        /// The kind the parameter accepts.
        expected: &'static str,
        /// The kind that was supplied.
        actual: &'static str,
        /// Captured where the argument was extracted.
        backtrace: Arc<Backtrace>,
    },

    /// The operation rejected an argument value.
    #[error("{0}")]
    Invalid(String),

    /// Any other failure inside the operation.
    #[error(transparent)]
    Failed(BoxError),
}

impl CallError {
    /// Create a [`CallError::Arity`] error, capturing a backtrace.
    pub fn arity(given: usize, expected: Arity) -> Self {
        CallError::Arity {
            given,
            expected,
            backtrace: Arc::new(Backtrace::capture()),
        }
    }

    /// Create a [`CallError::ArgumentType`] error, capturing a backtrace.
    pub fn argument_type(position: usize, expected: &'static str, actual: &'static str) -> Self {
        CallError::ArgumentType {
            position,
            expected,
            actual,
            backtrace: Arc::new(Backtrace::capture()),
        }
    }

    /// Create an [`CallError::Invalid`] error with a message.
    pub fn invalid(message: impl Into<String>) -> Self {
        CallError::Invalid(message.into())
    }

    /// Returns true when the error describes an argument problem.
    pub fn is_argument_error(&self) -> bool {
        !matches!(self, CallError::Failed(_))
    }

    /// The backtrace captured when the error was raised.
    ///
    /// Only arity and argument-type errors capture one. Whether it holds
    /// frames depends on `RUST_BACKTRACE`, as for [`Backtrace::capture`].
    pub fn backtrace(&self) -> Option<&Backtrace> {
        self.shared_backtrace_ref().map(|backtrace| &**backtrace)
    }

    fn shared_backtrace_ref(&self) -> Option<&Arc<Backtrace>> {
        match self {
            CallError::Arity { backtrace, .. } | CallError::ArgumentType { backtrace, .. } => {
                Some(backtrace)
            }
            CallError::Invalid(_) | CallError::Failed(_) => None,
        }
    }

    fn shared_backtrace(&self) -> Option<Arc<Backtrace>> {
        self.shared_backtrace_ref().cloned()
    }
}

impl From<BoxError> for CallError {
    fn from(err: BoxError) -> Self {
        match err.downcast::<CallError>() {
            Ok(call) => *call,
            Err(other) => CallError::Failed(other),
        }
    }
}
