//! Testing utilities for Strainer.
//!
//! This module provides utilities to make testing filters and dispatch easier.
//!
//! # Features
//!
//! - [`CallLog`]: A shared log of filter calls
//! - [`TestContext`]: A render context that counts provider construction
//! - [`CountingFilters`]: A filter set that exposes its own instance identity

use parking_lot::Mutex;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use strainer_core::{FilterSet, FromContext, Operations, RenderContext, Value};

// ============================================================================
// Call Log
// ============================================================================

/// A cloneable log of filter calls.
///
/// # Example
///
/// ```rust,ignore
/// let log = CallLog::new();
/// let ctx = TestContext::lenient().with_log(log.clone());
///
/// dispatcher.invoke("echo", &[json!("a")])?;
/// assert_eq!(log.entries(), vec!["echo"]);
/// ```
#[derive(Clone, Default)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn record(&self, entry: impl Into<String>) {
        self.entries.lock().push(entry.into());
    }

    /// Get a clone of the recorded entries.
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    /// Get the number of recorded entries.
    pub fn count(&self) -> usize {
        self.entries.lock().len()
    }

    /// Clear all recorded entries.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

// ============================================================================
// Test Context
// ============================================================================

/// A render context that counts how many filter instances were built from it.
#[derive(Clone, Default)]
pub struct TestContext {
    strict: bool,
    constructed: Arc<AtomicUsize>,
    log: CallLog,
}

impl TestContext {
    /// A context where unknown filters pass through.
    pub fn lenient() -> Self {
        Self::default()
    }

    /// A context where unknown filters are an error.
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    /// Use `log` for the calls made through this context.
    pub fn with_log(mut self, log: CallLog) -> Self {
        self.log = log;
        self
    }

    /// The call log.
    pub fn log(&self) -> &CallLog {
        &self.log
    }

    /// Number of filter instances constructed so far.
    pub fn constructed(&self) -> usize {
        self.constructed.load(Ordering::SeqCst)
    }

    fn next_serial(&self) -> usize {
        self.constructed.fetch_add(1, Ordering::SeqCst) + 1
    }
}

impl RenderContext for TestContext {
    fn strict_filters(&self) -> bool {
        self.strict
    }
}

// ============================================================================
// Counting Filters
// ============================================================================

/// A filter set whose instances report their own identity.
///
/// Operations:
/// - `echo(subject)`: logs the call and returns the subject
/// - `serial(subject)`: returns the 1-based construction number of the instance
/// - `remember(subject)`: stores the subject in the instance and returns how
///   many values that instance holds; always `1` when instances are fresh
pub struct CountingFilters {
    serial: usize,
    log: CallLog,
    seen: Mutex<Vec<Value>>,
}

impl CountingFilters {
    fn echo(&self, subject: Value) -> Value {
        self.log.record("echo");
        subject
    }

    fn serial(&self, _subject: Value) -> usize {
        self.log.record("serial");
        self.serial
    }

    fn remember(&self, subject: Value) -> usize {
        self.log.record("remember");
        let mut seen = self.seen.lock();
        seen.push(subject);
        seen.len()
    }
}

impl FilterSet for CountingFilters {
    fn operations(ops: &mut Operations<Self>) {
        ops.add("echo", CountingFilters::echo)
            .add("serial", CountingFilters::serial)
            .add("remember", CountingFilters::remember);
    }
}

impl FromContext<TestContext> for CountingFilters {
    fn from_context(context: &TestContext) -> Self {
        Self {
            serial: context.next_serial(),
            log: context.log.clone(),
            seen: Mutex::new(Vec::new()),
        }
    }
}
