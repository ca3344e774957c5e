//! # Operations
//!
//! An operation is a plain Rust function whose first parameter is the
//! filter-set instance (`&T`) and whose remaining parameters are extracted
//! from the template arguments:
//!
//! ```rust,ignore
//! struct Text;
//!
//! impl Text {
//!     fn upcase(&self, input: String) -> String {
//!         input.to_uppercase()
//!     }
//! }
//!
//! let mut ops = Operations::new();
//! ops.add("upcase", Text::upcase);
//! ```
//!
//! Operations are stored type-erased in an [`Operations`] table so that a
//! single filter set can expose functions of different signatures.

use crate::{
    args::{FromArg, IntoFilterResult},
    error::CallError,
};
use serde_json::Value;
use std::{fmt, marker::PhantomData};

/// Number of arguments an operation accepts, subject included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    /// Arguments that must be supplied.
    pub required: usize,
    /// Trailing arguments that may be omitted.
    pub optional: usize,
}

impl Arity {
    /// Create an arity from required and optional counts.
    pub const fn new(required: usize, optional: usize) -> Self {
        Self { required, optional }
    }

    /// Derive the arity from the optionality of each parameter, in order.
    ///
    /// Only a trailing run of optional parameters may be omitted.
    pub fn of(optional: &[bool]) -> Self {
        let required = optional
            .iter()
            .rposition(|is_optional| !is_optional)
            .map_or(0, |last| last + 1);
        Self::new(required, optional.len() - required)
    }

    /// Largest accepted argument count.
    pub const fn max(&self) -> usize {
        self.required + self.optional
    }

    /// Whether `given` arguments are accepted.
    pub const fn accepts(&self, given: usize) -> bool {
        given >= self.required && given <= self.max()
    }

    /// Check an argument count, producing the arity error on mismatch.
    pub fn check(&self, given: usize) -> Result<(), CallError> {
        if self.accepts(given) {
            Ok(())
        } else {
            Err(CallError::arity(given, *self))
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.optional == 0 {
            write!(f, "{}", self.required)
        } else {
            write!(f, "{}..{}", self.required, self.max())
        }
    }
}

/// A function callable as a filter operation on instances of `T`.
///
/// Implemented for every `Fn(&T, A1, .., An) -> R` with up to twelve
/// extracted parameters. `Args` is the tuple of parameter types and only
/// serves to keep the implementations apart.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be used as a filter operation on `{T}`",
    label = "not a filter operation",
    note = "Operations take `&{T}` first; every other parameter must implement `FromArg` and the return type `IntoFilterResult`."
)]
pub trait Operation<T, Args>: Send + Sync + 'static {
    /// The accepted argument count.
    fn arity(&self) -> Arity;

    /// Check the arguments, extract them and call the function.
    fn invoke(&self, target: &T, args: &[Value]) -> Result<Value, CallError>;
}

/// Object-safe version of [`Operation`] used for storage in [`Operations`].
pub trait ErasedOperation<T>: Send + Sync {
    /// The accepted argument count.
    fn arity(&self) -> Arity;

    /// Call the operation.
    fn invoke(&self, target: &T, args: &[Value]) -> Result<Value, CallError>;
}

struct OperationFn<F, Args> {
    func: F,
    _marker: PhantomData<fn() -> Args>,
}

impl<T, F, Args> ErasedOperation<T> for OperationFn<F, Args>
where
    F: Operation<T, Args>,
    Args: 'static,
{
    fn arity(&self) -> Arity {
        self.func.arity()
    }

    fn invoke(&self, target: &T, args: &[Value]) -> Result<Value, CallError> {
        self.func.invoke(target, args)
    }
}

/// Macro to implement Operation for functions with N extracted parameters.
macro_rules! impl_operation {
    ($($A:ident),*) => {
        impl<T, F, R, $($A,)*> Operation<T, ($($A,)*)> for F
        where
            F: Fn(&T, $($A),*) -> R + Send + Sync + 'static,
            R: IntoFilterResult,
            $($A: FromArg,)*
        {
            fn arity(&self) -> Arity {
                Arity::of(&[$($A::OPTIONAL),*])
            }

            #[allow(non_snake_case, unused_mut, unused_variables, unused_assignments)]
            fn invoke(&self, target: &T, args: &[Value]) -> Result<Value, CallError> {
                self.arity().check(args.len())?;
                let mut position = 0;
                $(
                    let $A = $A::from_arg(args.get(position), position + 1)?;
                    position += 1;
                )*
                (self)(target, $($A),*).into_filter_result()
            }
        }
    };
}

impl_operation!();
impl_operation!(A1);
impl_operation!(A1, A2);
impl_operation!(A1, A2, A3);
impl_operation!(A1, A2, A3, A4);
impl_operation!(A1, A2, A3, A4, A5);
impl_operation!(A1, A2, A3, A4, A5, A6);
impl_operation!(A1, A2, A3, A4, A5, A6, A7);
impl_operation!(A1, A2, A3, A4, A5, A6, A7, A8);
impl_operation!(A1, A2, A3, A4, A5, A6, A7, A8, A9);
impl_operation!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10);
impl_operation!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10, A11);
impl_operation!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10, A11, A12);

/// A named table of operations over instances of `T`.
///
/// Names keep their declaration order. Adding a name twice replaces the
/// earlier operation in place.
pub struct Operations<T> {
    entries: Vec<(&'static str, Box<dyn ErasedOperation<T>>)>,
}

impl<T: 'static> Operations<T> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build the table declared by a filter set.
    pub fn of() -> Self
    where
        T: FilterSet,
    {
        let mut ops = Self::new();
        T::operations(&mut ops);
        ops
    }

    /// Add an operation under `name`.
    pub fn add<Args, F>(&mut self, name: &'static str, func: F) -> &mut Self
    where
        F: Operation<T, Args>,
        Args: 'static,
    {
        let op: Box<dyn ErasedOperation<T>> = Box::new(OperationFn {
            func,
            _marker: PhantomData,
        });
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = op,
            None => self.entries.push((name, op)),
        }
        self
    }

    /// Look up an operation by name.
    pub fn get(&self, name: &str) -> Option<&dyn ErasedOperation<T>> {
        self.entries
            .iter()
            .find(|(existing, _)| *existing == name)
            .map(|(_, op)| op.as_ref())
    }

    /// Whether an operation named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Operation names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    /// Get the number of operations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: 'static> Default for Operations<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Operations<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(name, _)| name))
            .finish()
    }
}

/// A type whose instances expose a set of named operations.
///
/// Usually implemented with the `#[filters]` attribute, which lists every
/// `pub fn` of an impl block. Only what `operations` adds is reachable from
/// templates.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not declare any filters",
    label = "missing `FilterSet` implementation",
    note = "Annotate an `impl {Self}` block with `#[filters]` or implement `FilterSet` by hand."
)]
pub trait FilterSet: Sized + Send + Sync + 'static {
    /// Add this set's operations to the table.
    fn operations(ops: &mut Operations<Self>);
}

/// Construct a filter-set instance for one invocation.
///
/// Every type with a `Default` implementation gets this for free. Types
/// that read render state implement it for their context type.
pub trait FromContext<C: ?Sized>: Sized {
    /// Build a fresh instance bound to `context`.
    fn from_context(context: &C) -> Self;
}

impl<C: ?Sized, T: Default> FromContext<C> for T {
    fn from_context(_context: &C) -> Self {
        T::default()
    }
}
