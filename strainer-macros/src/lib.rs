use proc_macro::TokenStream;

mod filters;

/// Declare the `pub fn` methods of an impl block as filters.
///
/// Every public method taking `&self` becomes an operation named after the
/// method; private methods and associated functions are never exposed.
///
/// ```rust,ignore
/// #[derive(Default)]
/// struct Text;
///
/// #[strainer::filters]
/// impl Text {
///     pub fn upcase(&self, input: String) -> String {
///         input.to_uppercase()
///     }
///
///     #[filter(name = "type")]
///     pub fn kind(&self, input: Value) -> &'static str {
///         strainer::value_kind(&input)
///     }
///
///     #[filter(skip)]
///     pub fn helper(&self) {}
/// }
/// ```
#[proc_macro_attribute]
pub fn filters(attr: TokenStream, item: TokenStream) -> TokenStream {
    filters::filters_impl(attr, item)
}
