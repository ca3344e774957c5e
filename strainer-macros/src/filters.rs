//! Filter-set macros.
//!
//! This module contains:
//! - `#[filters]` - Attribute macro implementing `FilterSet` from an impl block

use proc_macro::TokenStream;
use quote::quote;
use std::collections::HashSet;
use syn::{
    Attribute, FnArg, ImplItem, ImplItemFn, ItemImpl, LitStr, Visibility, ext::IdentExt,
    parse_macro_input,
};

/// Options from a `#[filter(...)]` attribute on a method.
#[derive(Default)]
struct FilterOptions {
    present: bool,
    name: Option<String>,
    skip: bool,
}

/// Remove `#[filter(...)]` attributes from `attrs`, returning their options.
fn take_filter_options(attrs: &mut Vec<Attribute>) -> syn::Result<FilterOptions> {
    let mut options = FilterOptions::default();
    let mut kept = Vec::with_capacity(attrs.len());

    for attr in attrs.drain(..) {
        if !attr.path().is_ident("filter") {
            kept.push(attr);
            continue;
        }
        options.present = true;
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let lit: LitStr = meta.value()?.parse()?;
                options.name = Some(lit.value());
                Ok(())
            } else if meta.path.is_ident("skip") {
                options.skip = true;
                Ok(())
            } else {
                Err(meta.error("unknown filter attribute, expected `name` or `skip`"))
            }
        })?;
    }

    *attrs = kept;
    Ok(options)
}

/// Check that a public method can be called as a filter.
fn check_signature(method: &ImplItemFn) -> syn::Result<()> {
    let sig = &method.sig;
    if let Some(FnArg::Receiver(receiver)) = sig.inputs.first() {
        if receiver.reference.is_none() || receiver.mutability.is_some() {
            return Err(syn::Error::new_spanned(
                receiver,
                "filter methods must take `&self`",
            ));
        }
    }
    if let Some(asyncness) = &sig.asyncness {
        return Err(syn::Error::new_spanned(
            asyncness,
            "filter methods cannot be async",
        ));
    }
    if sig.generics.type_params().next().is_some() || sig.generics.const_params().next().is_some()
    {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "filter methods cannot have type or const parameters",
        ));
    }
    Ok(())
}

/// Implementation of the `#[filters]` macro.
pub fn filters_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return syn::Error::new(
            proc_macro2::Span::call_site(),
            "`#[filters]` takes no arguments",
        )
        .to_compile_error()
        .into();
    }

    let mut input = parse_macro_input!(item as ItemImpl);

    if let Some((_, path, _)) = &input.trait_ {
        return syn::Error::new_spanned(
            path,
            "`#[filters]` must be placed on an inherent impl block",
        )
        .to_compile_error()
        .into();
    }

    let mut registrations = Vec::new();
    let mut names = HashSet::new();

    for item in &mut input.items {
        let ImplItem::Fn(method) = item else {
            continue;
        };

        let options = match take_filter_options(&mut method.attrs) {
            Ok(options) => options,
            Err(e) => return e.to_compile_error().into(),
        };

        if !matches!(method.vis, Visibility::Public(_)) {
            if options.present {
                return syn::Error::new_spanned(
                    &method.sig.ident,
                    "`#[filter]` has no effect on private methods",
                )
                .to_compile_error()
                .into();
            }
            continue;
        }

        // Associated functions without a receiver are not filters.
        if options.skip || method.sig.receiver().is_none() {
            continue;
        }

        if let Err(e) = check_signature(method) {
            return e.to_compile_error().into();
        }

        let ident = &method.sig.ident;
        let name = options
            .name
            .unwrap_or_else(|| ident.unraw().to_string());

        if !names.insert(name.clone()) {
            return syn::Error::new_spanned(ident, format!("duplicate filter name `{}`", name))
                .to_compile_error()
                .into();
        }

        registrations.push(quote! {
            ops.add(#name, Self::#ident);
        });
    }

    let self_ty = &input.self_ty;
    let (impl_generics, _, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        #input

        impl #impl_generics ::strainer::FilterSet for #self_ty #where_clause {
            fn operations(ops: &mut ::strainer::Operations<Self>) {
                #(#registrations)*
            }
        }
    };

    TokenStream::from(expanded)
}
