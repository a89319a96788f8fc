//! Attribute macros that run an `async fn` on the `core-async` runtime.
//!
//! `#[core_async::test]` turns an async test into a regular `#[test]` that
//! blocks on a current-thread runtime; `#[core_async::main]` does the same for
//! a binary entry point. Downstream crates never depend on Tokio's macros.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, ItemFn};

#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
    expand(attr, item, MacroKind::Test)
}

#[proc_macro_attribute]
pub fn main(attr: TokenStream, item: TokenStream) -> TokenStream {
    expand(attr, item, MacroKind::Main)
}

enum MacroKind {
    Test,
    Main,
}

impl MacroKind {
    fn name(&self) -> &'static str {
        match self {
            MacroKind::Test => "core_async::test",
            MacroKind::Main => "core_async::main",
        }
    }
}

fn expand(attr: TokenStream, item: TokenStream, kind: MacroKind) -> TokenStream {
    if !attr.is_empty() {
        let tokens = TokenStream2::from(attr);
        return syn::Error::new_spanned(
            tokens,
            format!("`#[{}]` does not accept arguments", kind.name()),
        )
        .to_compile_error()
        .into();
    }

    let input = parse_macro_input!(item as ItemFn);

    if input.sig.asyncness.is_none() {
        return syn::Error::new_spanned(
            input.sig.fn_token,
            format!("`#[{}]` requires an `async fn`", kind.name()),
        )
        .to_compile_error()
        .into();
    }

    if matches!(kind, MacroKind::Test) && !input.sig.inputs.is_empty() {
        return syn::Error::new_spanned(
            &input.sig.inputs,
            "`#[core_async::test]` functions cannot take arguments",
        )
        .to_compile_error()
        .into();
    }

    let ItemFn {
        attrs,
        vis,
        mut sig,
        block,
    } = input;
    sig.asyncness = None;

    let test_attr = match kind {
        MacroKind::Test => quote!(#[test]),
        MacroKind::Main => quote!(),
    };

    quote! {
        #(#attrs)*
        #test_attr
        #vis #sig {
            core_async::runtime::block_on(async move #block)
        }
    }
    .into()
}
