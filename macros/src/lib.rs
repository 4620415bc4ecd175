use proc_macro::TokenStream;
use quote::quote;
use syn::{Ident, ItemFn, LitStr, parse_macro_input, spanned::Spanned};

const USAGE: &str = "rxrust_await_macro::test only accepts: #[rxrust_await_macro::test], \
                     #[rxrust_await_macro::test(local)], #[rxrust_await_macro::test(shared)], or \
                     string equivalents";

/// Marks a function as a test.
///
/// Sync functions become plain `#[test]`s. Async functions run on a tokio
/// runtime: `local` (the default) uses a current-thread runtime, `shared`
/// uses a multi-thread runtime so producers and the awaiting task can land
/// on different workers.
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
  let input = parse_macro_input!(item as ItemFn);

  let is_async = input.sig.asyncness.is_some();

  let raw_args = proc_macro2::TokenStream::from(attr);
  let flavor = if raw_args.is_empty() {
    None
  } else {
    if !is_async {
      return TokenStream::from(
        syn::Error::new(
          raw_args.span(),
          "rxrust_await_macro::test flavor args are only supported for async tests. Use \
           #[rxrust_await_macro::test] for sync tests, or make the function async.",
        )
        .to_compile_error(),
      );
    }

    let (name, span) = if let Ok(ident) = syn::parse2::<Ident>(raw_args.clone()) {
      (ident.to_string(), ident.span())
    } else if let Ok(lit) = syn::parse2::<LitStr>(raw_args.clone()) {
      (lit.value(), lit.span())
    } else {
      return TokenStream::from(syn::Error::new(raw_args.span(), USAGE).to_compile_error());
    };

    match name.as_str() {
      "local" => Some(quote!(flavor = "current_thread")),
      "shared" => Some(quote!(flavor = "multi_thread", worker_threads = 4)),
      _ => return TokenStream::from(syn::Error::new(span, USAGE).to_compile_error()),
    }
  };

  let native_attr = match (is_async, flavor) {
    (true, Some(args)) => quote!(#[tokio::test(#args)]),
    (true, None) => quote!(#[tokio::test]),
    (false, _) => quote!(#[test]),
  };

  let expanded = quote! {
      #native_attr
      #input
  };

  TokenStream::from(expanded)
}
