//! Handler attribute macro implementation

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_macro_input, FnArg, ItemFn};

/// Implementation of the `#[handler]` attribute macro
///
/// Transforms:
/// ```rust,ignore
/// #[handler]
/// pub async fn update(req: Request, form: Form<UpdatePostRequest>) -> Response { ... }
/// ```
///
/// Into:
/// ```rust,ignore
/// pub async fn update(__kit_req: ::kit_forms::Request) -> Response {
///     let req: Request = match <Request as ::kit_forms::FromRequest>::from_request(
///         ::std::clone::Clone::clone(&__kit_req),
///     ).await {
///         Ok(v) => v,
///         Err(e) => return Err(e.into()),
///     };
///     let form: Form<UpdatePostRequest> = match <Form<UpdatePostRequest> as ::kit_forms::FromRequest>::from_request(__kit_req).await {
///         Ok(v) => v,
///         Err(e) => return Err(e.into()),
///     };
///     // original body
/// }
/// ```
pub fn handler_impl(_attr: TokenStream, input: TokenStream) -> TokenStream {
    let input_fn = parse_macro_input!(input as ItemFn);

    let fn_vis = &input_fn.vis;
    let fn_name = &input_fn.sig.ident;
    let fn_generics = &input_fn.sig.generics;
    let where_clause = &input_fn.sig.generics.where_clause;
    let fn_output = &input_fn.sig.output;
    let fn_block = &input_fn.block;
    let fn_attrs = &input_fn.attrs;

    if input_fn.sig.asyncness.is_none() {
        return syn::Error::new_spanned(
            &input_fn.sig.fn_token,
            "#[handler] requires an async function",
        )
        .to_compile_error()
        .into();
    }

    let mut params = Vec::new();
    for input in &input_fn.sig.inputs {
        match input {
            FnArg::Typed(pat_type) => params.push(pat_type),
            FnArg::Receiver(receiver) => {
                return syn::Error::new_spanned(
                    receiver,
                    "#[handler] does not support methods with self receiver",
                )
                .to_compile_error()
                .into();
            }
        }
    }

    let req_ident = format_ident!("__kit_req");
    let last = params.len().saturating_sub(1);

    let extractions = params.iter().enumerate().map(|(index, pat_type)| {
        let param_pat = &pat_type.pat;
        let param_type = &pat_type.ty;

        // Every parameter but the last gets its own copy of the request
        let source = if index == last {
            quote! { #req_ident }
        } else {
            quote! { ::std::clone::Clone::clone(&#req_ident) }
        };

        quote! {
            let #param_pat: #param_type =
                match <#param_type as ::kit_forms::FromRequest>::from_request(#source).await {
                    Ok(v) => v,
                    Err(e) => return Err(e.into()),
                };
        }
    });

    let req_binding = if params.is_empty() {
        quote! { _: ::kit_forms::Request }
    } else {
        quote! { #req_ident: ::kit_forms::Request }
    };

    let output = quote! {
        #(#fn_attrs)*
        #fn_vis async fn #fn_name #fn_generics(#req_binding) #fn_output #where_clause {
            #(#extractions)*
            #fn_block
        }
    };

    output.into()
}
