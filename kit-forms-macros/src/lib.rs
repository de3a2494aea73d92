//! Procedural macros for kit-forms

use proc_macro::TokenStream;

mod handler;

/// Attribute macro for controller actions
///
/// Turns an async action with any number of extractable parameters into a
/// route handler taking a single `Request`. Every parameter is extracted
/// through `FromRequest`, in declaration order. The first failing
/// extraction answers the request and later parameters are never built.
///
/// # Example
///
/// ```rust,ignore
/// use kit_forms::{handler, json, Form, Request, Response};
///
/// #[handler]
/// pub async fn update(req: Request, form: Form<UpdatePostRequest>) -> Response {
///     // form was authorized (else 403) and validated (else 422)
///     json(serde_json::Value::Object(form.safe().all().clone()))
/// }
/// ```
#[proc_macro_attribute]
pub fn handler(attr: TokenStream, input: TokenStream) -> TokenStream {
    handler::handler_impl(attr, input)
}
