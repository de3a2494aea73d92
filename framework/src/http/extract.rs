//! Request extraction traits for handler parameter injection
//!
//! This module provides the `FromRequest` trait which enables the `#[handler]`
//! macro to build typed action arguments from the incoming request.

use super::Request;
use crate::error::FrameworkError;
use async_trait::async_trait;

/// Trait for types that can be extracted from an HTTP request
///
/// This trait is used by the `#[handler]` macro to automatically
/// extract and inject typed parameters into controller actions.
///
/// # Implementations
///
/// - `Request` - passes the request context through unchanged
/// - [`Form<R>`](crate::Form) - authorizes and validates a form request
///
/// # Example
///
/// The `#[handler]` macro uses this trait to transform:
///
/// ```rust,ignore
/// #[handler]
/// pub async fn update(req: Request, form: Form<UpdatePostRequest>) -> Response {
///     // ...
/// }
/// ```
///
/// Into:
///
/// ```rust,ignore
/// pub async fn update(__kit_req: Request) -> Response {
///     let req = <Request as FromRequest>::from_request(__kit_req.clone()).await?;
///     let form = <Form<UpdatePostRequest> as FromRequest>::from_request(__kit_req).await?;
///     // ...
/// }
/// ```
#[async_trait]
pub trait FromRequest: Sized + Send {
    /// Extract Self from the incoming request
    ///
    /// Returns `Err(FrameworkError)` if extraction fails, which will be
    /// converted to an appropriate HTTP error response.
    async fn from_request(req: Request) -> Result<Self, FrameworkError>;
}

/// Request passes through unchanged
#[async_trait]
impl FromRequest for Request {
    async fn from_request(req: Request) -> Result<Self, FrameworkError> {
        Ok(req)
    }
}
