//! Laravel-style form requests for a hyper web framework
//!
//! A form request gathers the authorization check and the validation rules
//! of one action in a single type. Declaring `Form<MyRequest>` as a
//! `#[handler]` parameter authorizes (403) and validates (422) the request
//! before the action body runs.
//!
//! ```rust,ignore
//! use kit_forms::{handler, json, Form, Response};
//!
//! #[handler]
//! pub async fn update(form: Form<UpdatePostRequest>) -> Response {
//!     json(serde_json::Value::Object(form.safe().all().clone()))
//! }
//! ```

pub mod config;
pub mod container;
pub mod error;
pub mod form_request;
pub mod http;
pub mod routing;
pub mod server;
pub mod testing;
pub mod validation;

pub use config::{Config, FormRequestConfig, ServerConfig};
pub use container::provider::ServiceProvider;
pub use container::{App, Container};
pub use error::{FrameworkError, ValidationErrors};
pub use form_request::{
    Form, FormRequest, FormRequestBinding, FormRequestProvider, ValidatedInput,
};
pub use http::{json, text, FromRequest, HttpResponse, Request, Resources, Response, ResponseExt};
pub use routing::{RouteBinding, Router};
pub use server::Server;
pub use validation::{Payload, Rules};

// Re-export for macro generated code and request definitions
pub use async_trait::async_trait;
pub use kit_forms_macros::handler;
pub use serde::{Deserialize, Serialize};
pub use serde_json;
pub use validator::Validate;
