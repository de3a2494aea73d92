//! Form requests: authorization and validation bound to one action parameter
//!
//! A form request is declared by implementing [`FormRequest`] on a marker
//! type. Using `Form<MyRequest>` as a `#[handler]` parameter makes the
//! binder construct the instance, authorize it, validate the input and only
//! then run the action.
//!
//! # Example
//!
//! ```rust,ignore
//! use kit_forms::validation::{self, Rules};
//! use kit_forms::{async_trait, handler, json, Deserialize, Form, FormRequest, Response, Serialize, Validate};
//!
//! #[derive(Deserialize, Serialize, Validate)]
//! pub struct PostRules {
//!     #[serde(deserialize_with = "validation::trim")]
//!     pub title: String,
//!     pub slug: String,
//! }
//!
//! pub struct UpdatePostRequest;
//!
//! #[async_trait]
//! impl FormRequest for UpdatePostRequest {
//!     type Schema = PostRules;
//!
//!     fn rules(_form: &Form<Self>) -> Rules<PostRules> {
//!         Rules::new()
//!     }
//!
//!     async fn authorize(form: &Form<Self>) -> bool {
//!         form.header("x-api-key").is_some()
//!     }
//! }
//!
//! #[handler]
//! pub async fn update(form: Form<UpdatePostRequest>) -> Response {
//!     // Only reached when authorized (else 403) and valid (else 422)
//!     json(serde_json::Value::Object(form.safe().only(&["slug"])))
//! }
//! ```

mod provider;
mod validated_input;

pub use provider::{FormRequestBinding, FormRequestProvider};
pub use validated_input::ValidatedInput;

use crate::config::FormRequestConfig;
use crate::error::FrameworkError;
use crate::http::{FromRequest, Request};
use crate::validation::{Payload, Rules};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use validator::Validate;

/// Authorization and validation contract of a form request
///
/// Only [`rules`](FormRequest::rules) must be provided. The hooks run in the
/// order `before -> validation -> after`, once per
/// [`Form::validate_payload`] call.
#[async_trait]
pub trait FormRequest: Sized + Send + Sync + 'static {
    /// Schema the request input is validated against
    type Schema: DeserializeOwned + Serialize + Validate + Send;

    /// Validation rules for this request
    fn rules(form: &Form<Self>) -> Rules<Self::Schema>;

    /// Determine if the caller may make this request
    ///
    /// Returning `false` results in a 403 Forbidden response.
    async fn authorize(_form: &Form<Self>) -> bool {
        true
    }

    /// Runs before validation; the payload is still unset
    async fn before(_form: &mut Form<Self>) {}

    /// Runs after validation; the payload is set and may be changed
    /// through [`Form::validated_mut`]
    async fn after(_form: &mut Form<Self>) {}
}

/// One form request instance, bound to one request context
///
/// `Form` dereferences to [`Request`], so query strings, headers, cookies,
/// route params and resources are read straight off the form and `&Form<R>`
/// can be passed wherever `&Request` is expected. `Form` defines no member
/// that `Request` also defines.
pub struct Form<R> {
    request: Request,
    config: FormRequestConfig,
    payload: Option<Payload>,
    _definition: PhantomData<fn() -> R>,
}

impl<R: FormRequest> Form<R> {
    /// Create an instance over `request`, using the registered
    /// [`FormRequestBinding`] configuration (or the defaults)
    ///
    /// Resources attached to the request travel with it onto the instance.
    pub fn new(request: Request) -> Self {
        let config = FormRequestBinding::resolve()
            .map(|binding| binding.config().clone())
            .unwrap_or_default();
        Self::with_config(request, config)
    }

    /// Create an instance with an explicit configuration
    pub fn with_config(request: Request, config: FormRequestConfig) -> Self {
        Self {
            request,
            config,
            payload: None,
            _definition: PhantomData,
        }
    }

    /// Run the request's authorization check
    pub async fn authorize(&self) -> bool {
        R::authorize(self).await
    }

    /// Run `before`, validate the input against `rules()`, store the payload, run `after`
    ///
    /// A validation failure is returned as `FrameworkError::Validation` (422)
    /// and `after` does not run.
    pub async fn validate_payload(&mut self) -> Result<(), FrameworkError> {
        R::before(self).await;

        let rules = R::rules(self);
        let input = match rules.input() {
            Some(_) => Payload::new(),
            None if self.config.include_query => self.request.all()?,
            None => self.request.body_input()?,
        };

        let payload = rules.validate(input).inspect_err(|err| {
            if let FrameworkError::Validation(errors) = err {
                tracing::debug!(
                    request = std::any::type_name::<R>(),
                    fields = ?errors.errors.keys().collect::<Vec<_>>(),
                    "form request validation failed"
                );
            }
        })?;
        self.payload = Some(payload);

        R::after(self).await;
        Ok(())
    }

    /// The validated payload, `None` until `validate_payload()` has completed
    pub fn validated(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    /// Mutable access to the validated payload (used by `after` hooks)
    pub fn validated_mut(&mut self) -> Option<&mut Payload> {
        self.payload.as_mut()
    }

    /// A fresh read-only view over the validated payload
    ///
    /// Before validation the view is empty.
    pub fn safe(&self) -> ValidatedInput<'_> {
        match &self.payload {
            Some(payload) => ValidatedInput::new(Cow::Borrowed(payload)),
            None => ValidatedInput::new(Cow::Owned(Payload::new())),
        }
    }

    /// Deserialize the validated payload back into the schema type
    pub fn typed(&self) -> Result<R::Schema, FrameworkError> {
        let payload = self.payload.clone().ok_or(FrameworkError::PayloadUnset)?;
        serde_json::from_value(serde_json::Value::Object(payload)).map_err(|e| {
            FrameworkError::internal(format!(
                "validated payload no longer matches {}: {}",
                std::any::type_name::<R::Schema>(),
                e
            ))
        })
    }

    /// The configuration this instance was created with
    pub fn config(&self) -> &FormRequestConfig {
        &self.config
    }

    /// The underlying request context
    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn into_request(self) -> Request {
        self.request
    }
}

impl<R> Deref for Form<R> {
    type Target = Request;

    fn deref(&self) -> &Request {
        &self.request
    }
}

impl<R> DerefMut for Form<R> {
    fn deref_mut(&mut self) -> &mut Request {
        &mut self.request
    }
}

impl<R> AsRef<Request> for Form<R> {
    fn as_ref(&self) -> &Request {
        &self.request
    }
}

impl<R> fmt::Debug for Form<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Form")
            .field("definition", &std::any::type_name::<R>())
            .field("request", &self.request)
            .field("payload", &self.payload)
            .finish()
    }
}

/// Construct, authorize and validate: the binder's per-parameter step
#[async_trait]
impl<R: FormRequest> FromRequest for Form<R> {
    async fn from_request(req: Request) -> Result<Self, FrameworkError> {
        let mut form = Form::<R>::new(req);

        if !form.authorize().await {
            tracing::debug!(
                request = std::any::type_name::<R>(),
                path = form.path(),
                "form request authorization denied"
            );
            return Err(FrameworkError::Forbidden {
                message: form.config.forbidden_message.clone(),
            });
        }

        form.validate_payload().await?;
        Ok(form)
    }
}
