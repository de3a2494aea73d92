//! Route model binding
//!
//! A binding resolves a route parameter into a value before the action runs
//! and attaches it to the request as a named resource. Form requests built
//! from that request read the value back with `form.resource::<T>(name)`.
//!
//! ```rust,ignore
//! use kit_forms::routing::RouteBinding;
//! use kit_forms::{async_trait, FrameworkError};
//!
//! #[async_trait]
//! impl RouteBinding for Post {
//!     async fn from_route_param(value: &str) -> Result<Self, FrameworkError> {
//!         let id: u64 = value
//!             .parse()
//!             .map_err(|_| FrameworkError::param_parse(value, "u64"))?;
//!
//!         Post::find(id).ok_or_else(|| FrameworkError::model_not_found("Post"))
//!     }
//! }
//!
//! Router::new()
//!     .put("/posts/{post}", controllers::posts::update)
//!     .bind::<Post>("post");
//! ```

use crate::error::FrameworkError;
use async_trait::async_trait;

/// A value that can be resolved from a route parameter
///
/// - `Err(FrameworkError::ModelNotFound)` turns into a 404
/// - `Err(FrameworkError::ParamParse)` turns into a 400
#[async_trait]
pub trait RouteBinding: Sized + Send + Sync + 'static {
    async fn from_route_param(value: &str) -> Result<Self, FrameworkError>;
}
