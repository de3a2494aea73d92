//! Service providers
//!
//! A provider groups the container bindings of one feature so an application
//! can enable the feature with a single call.
//!
//! # Example
//!
//! ```rust,ignore
//! use kit_forms::{App, Container, ServiceProvider};
//!
//! pub struct CacheProvider;
//!
//! impl ServiceProvider for CacheProvider {
//!     fn name(&self) -> &'static str {
//!         "app/cache"
//!     }
//!
//!     fn register(&self, container: &mut Container) {
//!         container.lazy_singleton(RedisCache::connect);
//!     }
//! }
//!
//! App::register(&CacheProvider);
//! ```

use super::Container;

/// Registers a feature's bindings in a [`Container`]
pub trait ServiceProvider: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// Add bindings; nothing should be resolved here
    fn register(&self, container: &mut Container);
}
