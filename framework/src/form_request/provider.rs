//! Container registration for form requests
//!
//! ```rust,ignore
//! use kit_forms::{App, FormRequestProvider};
//!
//! App::register(&FormRequestProvider);
//! ```

use crate::config::{Config, FormRequestConfig};
use crate::container::provider::ServiceProvider;
use crate::container::{App, Container};

/// The form-request capability as stored in the container
///
/// Extraction of `Form<R>` resolves this binding to learn how instances
/// are built.
#[derive(Debug, Clone, PartialEq)]
pub struct FormRequestBinding {
    config: FormRequestConfig,
}

impl FormRequestBinding {
    /// Fixed name the binding is registered under
    pub const NAME: &'static str = "kit/addons/form-request";

    pub fn new(config: FormRequestConfig) -> Self {
        Self { config }
    }

    /// Build from the registered `FormRequestConfig`, or the environment
    pub fn from_config() -> Self {
        let config =
            Config::get::<FormRequestConfig>().unwrap_or_else(FormRequestConfig::from_env);
        Self::new(config)
    }

    pub fn config(&self) -> &FormRequestConfig {
        &self.config
    }

    /// The binding from the application container, if registered
    pub fn resolve() -> Option<Self> {
        App::get::<Self>()
    }
}

/// Registers [`FormRequestBinding`] as a lazy singleton
///
/// Nothing is built at registration; the first resolution constructs the
/// binding and every later one reuses it.
pub struct FormRequestProvider;

impl ServiceProvider for FormRequestProvider {
    fn name(&self) -> &'static str {
        FormRequestBinding::NAME
    }

    fn register(&self, container: &mut Container) {
        container.lazy_singleton(|| {
            let binding = FormRequestBinding::from_config();
            tracing::debug!(
                binding = FormRequestBinding::NAME,
                include_query = binding.config().include_query,
                "form request binding resolved"
            );
            binding
        });
    }
}
