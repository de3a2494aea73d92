//! Configuration module
//!
//! - Automatic `.env` file loading with environment-based precedence
//! - Type-safe configuration structs
//! - Simple API for accessing config values
//!
//! # Example
//!
//! ```rust,no_run
//! use kit_forms::{Config, ServerConfig};
//!
//! Config::init(std::path::Path::new("."));
//!
//! let server = Config::get::<ServerConfig>().unwrap();
//! println!("Server port: {}", server.port);
//! ```

pub mod env;
pub mod providers;
pub mod repository;

pub use env::{env, env_optional, load_dotenv, Environment};
pub use providers::{FormRequestConfig, ServerConfig, ServerConfigBuilder};

use std::path::Path;

/// Main Config facade for accessing configuration
pub struct Config;

impl Config {
    /// Initialize the configuration system
    ///
    /// Loads `.env` files from `project_root` and registers the default
    /// configs. Returns the detected environment.
    pub fn init(project_root: &Path) -> Environment {
        let env = env::load_dotenv(project_root);

        repository::register(ServerConfig::from_env());
        repository::register(FormRequestConfig::from_env());

        tracing::debug!(environment = %env, "configuration loaded");
        env
    }

    /// Get a typed config struct from the repository
    pub fn get<T: std::any::Any + Send + Sync + Clone + 'static>() -> Option<T> {
        repository::get::<T>()
    }

    /// Register a custom config struct
    ///
    /// ```rust,no_run
    /// use kit_forms::{Config, FormRequestConfig};
    ///
    /// Config::register(FormRequestConfig::default().include_query(false));
    /// ```
    pub fn register<T: std::any::Any + Send + Sync + 'static>(config: T) {
        repository::register(config);
    }

    /// Check if a config type is registered
    pub fn has<T: std::any::Any + 'static>() -> bool {
        repository::has::<T>()
    }
}
