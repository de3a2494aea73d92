//! Application Container for Dependency Injection
//!
//! This module provides Laravel-like service container capabilities:
//! - Singletons: shared instances across the application
//! - Lazy singletons: built on first resolution, then shared
//! - Test faking: swap implementations in tests
//! - Service Providers: register bindings in one place
//!
//! # Example
//!
//! ```rust,ignore
//! use kit_forms::{App, FormRequestProvider};
//!
//! App::init();
//! App::register(&FormRequestProvider);
//!
//! let binding: FormRequestBinding = App::get().unwrap();
//! ```

pub mod provider;
pub mod testing;

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use provider::ServiceProvider;

/// Global application container
static APP_CONTAINER: OnceLock<RwLock<Container>> = OnceLock::new();

// Thread-local test overrides for isolated testing
thread_local! {
    pub(crate) static TEST_CONTAINER: RefCell<Option<Container>> = const { RefCell::new(None) };
}

type AnyArc = Arc<dyn Any + Send + Sync>;
type AnyFactory = Arc<dyn Fn() -> AnyArc + Send + Sync>;

/// Binding types
#[derive(Clone)]
enum Binding {
    /// Shared singleton instance - same instance returned every time
    Singleton(AnyArc),

    /// Built by the factory on first resolution, shared afterwards
    Lazy {
        cell: Arc<OnceLock<AnyArc>>,
        factory: AnyFactory,
    },
}

impl Binding {
    fn instance(&self) -> AnyArc {
        match self {
            Binding::Singleton(arc) => Arc::clone(arc),
            Binding::Lazy { cell, factory } => Arc::clone(cell.get_or_init(|| factory())),
        }
    }
}

/// The main service container
///
/// Stores type-erased bindings keyed by TypeId.
pub struct Container {
    /// Type bindings: TypeId -> Binding
    bindings: HashMap<TypeId, Binding>,
}

impl Container {
    /// Create a new empty container
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Register a singleton instance (shared across all resolutions)
    pub fn singleton<T: Any + Send + Sync + 'static>(&mut self, instance: T) {
        let arc: AnyArc = Arc::new(instance);
        self.bindings
            .insert(TypeId::of::<T>(), Binding::Singleton(arc));
    }

    /// Register a singleton that is only constructed when first resolved
    ///
    /// # Example
    /// ```rust,ignore
    /// container.lazy_singleton(|| FormRequestBinding::from_config());
    /// ```
    pub fn lazy_singleton<T, F>(&mut self, factory: F)
    where
        T: Any + Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let factory: AnyFactory = Arc::new(move || Arc::new(factory()) as AnyArc);
        self.bindings.insert(
            TypeId::of::<T>(),
            Binding::Lazy {
                cell: Arc::new(OnceLock::new()),
                factory,
            },
        );
    }

    /// Resolve a concrete type (requires Clone)
    pub fn get<T: Any + Send + Sync + Clone + 'static>(&self) -> Option<T> {
        let instance = self.bindings.get(&TypeId::of::<T>())?.instance();
        instance.downcast_ref::<T>().cloned()
    }

    /// Let a service provider register its bindings
    pub fn register<P: ServiceProvider + ?Sized>(&mut self, provider: &P) {
        tracing::debug!(provider = provider.name(), "registering service provider");
        provider.register(self);
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

/// Application container facade
///
/// Provides static methods for service registration and resolution.
/// Uses a global container with thread-local test overrides.
pub struct App;

impl App {
    /// Initialize the application container
    ///
    /// Called automatically by `Server::from_config()`.
    pub fn init() {
        APP_CONTAINER.get_or_init(|| RwLock::new(Container::new()));
    }

    fn write(f: impl FnOnce(&mut Container)) {
        let container = APP_CONTAINER.get_or_init(|| RwLock::new(Container::new()));
        match container.write() {
            Ok(mut c) => f(&mut c),
            Err(_) => tracing::error!("application container lock poisoned"),
        }
    }

    /// Let a service provider register its bindings in the global container
    pub fn register<P: ServiceProvider + ?Sized>(provider: &P) {
        Self::write(|c| c.register(provider));
    }

    /// Resolve a concrete type
    ///
    /// Checks test overrides first, then falls back to global container.
    pub fn get<T: Any + Send + Sync + Clone + 'static>() -> Option<T> {
        // Check test overrides first (thread-local)
        let test_result = TEST_CONTAINER.with(|c| {
            c.borrow()
                .as_ref()
                .and_then(|container| container.get::<T>())
        });

        if test_result.is_some() {
            return test_result;
        }

        // Fall back to global container
        let container = APP_CONTAINER.get()?;
        container.read().ok()?.get::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Debug, PartialEq)]
    struct Locale(&'static str);

    struct LocaleProvider;

    impl ServiceProvider for LocaleProvider {
        fn name(&self) -> &'static str {
            "test/locale"
        }

        fn register(&self, container: &mut Container) {
            container.singleton(Locale("en"));
        }
    }

    #[test]
    fn test_lazy_singleton_builds_once_on_first_resolution() {
        static BUILDS: AtomicUsize = AtomicUsize::new(0);

        let mut container = Container::new();
        container.lazy_singleton(|| {
            BUILDS.fetch_add(1, Ordering::SeqCst);
            42u32
        });

        assert_eq!(BUILDS.load(Ordering::SeqCst), 0);
        assert_eq!(container.get::<u32>(), Some(42));
        assert_eq!(container.get::<u32>(), Some(42));
        assert_eq!(BUILDS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_provider_registers_its_bindings() {
        let mut container = Container::new();
        assert_eq!(container.get::<Locale>(), None);

        container.register(&LocaleProvider);

        assert_eq!(container.get::<Locale>(), Some(Locale("en")));
    }

    #[test]
    fn test_singleton_replaces_previous_binding() {
        let mut container = Container::new();
        container.singleton(Locale("en"));
        container.singleton(Locale("fr"));

        assert_eq!(container.get::<Locale>(), Some(Locale("fr")));
    }
}
