//! Thread-local container overrides for tests
//!
//! ```rust,ignore
//! let _guard = TestContainer::fake();
//! TestContainer::singleton(FormRequestBinding::new(config));
//!
//! // App::get::<FormRequestBinding>() now resolves the fake on this thread
//! ```

use super::{Container, TEST_CONTAINER};
use std::any::Any;

/// Installs and populates the thread-local test container
pub struct TestContainer;

/// Clears the thread-local test container when dropped
pub struct TestContainerGuard {
    _private: (),
}

impl TestContainer {
    /// Start faking on the current thread
    ///
    /// Keep the returned guard alive for the duration of the test.
    pub fn fake() -> TestContainerGuard {
        TEST_CONTAINER.with(|c| *c.borrow_mut() = Some(Container::new()));
        TestContainerGuard { _private: () }
    }

    fn with(f: impl FnOnce(&mut Container)) {
        TEST_CONTAINER.with(|c| {
            let mut slot = c.borrow_mut();
            f(slot.get_or_insert_with(Container::new));
        });
    }

    pub fn singleton<T: Any + Send + Sync + 'static>(instance: T) {
        Self::with(|c| c.singleton(instance));
    }
}

impl Drop for TestContainerGuard {
    fn drop(&mut self) {
        TEST_CONTAINER.with(|c| *c.borrow_mut() = None);
    }
}
