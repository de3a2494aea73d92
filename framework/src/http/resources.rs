//! Named values attached to a request by the routing layer
//!
//! Route model binding (see [`crate::routing::RouteBinding`]) resolves route
//! parameters into resources before the action runs. A form request owns its
//! request, so the same resources are readable from the form.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Type-erased map of named resources
///
/// # Example
///
/// ```rust,ignore
/// let mut resources = Resources::new();
/// resources.insert("post", Post { id: 1, title: "Hello".into() });
///
/// let post: &Post = resources.get("post").unwrap();
/// ```
#[derive(Clone, Default)]
pub struct Resources {
    entries: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a value under `name`, replacing any previous value
    pub fn insert<T: Any + Send + Sync>(&mut self, name: impl Into<String>, value: T) {
        self.entries.insert(name.into(), Arc::new(value));
    }

    /// Borrow the resource `name` if it exists and has type `T`
    pub fn get<T: Any>(&self, name: &str) -> Option<&T> {
        self.entries.get(name)?.downcast_ref::<T>()
    }

    /// Resource names in no particular order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy every entry of `other` into `self`; on a name collision the entry
    /// from `other` wins
    pub fn merge(&mut self, other: &Resources) {
        for (name, value) in &other.entries {
            self.entries.insert(name.clone(), Arc::clone(value));
        }
    }
}

impl fmt::Debug for Resources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("Resources").field("names", &names).finish()
    }
}
