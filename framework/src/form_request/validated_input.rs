use crate::validation::Payload;
use serde_json::Value;
use std::borrow::Cow;

/// Read-only view over a validated payload
///
/// Every projection returns a new map and leaves the payload untouched.
///
/// # Example
///
/// ```rust,ignore
/// let input = form.safe();
///
/// let slug_only = input.only(&["slug"]);
/// let without_slug = input.except(&["slug"]);
/// let with_author = input.merge([("author_id".to_string(), json!(42))]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedInput<'a> {
    data: Cow<'a, Payload>,
}

impl<'a> ValidatedInput<'a> {
    pub fn new(data: Cow<'a, Payload>) -> Self {
        Self { data }
    }

    /// The whole payload
    pub fn all(&self) -> &Payload {
        &self.data
    }

    /// A single field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Only the listed keys that exist in the payload
    pub fn only<K: AsRef<str>>(&self, keys: &[K]) -> Payload {
        keys.iter()
            .filter_map(|key| {
                let key = key.as_ref();
                self.data
                    .get(key)
                    .map(|value| (key.to_string(), value.clone()))
            })
            .collect()
    }

    /// Every payload key except the listed ones
    pub fn except<K: AsRef<str>>(&self, keys: &[K]) -> Payload {
        self.data
            .iter()
            .filter(|(name, _)| !keys.iter().any(|key| key.as_ref() == name.as_str()))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    /// A copy of the payload with `extra` laid over it; `extra` wins on conflict
    pub fn merge<I>(&self, extra: I) -> Payload
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let mut merged = self.data.clone().into_owned();
        merged.extend(extra);
        merged
    }

    pub fn into_inner(self) -> Payload {
        self.data.into_owned()
    }
}
