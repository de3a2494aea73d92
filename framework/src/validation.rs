//! Schema validation engine
//!
//! A schema is any type that is `Deserialize + Serialize + Validate`. The
//! engine deserializes the raw input map into the schema (applying serde-level
//! normalization such as [`trim`]), runs the `validator` rules, and serializes
//! the normalized value back into a [`Payload`].
//!
//! # Example
//!
//! ```rust,ignore
//! use kit_forms::validation::{self, Rules};
//! use kit_forms::{Deserialize, Serialize, Validate};
//!
//! #[derive(Deserialize, Serialize, Validate)]
//! pub struct PostRules {
//!     #[serde(deserialize_with = "validation::trim")]
//!     #[validate(length(min = 1))]
//!     pub title: String,
//!     pub slug: String,
//! }
//!
//! let rules = Rules::<PostRules>::new().message("title.length", "A title is required.");
//! let payload = req.validate(&rules)?;
//! ```

use crate::error::{FrameworkError, ValidationErrors};
use crate::http::Request;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use serde_path_to_error::Segment;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use validator::Validate;

/// A validated (or raw) field map
pub type Payload = serde_json::Map<String, Value>;

/// Validation descriptor for schema `S`
///
/// Besides the schema itself it can carry:
/// - `data`: a map validated instead of the request input
/// - `messages`: custom messages keyed by `"field.rule"` or `"rule"`
pub struct Rules<S> {
    data: Option<Payload>,
    messages: HashMap<String, String>,
    _schema: PhantomData<fn() -> S>,
}

impl<S> Rules<S> {
    pub fn new() -> Self {
        Self {
            data: None,
            messages: HashMap::new(),
            _schema: PhantomData,
        }
    }

    /// Validate `data` instead of the request input
    pub fn data(mut self, data: Payload) -> Self {
        self.data = Some(data);
        self
    }

    /// Register a custom message for `"field.rule"` or for every field failing `"rule"`
    pub fn message(mut self, key: impl Into<String>, message: impl Into<String>) -> Self {
        self.messages.insert(key.into(), message.into());
        self
    }

    /// Data override, if any
    pub fn input(&self) -> Option<&Payload> {
        self.data.as_ref()
    }

    pub fn messages(&self) -> &HashMap<String, String> {
        &self.messages
    }

    fn resolve_message(&self, field: &str, rule: &str, fallback: impl FnOnce() -> String) -> String {
        self.messages
            .get(&format!("{}.{}", field, rule))
            .or_else(|| self.messages.get(rule))
            .cloned()
            .unwrap_or_else(fallback)
    }
}

impl<S> Default for Rules<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for Rules<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rules")
            .field("schema", &std::any::type_name::<S>())
            .field("data", &self.data)
            .field("messages", &self.messages)
            .finish()
    }
}

impl<S> Rules<S>
where
    S: DeserializeOwned + Serialize + Validate,
{
    /// Validate `input` (or the `data` override) against the schema
    ///
    /// Every failing field is reported, whether it is missing, has the wrong
    /// type or breaks a `validator` rule. Returns `FrameworkError::Validation`
    /// (422) when the input does not satisfy the schema.
    pub fn validate(&self, input: Payload) -> Result<Payload, FrameworkError> {
        let input = self.data.clone().unwrap_or(input);
        let (value, mut errors) = self.deserialize(input);

        let value = match value {
            Some(value) => value,
            None => return Err(FrameworkError::Validation(errors)),
        };

        if let Err(failures) = value.validate() {
            self.collect_validator(&failures, &mut errors);
        }
        if !errors.is_empty() {
            return Err(FrameworkError::Validation(errors));
        }

        match serde_json::to_value(&value) {
            Ok(Value::Object(payload)) => Ok(payload),
            Ok(_) => Err(FrameworkError::internal(format!(
                "schema {} does not serialize to an object",
                std::any::type_name::<S>()
            ))),
            Err(e) => Err(FrameworkError::internal(format!(
                "failed to serialize validated payload: {}",
                e
            ))),
        }
    }

    /// Deserialize `input` into the schema, recording one error per unreadable
    /// field
    ///
    /// A top-level field that fails is replaced with a placeholder and the
    /// input is read again, so the fields after it are still checked. The
    /// returned schema only holds real input when no error was recorded.
    fn deserialize(&self, mut input: Payload) -> (Option<S>, ValidationErrors) {
        let mut errors = ValidationErrors::new();
        let mut attempts: HashMap<String, usize> = HashMap::new();

        loop {
            let attempt_input = Value::Object(input.clone());
            let error = match serde_path_to_error::deserialize::<_, S>(attempt_input) {
                Ok(value) => return (Some(value), errors),
                Err(error) => error,
            };

            let failure = FieldFailure::from_error(&error);
            if !errors.has(&failure.field) {
                let message = match failure.rule {
                    "required" => self.resolve_message(&failure.field, "required", || {
                        format!("The {} field is required.", failure.field)
                    }),
                    rule => self.resolve_message(&failure.field, rule, || failure.detail.clone()),
                };
                errors.add(failure.field.clone(), message);
            }

            let key = match failure.key {
                Some(key) => key,
                None => return (None, errors),
            };
            let attempt = attempts.entry(key.clone()).or_insert(0);
            match placeholder(*attempt) {
                Some(value) => {
                    input.insert(key, value);
                    *attempt += 1;
                }
                None => return (None, errors),
            }
        }
    }

    fn collect_validator(
        &self,
        source: &validator::ValidationErrors,
        errors: &mut ValidationErrors,
    ) {
        // fields already rejected while deserializing only hold placeholders
        let reported: HashSet<String> = errors.errors.keys().cloned().collect();

        for (field, field_errors) in source.field_errors() {
            if reported.contains(&field.to_string()) {
                continue;
            }
            for error in field_errors {
                let message = self.resolve_message(&field, &error.code, || {
                    error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| {
                            format!("The {} field failed {} validation.", field, error.code)
                        })
                });
                errors.add(field.to_string(), message);
            }
        }
    }
}

/// A deserialization failure pinned to a field
struct FieldFailure {
    /// Dotted path of the field, `input` when the whole map was rejected
    field: String,
    /// `required` for missing fields, `type` otherwise
    rule: &'static str,
    detail: String,
    /// Top-level key that can be patched to keep reading the input
    key: Option<String>,
}

impl FieldFailure {
    fn from_error(error: &serde_path_to_error::Error<serde_json::Error>) -> Self {
        let detail = error.inner().to_string();
        let mut segments: Vec<String> = error
            .path()
            .iter()
            .filter_map(|segment| match segment {
                Segment::Map { key } => Some(key.clone()),
                Segment::Seq { index } => Some(index.to_string()),
                Segment::Enum { variant } => Some(variant.clone()),
                _ => None,
            })
            .collect();

        let rule = match missing_field(&detail) {
            Some(name) => {
                segments.push(name.to_string());
                "required"
            }
            None => "type",
        };

        let key = match segments.as_slice() {
            [key] => Some(key.clone()),
            _ => None,
        };
        let field = if segments.is_empty() {
            "input".to_string()
        } else {
            segments.join(".")
        };

        Self {
            field,
            rule,
            detail,
            key,
        }
    }
}

/// Stand-in values tried in turn for a field that could not be read
fn placeholder(attempt: usize) -> Option<Value> {
    let value = match attempt {
        0 => Value::String(String::new()),
        1 => Value::from(0),
        2 => Value::Bool(false),
        3 => Value::Array(Vec::new()),
        4 => Value::Object(Payload::new()),
        5 => Value::Null,
        _ => return None,
    };
    Some(value)
}

/// `missing field `title`` -> `title`
fn missing_field(message: &str) -> Option<&str> {
    let rest = message.strip_prefix("missing field `")?;
    rest.split('`').next()
}

impl Request {
    /// Validate the merged request input (query + body) against `rules`
    pub fn validate<S>(&self, rules: &Rules<S>) -> Result<Payload, FrameworkError>
    where
        S: DeserializeOwned + Serialize + Validate,
    {
        let input = match rules.input() {
            Some(_) => Payload::new(),
            None => self.all()?,
        };
        rules.validate(input)
    }
}

/// Serde helper that trims surrounding whitespace from a string field
///
/// ```rust,ignore
/// #[serde(deserialize_with = "kit_forms::validation::trim")]
/// pub title: String,
/// ```
pub fn trim<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(value.trim().to_string())
}

/// Optional variant of [`trim`]; pair it with `#[serde(default)]`
pub fn trim_optional<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.map(|v| v.trim().to_string()))
}

/// A value sent either natively or as a string
///
/// Query strings and urlencoded bodies only carry strings, JSON bodies carry
/// the real type.
#[derive(Deserialize)]
#[serde(untagged)]
enum StringOr<T> {
    Native(T),
    Text(String),
}

fn parse_text<T, E>(text: &str) -> Result<T, E>
where
    T: FromStr,
    T::Err: fmt::Display,
    E: serde::de::Error,
{
    text.trim()
        .parse()
        .map_err(|e| E::custom(format!("invalid value `{}`: {}", text, e)))
}

/// Serde helper that accepts a value or its string form
///
/// Lets numeric and boolean fields validate from HTML forms and query strings.
///
/// ```rust,ignore
/// #[serde(deserialize_with = "kit_forms::validation::from_str")]
/// pub author_id: u64,
/// ```
pub fn from_str<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Deserialize<'de>,
    T::Err: fmt::Display,
{
    match StringOr::<T>::deserialize(deserializer)? {
        StringOr::Native(value) => Ok(value),
        StringOr::Text(text) => parse_text(&text),
    }
}

/// Optional variant of [`from_str`]; a blank string reads as `None`. Pair it
/// with `#[serde(default)]`
pub fn from_str_optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Deserialize<'de>,
    T::Err: fmt::Display,
{
    match Option::<StringOr<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(StringOr::Native(value)) => Ok(Some(value)),
        Some(StringOr::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(StringOr::Text(text)) => parse_text(&text).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[derive(Debug, Deserialize, Serialize, Validate)]
    struct PostRules {
        #[serde(deserialize_with = "trim")]
        #[validate(length(min = 3))]
        title: String,
        slug: String,
        #[serde(default, deserialize_with = "trim_optional", skip_serializing_if = "Option::is_none")]
        summary: Option<String>,
    }

    fn input(value: Value) -> Payload {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_trims_and_keeps_only_schema_fields() {
        let payload = Rules::<PostRules>::new()
            .validate(input(json!({
                "title": "Test    ",
                "slug": "test-slug",
                "unknown": "dropped"
            })))
            .unwrap();

        assert_eq!(
            Value::Object(payload),
            json!({ "title": "Test", "slug": "test-slug" })
        );
    }

    #[test]
    fn test_trim_optional() {
        let payload = Rules::<PostRules>::new()
            .validate(input(json!({
                "title": "Test",
                "slug": "test-slug",
                "summary": "  short  "
            })))
            .unwrap();

        assert_eq!(payload["summary"], json!("short"));
    }

    #[test]
    fn test_missing_field_is_reported_per_field() {
        let err = Rules::<PostRules>::new()
            .validate(input(json!({ "title": "Test" })))
            .unwrap_err();

        match err {
            FrameworkError::Validation(errors) => {
                assert_eq!(
                    errors.get("slug"),
                    Some(&["The slug field is required.".to_string()][..])
                );
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_validator_failure_uses_custom_message() {
        let err = Rules::<PostRules>::new()
            .message("title.length", "Titles need three characters.")
            .validate(input(json!({ "title": " ab ", "slug": "s" })))
            .unwrap_err();

        assert_eq!(err.status_code(), 422);
        match err {
            FrameworkError::Validation(errors) => {
                assert_eq!(
                    errors.get("title"),
                    Some(&["Titles need three characters.".to_string()][..])
                );
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_rule_wide_message() {
        let err = Rules::<PostRules>::new()
            .message("required", "Required.")
            .validate(Payload::new())
            .unwrap_err();

        match err {
            FrameworkError::Validation(errors) => {
                assert_eq!(errors.get("title"), Some(&["Required.".to_string()][..]));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_data_override_replaces_input() {
        let rules = Rules::<PostRules>::new()
            .data(input(json!({ "title": "Override", "slug": "override" })));

        let payload = rules.validate(Payload::new()).unwrap();
        assert_eq!(payload["title"], json!("Override"));
    }

    fn errors_of(result: Result<Payload, FrameworkError>) -> Value {
        match result {
            Err(FrameworkError::Validation(errors)) => errors.to_json()["errors"].clone(),
            other => panic!("expected validation errors, got {:?}", other),
        }
    }

    #[test]
    fn test_every_missing_field_is_reported() {
        let errors = errors_of(Rules::<PostRules>::new().validate(Payload::new()));

        assert_eq!(
            errors,
            json!({
                "slug": ["The slug field is required."],
                "title": ["The title field is required."]
            })
        );
    }

    #[test]
    fn test_rules_still_run_next_to_a_missing_field() {
        let errors =
            errors_of(Rules::<PostRules>::new().validate(input(json!({ "title": "ab" }))));

        assert_eq!(errors["slug"], json!(["The slug field is required."]));
        assert_eq!(
            errors["title"],
            json!(["The title field failed length validation."])
        );
    }

    #[test]
    fn test_wrong_type_is_reported_under_its_field() {
        let errors = errors_of(
            Rules::<PostRules>::new()
                .message("slug.required", "Slug please.")
                .validate(input(json!({ "title": 5 }))),
        );

        assert_eq!(
            errors,
            json!({
                "slug": ["Slug please."],
                "title": ["invalid type: integer `5`, expected a string"]
            })
        );
    }

    #[derive(Debug, Deserialize, Serialize, Validate)]
    struct FilterRules {
        #[serde(deserialize_with = "from_str")]
        #[validate(range(min = 1))]
        page: u32,
        #[serde(default, deserialize_with = "from_str_optional")]
        published: Option<bool>,
    }

    #[test]
    fn test_from_str_reads_strings_and_native_values() {
        let from_form = Rules::<FilterRules>::new()
            .validate(input(json!({ "page": " 2 ", "published": "true" })))
            .unwrap();
        let from_json = Rules::<FilterRules>::new()
            .validate(input(json!({ "page": 3, "published": "" })))
            .unwrap();

        assert_eq!(Value::Object(from_form), json!({ "page": 2, "published": true }));
        assert_eq!(Value::Object(from_json), json!({ "page": 3, "published": null }));
    }

    #[test]
    fn test_from_str_rejects_unparsable_text() {
        let errors =
            errors_of(Rules::<FilterRules>::new().validate(input(json!({ "page": "abc" }))));

        assert_eq!(errors.as_object().map(|e| e.len()), Some(1));
        assert!(errors["page"][0]
            .as_str()
            .is_some_and(|message| message.starts_with("invalid value `abc`")));
    }

    #[test]
    fn test_missing_field_parser() {
        assert_eq!(missing_field("missing field `title`"), Some("title"));
        assert_eq!(missing_field("invalid type: integer"), None);
    }
}
