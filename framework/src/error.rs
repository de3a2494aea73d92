//! Framework-wide error types
//!
//! Provides a unified error type that can be used throughout the framework
//! and automatically converts to appropriate HTTP responses.

use std::collections::BTreeMap;
use thiserror::Error;

/// Validation errors with Laravel/Inertia-compatible format
///
/// Contains a map of field names to error messages, supporting multiple
/// errors per field. Fields are kept sorted so rendered bodies are stable.
///
/// # Response Format
///
/// ```json
/// {
///     "message": "The given data was invalid.",
///     "errors": {
///         "slug": ["The slug field is required."],
///         "title": ["The title field must be at least 3 characters."]
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors {
    /// Map of field names to their validation error messages
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    /// Create a new empty ValidationErrors
    pub fn new() -> Self {
        Self {
            errors: BTreeMap::new(),
        }
    }

    /// Add an error for a specific field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Check if there are any errors
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Messages recorded for one field
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    /// Whether the given field failed validation
    pub fn has(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Convert to JSON Value for response
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "message": "The given data was invalid.",
            "errors": self.errors
        })
    }
}

impl Default for ValidationErrors {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Validation failed: {:?}", self.errors)
    }
}

impl std::error::Error for ValidationErrors {}

/// Framework-wide error type
///
/// Every variant maps to a status code through [`FrameworkError::status_code`],
/// and `From<FrameworkError> for HttpResponse` turns it into a response, so
/// handlers can propagate with `?`.
///
/// # Example
///
/// ```rust,ignore
/// use kit_forms::{handler, json, Form, Response};
///
/// #[handler]
/// pub async fn update(form: Form<UpdatePostRequest>) -> Response {
///     let post = form.typed()?;  // FrameworkError converts automatically
///     json(serde_json::json!({ "title": post.title }))
/// }
/// ```
#[derive(Debug, Clone, Error)]
pub enum FrameworkError {
    /// Parameter extraction failed (missing route parameter)
    #[error("Missing required parameter: {param_name}")]
    ParamError {
        /// The name of the parameter that failed extraction
        param_name: String,
    },

    /// Parameter parse error (400 Bad Request)
    ///
    /// Used when a path parameter cannot be parsed to the expected type.
    #[error("Invalid parameter '{param}': expected {expected_type}")]
    ParamParse {
        /// The parameter value that failed to parse
        param: String,
        /// The expected type (e.g., "i32", "uuid")
        expected_type: &'static str,
    },

    /// The request body could not be parsed (400 Bad Request)
    #[error("Malformed request body: {message}")]
    MalformedBody {
        /// Parser error message
        message: String,
    },

    /// Model not found (404 Not Found)
    ///
    /// Used when route model binding fails to find the requested resource.
    #[error("{model_name} not found")]
    ModelNotFound {
        /// The name of the model that was not found
        model_name: String,
    },

    /// Form validation errors (422 Unprocessable Entity)
    #[error("Validation failed")]
    Validation(ValidationErrors),

    /// Authorization failed (403 Forbidden)
    ///
    /// Returned when `FormRequest::authorize()` resolves to false. The body is
    /// empty unless a message is configured.
    #[error("This action is unauthorized.")]
    Forbidden {
        /// Optional message rendered in the response body
        message: Option<String>,
    },

    /// A form request payload was read before `validate_payload()` ran
    #[error("Form request payload read before validation")]
    PayloadUnset,

    /// Generic internal server error
    #[error("Internal server error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl FrameworkError {
    /// Create a ParamError for a missing parameter
    pub fn param(name: impl Into<String>) -> Self {
        Self::ParamError {
            param_name: name.into(),
        }
    }

    /// Create a ParamParse error (400)
    pub fn param_parse(param: impl Into<String>, expected_type: &'static str) -> Self {
        Self::ParamParse {
            param: param.into(),
            expected_type,
        }
    }

    /// Create a MalformedBody error (400)
    pub fn malformed_body(message: impl Into<String>) -> Self {
        Self::MalformedBody {
            message: message.into(),
        }
    }

    /// Create a ModelNotFound error (404)
    pub fn model_not_found(name: impl Into<String>) -> Self {
        Self::ModelNotFound {
            model_name: name.into(),
        }
    }

    /// Create a Forbidden error with an empty body
    pub fn forbidden() -> Self {
        Self::Forbidden { message: None }
    }

    /// Create an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ParamError { .. } => 400,
            Self::ParamParse { .. } => 400,
            Self::MalformedBody { .. } => 400,
            Self::ModelNotFound { .. } => 404,
            Self::Validation(_) => 422,
            Self::Forbidden { .. } => 403,
            Self::PayloadUnset => 500,
            Self::Internal { .. } => 500,
        }
    }
}

impl From<ValidationErrors> for FrameworkError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(FrameworkError::forbidden().status_code(), 403);
        assert_eq!(
            FrameworkError::Validation(ValidationErrors::new()).status_code(),
            422
        );
        assert_eq!(FrameworkError::model_not_found("Post").status_code(), 404);
        assert_eq!(FrameworkError::param_parse("abc", "i32").status_code(), 400);
        assert_eq!(FrameworkError::PayloadUnset.status_code(), 500);
    }

    #[test]
    fn test_validation_errors_json() {
        let mut errors = ValidationErrors::new();
        errors.add("title", "The title field is required.");
        errors.add("title", "The title field must be a string.");

        let body = errors.to_json();
        assert_eq!(body["message"], "The given data was invalid.");
        assert_eq!(body["errors"]["title"].as_array().map(Vec::len), Some(2));
        assert!(errors.has("title"));
        assert!(!errors.has("slug"));
    }
}
