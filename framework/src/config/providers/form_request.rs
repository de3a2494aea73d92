use crate::config::env::{env, env_optional};

/// Form request behavior
///
/// | Variable | Default |
/// |---|---|
/// | `FORM_REQUEST_INCLUDE_QUERY` | `true` |
/// | `FORM_REQUEST_FORBIDDEN_MESSAGE` | unset (empty 403 body) |
#[derive(Debug, Clone, PartialEq)]
pub struct FormRequestConfig {
    /// Merge the query string into the validated input
    pub include_query: bool,
    /// JSON `message` for 403 responses; `None` sends an empty body
    pub forbidden_message: Option<String>,
}

impl FormRequestConfig {
    pub fn from_env() -> Self {
        Self {
            include_query: env("FORM_REQUEST_INCLUDE_QUERY", true),
            forbidden_message: env_optional("FORM_REQUEST_FORBIDDEN_MESSAGE"),
        }
    }

    pub fn include_query(mut self, include: bool) -> Self {
        self.include_query = include;
        self
    }

    pub fn forbidden_message(mut self, message: impl Into<String>) -> Self {
        self.forbidden_message = Some(message.into());
        self
    }
}

impl Default for FormRequestConfig {
    fn default() -> Self {
        Self {
            include_query: true,
            forbidden_message: None,
        }
    }
}
