use super::body::{collect_body, parse_form, parse_json, parse_pairs};
use super::resources::Resources;
use crate::error::FrameworkError;
use crate::validation::Payload;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;

/// HTTP request context providing Laravel-like access to request data
///
/// The body is collected up front, so a `Request` can be read any number of
/// times and cloned cheaply (the body bytes are reference counted). This is
/// what lets several form requests in one action share the same context.
#[derive(Clone)]
pub struct Request {
    method: http::Method,
    uri: http::Uri,
    headers: http::HeaderMap,
    body: Bytes,
    params: HashMap<String, String>,
    resources: Resources,
}

impl Request {
    pub fn new(parts: http::request::Parts, body: Bytes) -> Self {
        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
            params: HashMap::new(),
            resources: Resources::new(),
        }
    }

    /// Build a request from an `http::Request` whose body is already in memory
    pub fn from_http(req: http::Request<Bytes>) -> Self {
        let (parts, body) = req.into_parts();
        Self::new(parts, body)
    }

    /// Build a request from a hyper request, collecting the streamed body
    pub async fn from_incoming(
        req: hyper::Request<hyper::body::Incoming>,
    ) -> Result<Self, FrameworkError> {
        let (parts, body) = req.into_parts();
        let bytes = collect_body(body).await?;
        Ok(Self::new(parts, bytes))
    }

    pub fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }

    /// Attach a named resource (usually done by route model binding)
    pub fn with_resource<T: Any + Send + Sync>(mut self, name: impl Into<String>, value: T) -> Self {
        self.resources.insert(name, value);
        self
    }

    /// Get the request method
    pub fn method(&self) -> &http::Method {
        &self.method
    }

    /// Get the request path
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn uri(&self) -> &http::Uri {
        &self.uri
    }

    /// Get a header value by name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn headers(&self) -> &http::HeaderMap {
        &self.headers
    }

    /// Get the Content-Type header
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Get a cookie value by name
    pub fn cookie(&self, name: &str) -> Option<String> {
        self.cookies().remove(name)
    }

    /// All cookies sent with the request
    pub fn cookies(&self) -> HashMap<String, String> {
        self.headers
            .get_all(http::header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| {
                let (name, value) = pair.trim().split_once('=')?;
                Some((name.trim().to_string(), value.trim().to_string()))
            })
            .collect()
    }

    /// Get a route parameter by name (e.g., /posts/{post})
    /// Returns Err(FrameworkError::ParamError) if the parameter is missing, enabling use of `?`
    pub fn param(&self, name: &str) -> Result<&str, FrameworkError> {
        self.params
            .get(name)
            .map(|s| s.as_str())
            .ok_or_else(|| FrameworkError::param(name))
    }

    /// Get all route parameters
    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// Get a single query string value (the last one when the key repeats)
    pub fn query(&self, name: &str) -> Option<String> {
        let query = self.uri.query()?;
        parse_pairs(query.as_bytes())
            .ok()?
            .into_iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value)
            .last()
    }

    /// All query string values keyed by name
    ///
    /// A key given more than once maps to an array of its values.
    pub fn queries(&self) -> Payload {
        let pairs = self
            .uri
            .query()
            .and_then(|query| parse_pairs(query.as_bytes()).ok())
            .unwrap_or_default();
        pairs_to_payload(pairs)
    }

    /// The raw request body
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Parse the request body as JSON
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// #[derive(Deserialize)]
    /// struct CreatePost { title: String }
    ///
    /// pub async fn store(req: Request) -> Response {
    ///     let data: CreatePost = req.json()?;
    ///     // ...
    /// }
    /// ```
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FrameworkError> {
        parse_json(&self.body)
    }

    /// Parse the request body as form-urlencoded
    pub fn form<T: DeserializeOwned>(&self) -> Result<T, FrameworkError> {
        parse_form(&self.body)
    }

    /// Parse the body into a field map based on the Content-Type header
    ///
    /// - `application/x-www-form-urlencoded` -> form parsing
    /// - anything else -> JSON parsing, which must yield an object
    ///
    /// An empty body yields an empty map.
    pub fn body_input(&self) -> Result<Payload, FrameworkError> {
        if self.body.is_empty() {
            return Ok(Payload::new());
        }

        match self.content_type() {
            Some(ct) if ct.starts_with("application/x-www-form-urlencoded") => {
                Ok(pairs_to_payload(parse_pairs(&self.body)?))
            }
            _ => match parse_json::<Value>(&self.body)? {
                Value::Object(map) => Ok(map),
                other => Err(FrameworkError::malformed_body(format!(
                    "expected a JSON object, found {}",
                    json_kind(&other)
                ))),
            },
        }
    }

    /// Query string merged with the parsed body; body fields win
    pub fn all(&self) -> Result<Payload, FrameworkError> {
        let mut input = self.queries();
        input.extend(self.body_input()?);
        Ok(input)
    }

    /// Resources attached by the routing layer
    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut Resources {
        &mut self.resources
    }

    /// Borrow a resource by name and type
    pub fn resource<T: Any>(&self, name: &str) -> Option<&T> {
        self.resources.get(name)
    }
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("uri", &self.uri)
            .field("params", &self.params)
            .field("resources", &self.resources)
            .finish()
    }
}

fn pairs_to_payload(pairs: Vec<(String, String)>) -> Payload {
    let mut payload = Payload::new();
    for (key, value) in pairs {
        match payload.get_mut(&key) {
            Some(Value::Array(values)) => values.push(Value::String(value)),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, Value::String(value)]);
            }
            None => {
                payload.insert(key, Value::String(value));
            }
        }
    }
    payload
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
