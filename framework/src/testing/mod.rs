//! Testing utilities
//!
//! - `expect!` macro for fluent assertions with clear expected/received output
//! - `TestRequest` for building request contexts without a socket
//! - `TestContainer` for dependency injection in tests
//!
//! # Example
//!
//! ```rust,ignore
//! use kit_forms::expect;
//! use kit_forms::testing::TestRequest;
//!
//! #[tokio::test]
//! async fn rejects_missing_title() {
//!     let response = TestRequest::post("/posts")
//!         .json(serde_json::json!({ "slug": "hello" }))
//!         .send(&routes::router())
//!         .await;
//!
//!     expect!(response).to_have_status(422);
//! }
//! ```

mod expect;

pub use crate::container::testing::{TestContainer, TestContainerGuard};
pub use expect::Expect;

use crate::http::{HttpResponse, Request, Resources};
use crate::routing::Router;
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, Method};
use std::any::Any;
use std::collections::HashMap;

/// Builder for a [`Request`] used in tests
///
/// Invalid URIs or header values panic, as test setup mistakes should.
pub struct TestRequest {
    method: Method,
    uri: String,
    headers: HeaderMap,
    body: Bytes,
    params: HashMap<String, String>,
    resources: Resources,
}

impl TestRequest {
    pub fn new(method: Method, uri: &str) -> Self {
        Self {
            method,
            uri: uri.to_string(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
            params: HashMap::new(),
            resources: Resources::new(),
        }
    }

    pub fn get(uri: &str) -> Self {
        Self::new(Method::GET, uri)
    }

    pub fn post(uri: &str) -> Self {
        Self::new(Method::POST, uri)
    }

    pub fn put(uri: &str) -> Self {
        Self::new(Method::PUT, uri)
    }

    pub fn delete(uri: &str) -> Self {
        Self::new(Method::DELETE, uri)
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        let name = HeaderName::from_bytes(name.as_bytes())
            .unwrap_or_else(|e| panic!("invalid header name {:?}: {}", name, e));
        let value = HeaderValue::from_str(value)
            .unwrap_or_else(|e| panic!("invalid header value {:?}: {}", value, e));
        self.headers.append(name, value);
        self
    }

    /// JSON body with a matching content type
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.body = Bytes::from(body.to_string());
        self
    }

    /// Form-urlencoded body with a matching content type
    pub fn form(mut self, fields: &[(&str, &str)]) -> Self {
        let encoded = serde_urlencoded::to_string(fields)
            .unwrap_or_else(|e| panic!("unencodable form fields: {}", e));
        self.headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        self.body = Bytes::from(encoded);
        self
    }

    /// Raw body; no content type is set
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Route parameter, as the router would extract it
    pub fn param(mut self, name: &str, value: &str) -> Self {
        self.params.insert(name.to_string(), value.to_string());
        self
    }

    /// Resource, as a route binding would attach it
    pub fn resource<T: Any + Send + Sync>(mut self, name: &str, value: T) -> Self {
        self.resources.insert(name, value);
        self
    }

    pub fn build(self) -> Request {
        let uri: http::Uri = self
            .uri
            .parse()
            .unwrap_or_else(|e| panic!("invalid test uri {:?}: {}", self.uri, e));

        let mut req = http::Request::new(self.body);
        *req.method_mut() = self.method;
        *req.uri_mut() = uri;
        *req.headers_mut() = self.headers;

        let mut request = Request::from_http(req).with_params(self.params);
        request.resources_mut().merge(&self.resources);
        request
    }

    /// Dispatch through `router` and return the response
    pub async fn send(self, router: &Router) -> HttpResponse {
        router.handle(self.build()).await
    }
}
