//! Fluent assertion API inspired by Jest's expect
//!
//! ```rust,ignore
//! use kit_forms::expect;
//!
//! let response = TestRequest::post("/posts").json(body).send(&router).await;
//!
//! expect!(response).to_have_status(422);
//! expect!(errors.has("title")).to_be_true();
//! ```

use crate::http::HttpResponse;
use std::fmt::Debug;

/// Wrap a value for fluent assertions, recording the call site
#[macro_export]
macro_rules! expect {
    ($value:expr) => {
        $crate::testing::Expect::new($value, concat!(file!(), ":", line!()))
    };
}

fn fail(location: &str, matcher: &str, expected: impl Debug, received: impl Debug) -> ! {
    panic!(
        "\nassertion failed at {}\n  expect!(received).{}\n\n  Expected: {:?}\n  Received: {:?}\n",
        location, matcher, expected, received
    );
}

/// The main Expect wrapper for fluent assertions
pub struct Expect<T> {
    value: T,
    location: &'static str,
}

impl<T> Expect<T> {
    /// Create a new Expect wrapper (use the expect! macro instead)
    pub fn new(value: T, location: &'static str) -> Self {
        Self { value, location }
    }
}

impl<T: Debug + PartialEq> Expect<T> {
    pub fn to_equal(&self, expected: T) {
        if self.value != expected {
            fail(self.location, "to_equal(expected)", expected, &self.value);
        }
    }
}

impl Expect<bool> {
    pub fn to_be_true(&self) {
        if !self.value {
            fail(self.location, "to_be_true()", true, false);
        }
    }

    pub fn to_be_false(&self) {
        if self.value {
            fail(self.location, "to_be_false()", false, true);
        }
    }
}

impl Expect<HttpResponse> {
    /// Assert the response status code
    pub fn to_have_status(&self, status: u16) {
        if self.value.status_code() != status {
            fail(
                self.location,
                "to_have_status(status)",
                status,
                format!("{} with body {:?}", self.value.status_code(), self.value.body()),
            );
        }
    }

    /// Assert the response body is exactly this JSON value
    pub fn to_have_json(&self, expected: serde_json::Value) {
        let received = self.value.json_body();
        if received.as_ref() != Some(&expected) {
            fail(self.location, "to_have_json(value)", expected, self.value.body());
        }
    }

    /// Assert the response body is empty
    pub fn to_have_empty_body(&self) {
        if !self.value.body().is_empty() {
            fail(self.location, "to_have_empty_body()", "", self.value.body());
        }
    }
}
