mod body;
mod extract;
mod request;
mod resources;
mod response;

pub use body::{collect_body, parse_form, parse_json};
pub use extract::FromRequest;
pub use request::Request;
pub use resources::Resources;
pub use response::{HttpResponse, Response, ResponseExt};

/// Create a text response
pub fn text(body: impl Into<String>) -> Response {
    Ok(HttpResponse::text(body))
}

/// Create a JSON response from a serde_json::Value
pub fn json(body: serde_json::Value) -> Response {
    Ok(HttpResponse::json(body))
}
