mod form_request;
mod server;

pub use form_request::FormRequestConfig;
pub use server::{ServerConfig, ServerConfigBuilder};
