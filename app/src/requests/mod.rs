pub mod store_post_request;
pub mod update_post_request;

pub use store_post_request::StorePostRequest;
pub use update_post_request::UpdatePostRequest;
