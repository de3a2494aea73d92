mod binding;
mod router;

pub use binding::RouteBinding;
pub use router::{BoxedHandler, RouteBuilder, Router};
