//! Content-generation gateway adapters.

mod http;

pub use http::HttpContentGateway;
