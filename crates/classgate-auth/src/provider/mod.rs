//! Auth-service client implementations.

pub mod http;

pub use http::HttpAuthProvider;
