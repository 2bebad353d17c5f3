//! HTTP layer for the SDK.
//!
//! [`HttpClient`] wraps a `reqwest::Client` with the `api/` path prefix,
//! shared authentication state, structured request/response logging, and a
//! bounded transport-retry loop. [`Response`] is the parse-ready wrapper
//! the verbs return.

pub use client::HttpClient;
pub use response::Response;

mod client;
mod response;

// Re-export HTTP types from the http crate for convenience
pub use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
