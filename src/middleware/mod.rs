//! Middleware components for HTTP request processing.
//!
//! Security headers, rate limiting, request validation and client
//! identification, layered around the router in `main.rs`.

pub mod ip;
pub mod rate_limit;
pub mod security_headers;
pub mod validation;

pub use rate_limit::EndpointRateLimiter;
