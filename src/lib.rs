//! # Shiftboard Backend Library
//!
//! Shiftboard schedules shifts for cars and safety drivers, tracks car
//! licences, and answers the two questions dispatchers ask most: which shifts
//! collide with a proposed window, and what is a driver's next shift.
//!
//! ## Architecture
//!
//! The application is built using:
//! - **Axum**: HTTP server and routing
//! - **SQLx**: Asynchronous database operations with SQLite
//! - **Tokio**: Async runtime
//! - **Serde**: Serialization/deserialization for JSON APIs
//!
//! Every write goes to the SQLite store first and is then copied into a
//! search mirror in the same request. The two writes are not atomic; a failed
//! mirror write surfaces as a 500 and is repaired by the startup rebuild.
//!
//! ## Core Components
//!
//! - [`config`]: Layered configuration (embedded defaults, files, environment)
//! - [`db`]: Schema initialization
//! - [`error`]: Centralized error handling and HTTP error responses
//! - [`extract`]: Request extractors that reject with [`error::AppError`]
//! - [`metrics`]: Request and write counters
//! - [`middleware`]: Security headers, rate limiting and request validation
//! - [`overlap`]: The overlap predicate and next-shift selection
//! - [`paging`]: Page/size/sort parameters and paged responses
//! - [`routes`]: HTTP API endpoint handlers
//! - [`search`]: The search mirror and its query language
//! - [`state`]: Shared application state and per-resource locks
//! - [`store`]: All SQL for shifts and car licences
//! - [`types`]: Entities and query-string types

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod metrics;
pub mod middleware;
pub mod overlap;
pub mod paging;
pub mod routes;
pub mod search;
pub mod state;
pub mod store;
pub mod types;

#[cfg(test)]
mod tests;
