//! Read-mostly JSON API over the Collection Store.
//!
//! A thin adapter: handlers hand each request to the query, aggregation and
//! history operations on the blocking pool and map [`DataError`](crate::error_handling::types::DataError)
//! classes to HTTP statuses.

pub mod routes;
pub mod types;
pub mod web_server;

pub use types::{ApiError, UserView};
pub use web_server::WebServer;
