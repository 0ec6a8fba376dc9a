//! REST API client module for the Recipe Hub backend.
//!
//! `ApiClient::request` is the single entry point for HTTP: it attaches the
//! bearer token from the session store, normalizes every result into an
//! `ApiResponse` envelope, and reports each envelope to registered
//! `ResponseObserver`s. Endpoint helpers live in `endpoints`.

pub mod client;
pub mod endpoints;
pub mod error;
pub mod response;

#[cfg(test)]
pub(crate) mod test_server;

pub use client::{ApiClient, RequestBody, RequestOptions};
pub use endpoints::ListQuery;
pub use error::ApiError;
pub use response::{ApiResponse, Outcome, ResponseObserver, NETWORK_ERROR_MESSAGE};
