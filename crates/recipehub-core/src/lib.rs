//! Core library for the Recipe Hub client.
//!
//! - `auth`: the persisted session, sign-in flows and 401 handling
//! - `api`: the REST client and its normalized response envelope
//! - `nav`: routes, the navigation guard and the router
//! - `storage`: key-value backends for the session
//! - `task`: view-scoped cancellation of in-flight requests

pub mod api;
pub mod auth;
pub mod config;
pub mod context;
pub mod models;
pub mod nav;
pub mod storage;
pub mod task;
pub mod utils;

pub use api::{ApiClient, ApiError, ApiResponse, Outcome, RequestOptions};
pub use auth::{AuthError, AuthService, Session, SessionStore};
pub use config::Config;
pub use context::ClientContext;
pub use nav::{Route, Router};
pub use task::ViewScope;
