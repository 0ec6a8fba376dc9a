//! Authentication state and the flows that change it.
//!
//! This module provides:
//! - `SessionStore`: the persisted token and user profile, with change
//!   notification across processes sharing the same storage
//! - `SessionCoordinator`: signs the user out when the server answers 401
//! - `AuthService`: login, registration and logout

pub mod coordinator;
pub mod error;
pub mod service;
pub mod session;

pub use coordinator::SessionCoordinator;
pub use error::AuthError;
pub use service::AuthService;
pub use session::{ListenerId, Session, SessionStore};
