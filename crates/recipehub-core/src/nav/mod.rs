//! Client routes, the navigation guard and the router that publishes the
//! current route.

pub mod guard;
pub mod route;
pub mod router;

pub use guard::{evaluate, GuardDecision};
pub use route::Route;
pub use router::Router;
