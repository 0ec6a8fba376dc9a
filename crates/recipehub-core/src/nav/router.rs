use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use super::guard::{self, GuardDecision};
use super::Route;
use crate::auth::SessionStore;

/// Redirects followed for a single navigation before giving up
const MAX_REDIRECTS: usize = 4;

/// Publishes the current route and runs the guard on every navigation.
pub struct Router {
    session: Arc<SessionStore>,
    current: watch::Sender<Route>,
}

impl Router {
    pub fn new(session: Arc<SessionStore>) -> Self {
        let (current, _) = watch::channel(Route::home());
        Self { session, current }
    }

    /// Navigate to `target`, following guard redirects. Returns where we landed.
    pub fn navigate(&self, target: Route) -> Route {
        let landed = self.resolve(target);
        self.publish(landed.clone());
        landed
    }

    pub fn navigate_path(&self, path: &str) -> Route {
        self.navigate(Route::parse(path))
    }

    /// Publish `route` without consulting the guard.
    pub fn hard_redirect(&self, route: Route) {
        debug!(route = %route, "Hard redirect");
        self.publish(route);
    }

    pub fn current(&self) -> Route {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.current.subscribe()
    }

    /// Re-run the guard for the route being shown, e.g. after the session
    /// changed elsewhere. Returns the redirect target if one was taken.
    pub fn revalidate(&self) -> Option<Route> {
        let current = self.current();
        let landed = self.resolve(current.clone());
        if landed == current {
            None
        } else {
            self.publish(landed.clone());
            Some(landed)
        }
    }

    fn resolve(&self, target: Route) -> Route {
        let authenticated = self.session.is_authenticated();
        let mut route = target;
        for _ in 0..MAX_REDIRECTS {
            match guard::evaluate(&route, authenticated) {
                GuardDecision::Pass => return route,
                GuardDecision::Redirect(next) => {
                    debug!(from = %route, to = %next, "Navigation redirected");
                    route = next;
                }
            }
        }
        route
    }

    fn publish(&self, route: Route) {
        debug!(route = %route, "Route changed");
        self.current.send_replace(route);
    }
}
