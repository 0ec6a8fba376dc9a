use std::sync::Arc;

use tracing::{info, warn};

use super::SessionStore;
use crate::api::{ApiResponse, Outcome, ResponseObserver};
use crate::nav::{Route, Router};

/// Ends the session when the server rejects our credentials.
///
/// Registered on the `ApiClient`, it clears the store on every 401 and sends
/// the user to the login view unless they are already there.
pub struct SessionCoordinator {
    session: Arc<SessionStore>,
    router: Arc<Router>,
}

impl SessionCoordinator {
    pub fn new(session: Arc<SessionStore>, router: Arc<Router>) -> Self {
        Self { session, router }
    }
}

impl ResponseObserver for SessionCoordinator {
    fn on_response(&self, path: &str, response: &ApiResponse) {
        if response.outcome() != Outcome::Unauthorized {
            return;
        }

        info!(path, "Session rejected by server, signing out");
        if let Err(e) = self.session.clear() {
            warn!(error = %e, "Failed to clear session");
        }
        if self.router.current() != Route::Login {
            self.router.hard_redirect(Route::Login);
        }
    }
}
