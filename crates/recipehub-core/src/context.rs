use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::api::ApiClient;
use crate::auth::{AuthService, SessionCoordinator, SessionStore};
use crate::config::Config;
use crate::nav::Router;
use crate::storage::{FileStore, KeyValueStore};

/// Everything a view needs to issue requests and navigate.
///
/// The API client is wired with a `SessionCoordinator`, so a 401 from any
/// request signs the user out and routes to the login view.
#[derive(Clone)]
pub struct ClientContext {
    pub session: Arc<SessionStore>,
    pub router: Arc<Router>,
    pub api: ApiClient,
    pub auth: AuthService,
}

impl ClientContext {
    pub fn new(base_url: &str, backend: Arc<dyn KeyValueStore>) -> Result<Self> {
        let session = Arc::new(SessionStore::new(backend));
        let router = Arc::new(Router::new(Arc::clone(&session)));
        let coordinator = SessionCoordinator::new(Arc::clone(&session), Arc::clone(&router));
        let api = ApiClient::new(base_url, Arc::clone(&session))?.with_observer(Arc::new(coordinator));
        let auth = AuthService::new(api.clone(), Arc::clone(&session), Arc::clone(&router));

        info!(base_url = api.base_url(), "Client context ready");
        Ok(Self {
            session,
            router,
            api,
            auth,
        })
    }

    /// Build a context persisting the session under the user's data directory.
    pub fn from_config(config: &Config, base_url: &str) -> Result<Self> {
        let backend = FileStore::new(config.session_dir()?);
        Self::new(base_url, Arc::new(backend))
    }
}
