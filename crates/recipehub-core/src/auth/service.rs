use std::sync::Arc;

use anyhow::Result;
use serde_json::Value;
use tracing::{info, warn};

use super::{AuthError, Session, SessionStore};
use crate::api::{ApiClient, ApiResponse};
use crate::models::User;
use crate::nav::{Route, Router};

const LOGIN_FAILED: &str = "Invalid credentials";
const REGISTER_FAILED: &str = "Registration failed";

/// Sign-in, registration and sign-out on top of the API client.
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
    session: Arc<SessionStore>,
    router: Arc<Router>,
}

impl AuthService {
    pub fn new(api: ApiClient, session: Arc<SessionStore>, router: Arc<Router>) -> Self {
        Self {
            api,
            session,
            router,
        }
    }

    /// Sign in and land on the listing.
    ///
    /// On failure the error carries the server's message, or
    /// "Invalid credentials" when it sent none. If the session cannot be
    /// saved the sign-in fails and the current route is kept.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let response = self.api.login(email, password).await;
        self.complete_sign_in(response, LOGIN_FAILED)
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let response = self.api.register(name, email, password).await;
        self.complete_sign_in(response, REGISTER_FAILED)
    }

    fn complete_sign_in(&self, response: ApiResponse, default: &str) -> Result<Session, AuthError> {
        let data = response.into_result(default)?;

        // Only fields the server sent replace what is stored
        let mut session = self.session.read();
        if let Some(token) = data.get("token").and_then(Value::as_str).filter(|t| !t.is_empty()) {
            session.token = Some(token.to_string());
        }
        if let Some(user) = data.get("user").filter(|u| !u.is_null()) {
            session.user = Some(user.clone());
        }

        if let Err(e) = self.session.set(&session) {
            warn!(error = %format!("{:#}", e), "Failed to persist session");
            return Err(AuthError::Storage(format!("{:#}", e)));
        }
        let user = session.user().map(|u| u.display_name().to_string());
        info!(user = ?user, "Signed in");

        self.router.navigate(Route::home());
        Ok(session)
    }

    pub fn logout(&self) -> Result<()> {
        self.session.clear()?;
        info!("Signed out");
        self.router.navigate(Route::home());
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn current_user(&self) -> Option<User> {
        self.session.current_user()
    }

    /// Send signed-out users to the login view. Returns whether they may stay.
    pub fn require_auth(&self) -> bool {
        if self.is_authenticated() {
            true
        } else {
            self.router.navigate(Route::Login);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_server::{StubResponse, StubServer};
    use crate::api::ApiError;
    use crate::storage::{FailingStore, KeyValueStore, MemoryStore};
    use serde_json::json;

    fn service(base_url: &str) -> (Arc<SessionStore>, Arc<Router>, AuthService) {
        service_with(base_url, Arc::new(MemoryStore::new()))
    }

    fn service_with(
        base_url: &str,
        backend: Arc<dyn KeyValueStore>,
    ) -> (Arc<SessionStore>, Arc<Router>, AuthService) {
        let session = Arc::new(SessionStore::new(backend));
        let router = Arc::new(Router::new(Arc::clone(&session)));
        let api = ApiClient::new(base_url, Arc::clone(&session)).unwrap();
        let auth = AuthService::new(api, Arc::clone(&session), Arc::clone(&router));
        (session, router, auth)
    }

    #[tokio::test]
    async fn test_login_stores_session_and_goes_home() {
        let server = StubServer::start(vec![StubResponse::json(
            200,
            json!({"token": "abc", "user": {"id": 1}}),
        )])
        .await;
        let (session, router, auth) = service(&server.base_url);
        router.navigate(Route::Login);

        let signed_in = auth.login("a@b.com", "pw").await.unwrap();
        assert_eq!(signed_in, Session::new("abc", json!({"id": 1})));
        assert_eq!(session.read(), Session::new("abc", json!({"id": 1})));
        assert_eq!(router.current().path(), "/");
    }

    #[tokio::test]
    async fn test_login_failure_uses_server_message_or_default() {
        let server = StubServer::start(vec![
            StubResponse::json(400, json!({"message": "Wrong password"})),
            StubResponse::json(400, json!({})),
        ])
        .await;
        let (session, router, auth) = service(&server.base_url);
        router.navigate(Route::Login);

        let err = auth.login("a@b.com", "bad").await.unwrap_err();
        assert_eq!(err.to_string(), "Wrong password");

        let err = auth.login("a@b.com", "bad").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");

        assert!(!session.is_authenticated());
        assert_eq!(router.current(), Route::Login);
    }

    #[tokio::test]
    async fn test_register_default_error() {
        let server = StubServer::start(vec![StubResponse::text(500, "")]).await;
        let (_, _, auth) = service(&server.base_url);

        let err = auth.register("Ann", "a@b.com", "pw").await.unwrap_err();
        assert_eq!(
            err,
            AuthError::Api(ApiError::ServerError("Registration failed".to_string()))
        );
    }

    #[tokio::test]
    async fn test_missing_fields_keep_stored_values() {
        let server = StubServer::start(vec![StubResponse::json(201, json!({"token": "new"}))]).await;
        let (session, _, auth) = service(&server.base_url);
        session.set(&Session::new("old", json!({"id": 3}))).unwrap();

        auth.register("Ann", "a@b.com", "pw").await.unwrap();
        assert_eq!(session.read(), Session::new("new", json!({"id": 3})));
    }

    #[tokio::test]
    async fn test_login_fails_when_session_cannot_be_saved() {
        let server = StubServer::start(vec![StubResponse::json(
            200,
            json!({"token": "abc", "user": {"id": 1}}),
        )])
        .await;
        let (session, router, auth) = service_with(&server.base_url, Arc::new(FailingStore::default()));
        router.navigate(Route::Login);

        let err = auth.login("a@b.com", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::Storage(_)));
        assert!(!session.is_authenticated());
        assert_eq!(router.current(), Route::Login);
    }

    #[test]
    fn test_logout_clears_and_goes_home() {
        let (session, router, auth) = service("http://127.0.0.1:9");
        session.set(&Session::new("abc", json!({"id": 1}))).unwrap();
        router.navigate(Route::CreateRecipe);

        auth.logout().unwrap();
        assert!(!auth.is_authenticated());
        assert!(auth.current_user().is_none());
        assert_eq!(router.current(), Route::home());
    }

    #[test]
    fn test_require_auth() {
        let (session, router, auth) = service("http://127.0.0.1:9");
        assert!(!auth.require_auth());
        assert_eq!(router.current(), Route::Login);

        session.set(&Session::new("abc", json!({"id": 1}))).unwrap();
        assert!(auth.require_auth());
    }
}
