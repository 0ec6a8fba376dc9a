//! API client for communicating with the Recipe Hub REST API.
//!
//! This module provides the `ApiClient` struct and the `RequestOptions` that
//! describe a single logical request.

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::SessionStore;
use crate::config::normalize_base_url;

use super::{ApiResponse, ResponseObserver};

/// Default content type for every request body
const JSON_CONTENT_TYPE: &str = "application/json";

const USER_AGENT: &str = concat!("recipehub/", env!("CARGO_PKG_VERSION"));

/// Request payload. JSON values are serialized; text is sent verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    Text(String),
}

#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    /// Extra headers, applied over the defaults
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
    /// Attach the stored bearer token
    pub auth: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: Vec::new(),
            body: None,
            auth: true,
        }
    }
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    pub fn put() -> Self {
        Self::new(Method::PUT)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Text(body.into()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn auth(mut self, auth: bool) -> Self {
        self.auth = auth;
        self
    }
}

/// API client for the Recipe Hub backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<SessionStore>,
    observers: Vec<Arc<dyn ResponseObserver>>,
}

impl ApiClient {
    /// Create a client for `base_url` reading tokens from `session`.
    ///
    /// Trailing slashes on the base URL are ignored; an empty base URL keeps
    /// paths relative.
    pub fn new(base_url: &str, session: Arc<SessionStore>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: normalize_base_url(base_url),
            session,
            observers: Vec::new(),
        })
    }

    /// Register an observer that sees every envelope before the caller does.
    pub fn with_observer(mut self, observer: Arc<dyn ResponseObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Issue a request and normalize the result.
    ///
    /// Never fails: transport problems come back as a status 0 envelope and
    /// HTTP errors as non-ok envelopes. Observers are notified of every
    /// envelope, including 401s, before it is returned.
    pub async fn request(&self, path: &str, options: RequestOptions) -> ApiResponse {
        let method = options.method.clone();

        let response = match self.send(path, options).await {
            Ok(response) => Self::read_envelope(response).await,
            Err(e) => {
                warn!(%method, path, error = %format!("{:#}", e), "Request failed without a response");
                ApiResponse::transport_failure(format!("{:#}", e))
            }
        };

        debug!(%method, path, status = response.status, ok = response.ok, "Request completed");
        if response.is_unauthorized() {
            warn!(%method, path, "Unauthorized response");
        }

        for observer in &self.observers {
            observer.on_response(path, &response);
        }

        response
    }

    fn build_headers(&self, options: &RequestOptions) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));

        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .with_context(|| format!("Invalid header name: {}", name))?;
            let value = HeaderValue::from_str(value)
                .with_context(|| format!("Invalid value for header {}", name))?;
            headers.insert(name, value);
        }

        if options.auth {
            if let Some(token) = self.session.token() {
                let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                    .context("Stored token is not a valid header value")?;
                value.set_sensitive(true);
                headers.insert(header::AUTHORIZATION, value);
            }
        }

        Ok(headers)
    }

    async fn send(&self, path: &str, options: RequestOptions) -> Result<reqwest::Response> {
        let headers = self.build_headers(&options)?;
        let url = self.url_for(path);

        let mut builder = self.client.request(options.method, &url).headers(headers);
        match options.body {
            Some(RequestBody::Json(body)) => {
                let bytes = serde_json::to_vec(&body).context("Failed to serialize request body")?;
                builder = builder.body(bytes);
            }
            Some(RequestBody::Text(body)) => {
                builder = builder.body(body);
            }
            None => {}
        }

        builder
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))
    }

    async fn read_envelope(response: reqwest::Response) -> ApiResponse {
        let status = response.status();
        let is_json = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains(JSON_CONTENT_TYPE));

        let data = if is_json {
            match response.bytes().await {
                Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                    debug!(status = %status, error = %e, "Malformed JSON body, using null");
                    Value::Null
                }),
                Err(e) => {
                    warn!(status = %status, error = %e, "Failed to read response body");
                    Value::Null
                }
            }
        } else {
            match response.text().await {
                Ok(text) => Value::String(text),
                Err(e) => {
                    warn!(status = %status, error = %e, "Failed to read response body");
                    Value::Null
                }
            }
        };

        ApiResponse {
            ok: status.is_success(),
            status: status.as_u16(),
            data,
        }
    }
}
