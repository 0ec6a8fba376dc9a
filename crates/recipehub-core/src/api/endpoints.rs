//! Recipe and authentication endpoints.
//!
//! Each helper is a thin composition of `ApiClient::request` with a fixed
//! path, method and auth flag. Reads and the auth endpoints are public;
//! writes carry the bearer token.

use serde_json::json;
use url::form_urlencoded;

use crate::models::{RecipePayload, DEFAULT_PAGE_SIZE};

use super::{ApiClient, ApiResponse, RequestOptions};

/// Paging and search parameters for the recipe listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub search: String,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            search: String::new(),
        }
    }
}

impl ListQuery {
    pub fn new(page: u32, search: impl Into<String>) -> Self {
        Self {
            page,
            search: search.into(),
            ..Self::default()
        }
    }

    /// Request path with the form-encoded query; `search` is left out when empty.
    pub fn path(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query.append_pair("page", &self.page.to_string());
        query.append_pair("limit", &self.limit.to_string());
        if !self.search.is_empty() {
            query.append_pair("search", &self.search);
        }
        format!("/recipes?{}", query.finish())
    }
}

fn recipe_path(id: &str) -> String {
    format!("/recipes/{}", id)
}

impl ApiClient {
    pub async fn list_recipes(&self, query: &ListQuery) -> ApiResponse {
        self.request(&query.path(), RequestOptions::get().auth(false))
            .await
    }

    pub async fn get_recipe(&self, id: &str) -> ApiResponse {
        self.request(&recipe_path(id), RequestOptions::get().auth(false))
            .await
    }

    pub async fn create_recipe(&self, payload: &RecipePayload) -> ApiResponse {
        self.request("/recipes", RequestOptions::post().json(json!(payload)))
            .await
    }

    pub async fn update_recipe(&self, id: &str, payload: &RecipePayload) -> ApiResponse {
        self.request(&recipe_path(id), RequestOptions::put().json(json!(payload)))
            .await
    }

    pub async fn delete_recipe(&self, id: &str) -> ApiResponse {
        self.request(&recipe_path(id), RequestOptions::delete()).await
    }

    pub async fn login(&self, email: &str, password: &str) -> ApiResponse {
        let body = json!({ "email": email, "password": password });
        self.request("/auth/login", RequestOptions::post().auth(false).json(body))
            .await
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> ApiResponse {
        let body = json!({ "name": name, "email": email, "password": password });
        self.request("/auth/register", RequestOptions::post().auth(false).json(body))
            .await
    }
}
