//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::task::JoinHandle;
use tower::ServiceExt;

use warden_api::{AppState, build_app};
use warden_cache::UserCache;
use warden_core::config::{AppConfig, AuthConfig};
use warden_entity::role::Role;
use warden_entity::user::User;
use warden_store::MemoryDocumentStore;
use warden_store::traits::DocumentStore;

/// A response with its body read.
pub struct TestResponse {
    pub status: StatusCode,
    pub text: String,
}

impl TestResponse {
    /// The body parsed as JSON.
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.text).expect("response body is not JSON")
    }
}

/// Test application context over an in-memory store.
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    pub state: AppState,
    pub store: Arc<MemoryDocumentStore>,
    pub cache: Arc<UserCache>,
    refresh: JoinHandle<()>,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.refresh.abort();
    }
}

impl TestApp {
    pub async fn new() -> Self {
        let config = AppConfig {
            auth: AuthConfig {
                token_secret: "integration-secret".to_string(),
                password_memory_kib: 1024,
                password_iterations: 1,
                ..AuthConfig::default()
            },
            ..AppConfig::default()
        };

        let store = Arc::new(MemoryDocumentStore::new());
        let cache = Arc::new(UserCache::new(store.clone()));
        let state = AppState::new(config, store.clone(), cache.clone())
            .expect("Failed to build app state");
        cache.refresh().await.expect("Failed to load user cache");
        let refresh = cache.spawn_refresh();

        Self {
            router: build_app(state.clone()),
            state,
            store,
            cache,
            refresh,
        }
    }

    /// Inserts a role granting `permissions`.
    pub async fn create_role(&self, name: &str, permissions: &[&str]) -> Role {
        self.store
            .insert_role(Role::new(name, "", permissions.iter().copied()))
            .await
            .expect("Failed to insert role")
    }

    /// Inserts an enabled user holding a single role with `permissions`.
    pub async fn create_user(&self, username: &str, password: &str, permissions: &[&str]) -> User {
        let role = self
            .create_role(&format!("{username}-role"), permissions)
            .await;
        self.insert_user(User::new(username, self.hash(password), vec![role.id]))
            .await
    }

    /// Inserts `user` straight into the store and reloads the cache.
    pub async fn insert_user(&self, user: User) -> User {
        let user = self
            .store
            .insert_user(user)
            .await
            .expect("Failed to insert user");
        self.cache.refresh().await.expect("Failed to refresh cache");
        user
    }

    pub fn hash(&self, password: &str) -> String {
        self.state
            .password_hasher
            .hash_password(password)
            .expect("Failed to hash password")
    }

    /// Logs in and returns the bare token.
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/v1/auth/login",
                Some(serde_json::json!({ "username": username, "password": password })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.text);
        response.text
    }

    /// Sends one request.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let header = token.map(|t| format!("Bearer {t}"));
        self.request_with_header(method, path, body, header.as_deref())
            .await
    }

    /// Sends one request with a raw `Authorization` value.
    pub async fn request_with_header(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        authorization: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();

        TestResponse {
            status,
            text: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}
