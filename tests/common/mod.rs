#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use signup_api::config::AppConfig;
use signup_api::database::{AccountStore, InMemoryAccountStore};
use signup_api::AppState;

pub const TEST_SECRET: &str = "integration-test-secret";

/// Development preset with a signing secret and the cheapest bcrypt cost.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::from_lookup(|_| None).expect("default config");
    config.security.jwt_secret = TEST_SECRET.to_string();
    config.security.bcrypt_cost = 4;
    config.api.enable_request_logging = false;
    config
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn with_store(store: Arc<dyn AccountStore>) -> Self {
        let state = AppState::new(test_config(), store);
        Self {
            router: signup_api::app(state.clone()),
            state,
        }
    }

    pub fn in_memory() -> (Self, Arc<InMemoryAccountStore>) {
        let store = Arc::new(InMemoryAccountStore::new());
        (Self::with_store(store.clone()), store)
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> Result<TestResponse> {
        self.post_raw(uri, body.to_string()).await
    }

    pub async fn post_raw(&self, uri: &str, body: impl Into<Body>) -> Result<TestResponse> {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .context("failed to build request")?;
        self.send(request).await
    }

    pub async fn get(&self, uri: &str) -> Result<TestResponse> {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .context("failed to build request")?;
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        Ok(TestResponse {
            status,
            body: bytes.to_vec(),
        })
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Result<Value> {
        serde_json::from_slice(&self.body).context("response body is not JSON")
    }
}
