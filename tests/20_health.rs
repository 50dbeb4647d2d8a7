mod common;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use axum::http::StatusCode;

use signup_api::database::{Account, AccountStore, DatabaseError, NewAccount};

use common::TestApp;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let (app, _store) = TestApp::in_memory();

    let res = app.get("/health").await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()?["data"]["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn root_lists_register_endpoint() -> Result<()> {
    let (app, _store) = TestApp::in_memory();

    let res = app.get("/").await?;
    assert_eq!(res.status, StatusCode::OK);

    let body = res.json()?;
    assert_eq!(body["data"]["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["data"]["endpoints"]["register"]
        .as_str()
        .unwrap_or_default()
        .contains("/api/users"));
    Ok(())
}

struct DownStore;

#[async_trait]
impl AccountStore for DownStore {
    async fn find_by_email(&self, _email: &str) -> Result<Option<Account>, DatabaseError> {
        Err(DatabaseError::QueryError("down".to_string()))
    }

    async fn insert(&self, _account: NewAccount) -> Result<Account, DatabaseError> {
        Err(DatabaseError::QueryError("down".to_string()))
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Err(DatabaseError::QueryError("down".to_string()))
    }
}

#[tokio::test]
async fn health_reports_degraded_store() -> Result<()> {
    let app = TestApp::with_store(Arc::new(DownStore));

    let res = app.get("/health").await?;
    assert_eq!(res.status, StatusCode::SERVICE_UNAVAILABLE);

    let body = res.json()?;
    assert_eq!(body["data"]["status"], "degraded");
    assert!(body["data"].get("database_error").is_none(), "store errors stay server-side");
    Ok(())
}

#[tokio::test]
async fn unknown_route_is_not_found() -> Result<()> {
    let (app, _store) = TestApp::in_memory();

    let res = app.get("/api/users/login").await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    Ok(())
}
