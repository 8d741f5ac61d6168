// SPDX-FileCopyrightText: 2026 Kindred Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles the complete route layer with a mock completion
//! adapter and a temp SQLite database, and drives it with
//! `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use kindred_config::model::{InsightConfig, StorageConfig};
use kindred_core::types::{Event, NewEvent, NewRelationship, Relationship};
use kindred_core::{KindredError, StorageAdapter};
use kindred_gateway::{build_router, AppState, AuthConfig};
use kindred_insight::InsightGenerator;
use kindred_storage::SqliteStorage;
use tower::ServiceExt;

use crate::mock_completion::{MockCompletion, MockOutcome};

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    outcomes: Vec<MockOutcome>,
    bearer_token: Option<String>,
    event_limit: u32,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            outcomes: Vec::new(),
            bearer_token: None,
            event_limit: InsightConfig::default().event_limit,
        }
    }

    /// Queue mock completion outcomes.
    pub fn with_outcomes(mut self, outcomes: Vec<MockOutcome>) -> Self {
        self.outcomes = outcomes;
        self
    }

    /// Queue mock completion texts.
    pub fn with_completions(mut self, texts: Vec<String>) -> Self {
        self.outcomes = texts.into_iter().map(MockOutcome::Text).collect();
        self
    }

    /// Require this bearer token on API routes.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Override the number of events embedded in prompts.
    pub fn with_event_limit(mut self, limit: u32) -> Self {
        self.event_limit = limit;
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, KindredError> {
        let temp_dir = tempfile::TempDir::new().map_err(KindredError::storage)?;
        let db_path = temp_dir.path().join("test.db");

        let storage = Arc::new(SqliteStorage::new(StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: true,
        }));
        storage.initialize().await?;

        let completion = Arc::new(MockCompletion::with_outcomes(self.outcomes));
        let generator = Arc::new(InsightGenerator::new(
            storage.clone(),
            completion.clone(),
            &InsightConfig {
                event_limit: self.event_limit,
            },
        ));

        let state = AppState::new(
            storage.clone(),
            generator.clone(),
            AuthConfig {
                bearer_token: self.bearer_token.clone(),
            },
        );

        Ok(TestHarness {
            storage,
            completion,
            generator,
            router: build_router(state),
            bearer_token: self.bearer_token,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment with a mock completion adapter and temp storage.
pub struct TestHarness {
    /// SQLite storage adapter (temp DB, cleaned up on drop).
    pub storage: Arc<SqliteStorage>,
    /// The mock completion adapter.
    pub completion: Arc<MockCompletion>,
    /// Insight generator wired to the mock.
    pub generator: Arc<InsightGenerator>,
    /// Router under test.
    pub router: Router,
    bearer_token: Option<String>,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

/// Status and parsed JSON body of one response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: serde_json::Value,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Harness with default settings and no scripted completions.
    pub async fn new() -> Result<Self, KindredError> {
        Self::builder().build().await
    }

    /// Insert a relationship directly into storage.
    pub async fn seed_relationship(&self, name: &str) -> Result<Relationship, KindredError> {
        self.storage
            .create_relationship(&NewRelationship {
                person_name: name.to_string(),
                kind: None,
                notes: None,
            })
            .await
    }

    /// Insert an event directly into storage.
    pub async fn seed_event(
        &self,
        relationship_id: &str,
        event_type: &str,
    ) -> Result<Event, KindredError> {
        self.storage
            .create_event(&NewEvent {
                relationship_id: relationship_id.to_string(),
                event_type: event_type.to_string(),
                description: None,
            })
            .await
    }

    /// Send one request through the router, attaching the configured token.
    pub async fn send(&self, method: Method, uri: &str, body: Option<String>) -> TestResponse {
        let token = self.bearer_token.clone();
        self.send_with_token(method, uri, body, token.as_deref()).await
    }

    /// Send one request with an explicit (or no) bearer token.
    pub async fn send_with_token(
        &self,
        method: Method,
        uri: &str,
        body: Option<String>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if body.is_some() {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = builder
            .body(body.map(Body::from).unwrap_or_else(Body::empty))
            .expect("valid request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("JSON response body")
        };
        TestResponse { status, body }
    }

    /// GET `uri`.
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    /// POST `body` as JSON to `uri`.
    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body.to_string())).await
    }

    /// POST an arbitrary (possibly malformed) body to `uri`.
    pub async fn post_raw(&self, uri: &str, body: &str) -> TestResponse {
        self.send(Method::POST, uri, Some(body.to_string())).await
    }
}
