// SPDX-FileCopyrightText: 2026 Kindred Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock completion adapter for deterministic testing.
//!
//! `MockCompletion` implements `CompletionAdapter` with pre-configured
//! outcomes, enabling fast, CI-runnable tests without external API calls.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use kindred_core::types::{AdapterType, CompletionRequest, CompletionResponse, HealthStatus};
use kindred_core::{CompletionAdapter, KindredError, PluginAdapter};

/// Model id reported by the mock.
pub const MOCK_MODEL: &str = "mock-model";

/// One scripted answer.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Return this text.
    Text(String),
    /// Return a response without any text blocks.
    NoText,
    /// Fail as an upstream provider error with this message.
    Error(String),
}

/// A mock completion adapter that returns pre-configured outcomes.
///
/// Outcomes are popped from a FIFO queue. When the queue is empty the call
/// fails with a provider error so unexpected calls are visible in tests.
pub struct MockCompletion {
    outcomes: Arc<Mutex<VecDeque<MockOutcome>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockCompletion {
    /// Create a new mock with an empty outcome queue.
    pub fn new() -> Self {
        Self::with_outcomes(Vec::new())
    }

    /// Create a mock pre-loaded with the given outcomes.
    pub fn with_outcomes(outcomes: Vec<MockOutcome>) -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(VecDeque::from(outcomes))),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add an outcome to the end of the queue.
    pub async fn push(&self, outcome: MockOutcome) {
        self.outcomes.lock().await.push_back(outcome);
    }

    /// Queue a text answer.
    pub async fn push_text(&self, text: impl Into<String>) {
        self.push(MockOutcome::Text(text.into())).await;
    }

    /// Every request received so far, oldest first.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }

    /// Number of calls received so far.
    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

impl Default for MockCompletion {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockCompletion {
    fn name(&self) -> &str {
        "mock-completion"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Completion
    }

    async fn health_check(&self) -> Result<HealthStatus, KindredError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), KindredError> {
        Ok(())
    }
}

#[async_trait]
impl CompletionAdapter for MockCompletion {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, KindredError> {
        let model = request.model.clone().unwrap_or_else(|| MOCK_MODEL.to_string());
        self.requests.lock().await.push(request);

        let text = match self.outcomes.lock().await.pop_front() {
            Some(MockOutcome::Text(text)) => Some(text),
            Some(MockOutcome::NoText) => None,
            Some(MockOutcome::Error(message)) => {
                return Err(KindredError::Provider {
                    message,
                    source: None,
                });
            }
            None => {
                return Err(KindredError::Provider {
                    message: "mock completion has no scripted outcome".to_string(),
                    source: None,
                });
            }
        };

        Ok(CompletionResponse {
            text,
            model,
            input_tokens: 10,
            output_tokens: 20,
        })
    }

    fn default_model(&self) -> &str {
        MOCK_MODEL
    }
}
