// SPDX-FileCopyrightText: 2026 Kindred Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record types shared by storage, the insight generator, and the gateway.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Storage,
    Completion,
}

// --- Relationships ---

/// A tracked person or connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: String,
    pub person_name: String,
    /// Free-text label such as "friend" or "partner".
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub notes: Option<String>,
    /// RFC 3339 UTC timestamp with millisecond precision.
    pub created_at: String,
}

/// Validated input for creating a relationship.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRelationship {
    pub person_name: String,
    pub kind: Option<String>,
    pub notes: Option<String>,
}

// --- Events ---

/// A logged occurrence tied to exactly one relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub relationship_id: String,
    pub event_type: String,
    pub description: Option<String>,
    pub created_at: String,
}

/// Validated input for logging an event.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub relationship_id: String,
    pub event_type: String,
    pub description: Option<String>,
}

// --- Insights ---

/// The six-field object the completion API is asked to produce.
///
/// Every field may be absent; scores that are present must lie in `0.0..=1.0`
/// (checked by the insight generator, not by serde).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightDraft {
    pub summary: Option<String>,
    pub pattern: Option<String>,
    pub risk_score: Option<f64>,
    pub growth_score: Option<f64>,
    pub recommended_action: Option<String>,
    pub suggested_message: Option<String>,
}

/// A persisted AI-generated summary of a relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub id: String,
    pub relationship_id: String,
    pub summary: Option<String>,
    pub pattern: Option<String>,
    pub risk_score: Option<f64>,
    pub growth_score: Option<f64>,
    pub recommended_action: Option<String>,
    pub suggested_message: Option<String>,
    pub created_at: String,
}

impl Insight {
    /// Returns the six model-produced fields of this insight.
    pub fn draft(&self) -> InsightDraft {
        InsightDraft {
            summary: self.summary.clone(),
            pattern: self.pattern.clone(),
            risk_score: self.risk_score,
            growth_score: self.growth_score,
            recommended_action: self.recommended_action.clone(),
            suggested_message: self.suggested_message.clone(),
        }
    }
}

// --- Chat messages ---

/// An ingested chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub user_id: String,
    pub platform: String,
    pub thread_id: String,
    pub from_me: bool,
    pub text: String,
    /// Timestamp as supplied by the ingesting client.
    pub timestamp: String,
    pub created_at: String,
}

/// One message inside a [`MessageBatch`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewChatMessage {
    pub from_me: bool,
    pub text: String,
    pub timestamp: String,
}

/// A batch of messages from one user/platform/thread triple.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageBatch {
    pub user_id: String,
    pub platform: String,
    pub thread_id: String,
    pub messages: Vec<NewChatMessage>,
}

// --- Completion ---

/// A single-prompt request to a completion adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    /// Overrides the adapter's default model when set.
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    /// Creates a request that uses the adapter's defaults.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: None,
            max_tokens: None,
        }
    }
}

/// The result of a completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    /// Concatenated text output, `None` when the API returned no text blocks.
    pub text: Option<String>,
    pub model: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
}
