// SPDX-FileCopyrightText: 2026 Kindred Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the Kindred REST API.
//!
//! Every handler validates its input, performs one store or generator call,
//! and returns JSON. Failures are returned as [`ApiError`], never panics.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use kindred_core::types::{
    ChatMessage, Event, Insight, MessageBatch, NewChatMessage, NewEvent, NewRelationship,
    Relationship,
};
use kindred_core::{HealthStatus, KindredError};

use crate::error::ApiError;
use crate::server::AppState;

/// Request body for POST /relationships.
#[derive(Debug, Deserialize)]
pub struct CreateRelationshipRequest {
    #[serde(default)]
    pub person_name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request body for POST /events.
#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    #[serde(default)]
    pub relationship_id: Option<String>,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Request body for POST /analyze.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub relationship_id: Option<String>,
}

/// Request body for POST /messages.
#[derive(Debug, Deserialize)]
pub struct IngestMessagesRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub messages: Option<Vec<NewChatMessage>>,
}

/// Response body for POST /messages.
#[derive(Debug, Serialize)]
pub struct IngestMessagesResponse {
    pub success: bool,
    pub inserted: usize,
}

/// Query string for the per-relationship listings.
#[derive(Debug, Deserialize)]
pub struct RelationshipQuery {
    #[serde(default)]
    pub relationship_id: Option<String>,
}

/// Query string for GET /messages.
#[derive(Debug, Deserialize)]
pub struct ThreadQuery {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub thread_id: Option<String>,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "ok" or "degraded".
    pub status: String,
    /// Binary version.
    pub version: String,
    /// Seconds since the router was built.
    pub uptime_secs: u64,
    /// Storage adapter health.
    pub storage: String,
}

/// Returns the trimmed-non-empty value of a required field.
fn required(value: Option<String>, field: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(KindredError::Validation(format!("{field} is required")).into()),
    }
}

/// GET /relationships
pub async fn list_relationships(
    State(state): State<AppState>,
) -> Result<Json<Vec<Relationship>>, ApiError> {
    Ok(Json(state.storage.list_relationships().await?))
}

/// POST /relationships
pub async fn create_relationship(
    State(state): State<AppState>,
    payload: Result<Json<CreateRelationshipRequest>, JsonRejection>,
) -> Result<Json<Relationship>, ApiError> {
    let Json(body) = payload?;
    let input = NewRelationship {
        person_name: required(body.person_name, "person_name")?,
        kind: body.kind,
        notes: body.notes,
    };
    let relationship = state.storage.create_relationship(&input).await?;
    info!(relationship_id = %relationship.id, "relationship created");
    Ok(Json(relationship))
}

/// GET /relationships/{id}
pub async fn get_relationship(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Relationship>, ApiError> {
    state
        .storage
        .get_relationship(&id)
        .await?
        .map(Json)
        .ok_or_else(|| {
            KindredError::NotFound {
                entity: "relationship",
                id,
            }
            .into()
        })
}

/// GET /events?relationship_id=
///
/// Every event of the relationship, newest first.
pub async fn list_events(
    State(state): State<AppState>,
    query: Result<Query<RelationshipQuery>, QueryRejection>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let Query(query) = query?;
    let relationship_id = required(query.relationship_id, "relationship_id")?;
    Ok(Json(
        state.storage.list_events(&relationship_id, None).await?,
    ))
}

/// POST /events
pub async fn create_event(
    State(state): State<AppState>,
    payload: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Result<Json<Event>, ApiError> {
    let Json(body) = payload?;
    let input = NewEvent {
        relationship_id: required(body.relationship_id, "relationship_id")?,
        event_type: required(body.event_type, "event_type")?,
        description: body.description,
    };
    let event = state.storage.create_event(&input).await?;
    debug!(event_id = %event.id, relationship_id = %event.relationship_id, "event created");
    Ok(Json(event))
}

/// GET /insights?relationship_id=
pub async fn list_insights(
    State(state): State<AppState>,
    query: Result<Query<RelationshipQuery>, QueryRejection>,
) -> Result<Json<Vec<Insight>>, ApiError> {
    let Query(query) = query?;
    let relationship_id = required(query.relationship_id, "relationship_id")?;
    Ok(Json(state.storage.list_insights(&relationship_id).await?))
}

/// POST /analyze
///
/// Runs the insight generator once and returns the stored Insight.
pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<Insight>, ApiError> {
    let Json(body) = payload?;
    let relationship_id = required(body.relationship_id, "relationship_id")?;
    let insight = state.generator.generate(&relationship_id).await?;
    Ok(Json(insight))
}

/// POST /messages
///
/// Stores a batch of chat messages for one thread in a single transaction.
pub async fn ingest_messages(
    State(state): State<AppState>,
    payload: Result<Json<IngestMessagesRequest>, JsonRejection>,
) -> Result<Json<IngestMessagesResponse>, ApiError> {
    let Json(body) = payload?;
    let batch = MessageBatch {
        user_id: required(body.user_id, "user_id")?,
        platform: required(body.platform, "platform")?,
        thread_id: required(body.thread_id, "thread_id")?,
        messages: match body.messages {
            Some(messages) if !messages.is_empty() => messages,
            _ => {
                return Err(KindredError::Validation(
                    "messages must be a non-empty array".to_string(),
                )
                .into());
            }
        },
    };
    let inserted = state.storage.insert_messages(&batch).await?;
    info!(
        user_id = %batch.user_id,
        platform = %batch.platform,
        thread_id = %batch.thread_id,
        inserted,
        "messages ingested"
    );
    Ok(Json(IngestMessagesResponse {
        success: true,
        inserted,
    }))
}

/// GET /messages?user_id=&platform=&thread_id=
pub async fn list_messages(
    State(state): State<AppState>,
    query: Result<Query<ThreadQuery>, QueryRejection>,
) -> Result<Json<Vec<ChatMessage>>, ApiError> {
    let Query(query) = query?;
    let user_id = required(query.user_id, "user_id")?;
    let platform = required(query.platform, "platform")?;
    let thread_id = required(query.thread_id, "thread_id")?;
    Ok(Json(
        state
            .storage
            .list_messages(&user_id, &platform, &thread_id)
            .await?,
    ))
}

/// GET /health
///
/// Unauthenticated liveness probe that also reports storage health.
pub async fn get_health(State(state): State<AppState>) -> Response {
    let storage = match state.storage.health_check().await {
        Ok(HealthStatus::Healthy) => "healthy".to_string(),
        Ok(HealthStatus::Degraded(reason)) => format!("degraded: {reason}"),
        Ok(HealthStatus::Unhealthy(reason)) => format!("unhealthy: {reason}"),
        Err(e) => {
            warn!(error = %e, "storage health check failed");
            format!("unhealthy: {e}")
        }
    };
    let healthy = storage == "healthy";
    let body = HealthResponse {
        status: if healthy { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        storage,
    };
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(body)).into_response()
}
