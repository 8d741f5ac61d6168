// SPDX-FileCopyrightText: 2026 Kindred Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for the persistence gateway.

use async_trait::async_trait;

use crate::error::KindredError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    ChatMessage, Event, Insight, InsightDraft, MessageBatch, NewEvent, NewRelationship,
    Relationship,
};

/// Adapter for the relational store holding relationships, events,
/// insights, and ingested messages.
///
/// Every `list_*` operation returns rows newest-first. Identifiers and
/// creation timestamps are assigned by the adapter on insert.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), KindredError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), KindredError>;

    // --- Relationships ---

    async fn create_relationship(
        &self,
        input: &NewRelationship,
    ) -> Result<Relationship, KindredError>;

    async fn list_relationships(&self) -> Result<Vec<Relationship>, KindredError>;

    async fn get_relationship(&self, id: &str) -> Result<Option<Relationship>, KindredError>;

    // --- Events ---

    /// Fails with [`KindredError::NotFound`] when the relationship does not exist.
    async fn create_event(&self, input: &NewEvent) -> Result<Event, KindredError>;

    async fn list_events(
        &self,
        relationship_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<Event>, KindredError>;

    // --- Insights ---

    async fn create_insight(
        &self,
        relationship_id: &str,
        draft: &InsightDraft,
    ) -> Result<Insight, KindredError>;

    async fn list_insights(&self, relationship_id: &str) -> Result<Vec<Insight>, KindredError>;

    // --- Messages ---

    /// Inserts the whole batch atomically and returns the number of rows written.
    async fn insert_messages(&self, batch: &MessageBatch) -> Result<usize, KindredError>;

    async fn list_messages(
        &self,
        user_id: &str,
        platform: &str,
        thread_id: &str,
    ) -> Result<Vec<ChatMessage>, KindredError>;
}
