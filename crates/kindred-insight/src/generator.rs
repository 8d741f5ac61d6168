// SPDX-FileCopyrightText: 2026 Kindred Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fetch, prompt, complete, parse, persist.

use std::sync::Arc;

use kindred_config::model::InsightConfig;
use kindred_core::types::{CompletionRequest, Insight};
use kindred_core::{CompletionAdapter, KindredError, StorageAdapter};
use tracing::{debug, info, warn};

use crate::parse::parse_draft;
use crate::prompt::build_prompt;

/// Generates and stores insights for a relationship.
///
/// Each call performs one completion request and, only when every step
/// succeeds, appends exactly one Insight row.
pub struct InsightGenerator {
    storage: Arc<dyn StorageAdapter>,
    completion: Arc<dyn CompletionAdapter>,
    event_limit: u32,
}

impl InsightGenerator {
    pub fn new(
        storage: Arc<dyn StorageAdapter>,
        completion: Arc<dyn CompletionAdapter>,
        config: &InsightConfig,
    ) -> Self {
        Self {
            storage,
            completion,
            event_limit: config.event_limit,
        }
    }

    /// Number of recent events embedded in each prompt.
    pub fn event_limit(&self) -> u32 {
        self.event_limit
    }

    /// Runs the full analysis for `relationship_id` and returns the stored insight.
    pub async fn generate(&self, relationship_id: &str) -> Result<Insight, KindredError> {
        if relationship_id.trim().is_empty() {
            return Err(KindredError::Validation(
                "relationship_id is required".to_string(),
            ));
        }

        let relationship = self
            .storage
            .get_relationship(relationship_id)
            .await?
            .ok_or_else(|| KindredError::NotFound {
                entity: "relationship",
                id: relationship_id.to_string(),
            })?;

        let events = self
            .storage
            .list_events(relationship_id, Some(i64::from(self.event_limit)))
            .await?;
        debug!(
            relationship_id,
            events = events.len(),
            limit = self.event_limit,
            "building insight prompt"
        );

        let prompt = build_prompt(&relationship, &events);
        let mut request = CompletionRequest::new(prompt);
        request.model = Some(self.completion.default_model().to_string());

        let response = self.completion.complete(request).await?;
        let text = match response.text {
            Some(text) if !text.trim().is_empty() => text,
            _ => {
                warn!(relationship_id, "completion returned no text");
                return Err(KindredError::EmptyResponse);
            }
        };

        let draft = parse_draft(&text).inspect_err(|e| {
            warn!(relationship_id, error = %e, "completion text is not a usable insight");
        })?;

        let insight = self.storage.create_insight(relationship_id, &draft).await?;
        info!(
            relationship_id,
            insight_id = %insight.id,
            model = %response.model,
            output_tokens = response.output_tokens,
            "insight stored"
        );
        Ok(insight)
    }
}
