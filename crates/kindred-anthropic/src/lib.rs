// SPDX-FileCopyrightText: 2026 Kindred Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anthropic completion adapter for Kindred.
//!
//! This crate implements [`CompletionAdapter`] for the Anthropic Messages API.
//! Each insight request becomes one non-streaming call holding a single user
//! message.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use kindred_config::model::AnthropicConfig;
use kindred_core::types::{CompletionRequest, CompletionResponse};
use kindred_core::{AdapterType, CompletionAdapter, HealthStatus, KindredError, PluginAdapter};
use tracing::{debug, info};

use crate::client::AnthropicClient;
use crate::types::MessageRequest;

/// Environment variable consulted when the config carries no API key.
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Anthropic Claude provider implementing [`CompletionAdapter`].
///
/// API key resolution order: config -> `ANTHROPIC_API_KEY` env var -> error.
pub struct AnthropicProvider {
    client: AnthropicClient,
    max_tokens: u32,
}

impl AnthropicProvider {
    /// Creates a new Anthropic provider from the `[anthropic]` config section.
    pub fn new(config: &AnthropicConfig) -> Result<Self, KindredError> {
        let api_key = resolve_api_key(&config.api_key)?;
        let client = AnthropicClient::new(
            api_key,
            config.api_version.clone(),
            config.model.clone(),
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )?;

        info!(model = %config.model, "Anthropic provider initialized");

        Ok(Self {
            client,
            max_tokens: config.max_tokens,
        })
    }

    fn to_message_request(&self, request: CompletionRequest) -> MessageRequest {
        MessageRequest::single_user(
            request
                .model
                .unwrap_or_else(|| self.client.default_model().to_string()),
            request.max_tokens.unwrap_or(self.max_tokens),
            request.prompt,
        )
    }
}

#[async_trait]
impl PluginAdapter for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Completion
    }

    async fn health_check(&self) -> Result<HealthStatus, KindredError> {
        // No API call here: health checks must not consume tokens.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), KindredError> {
        debug!("Anthropic provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl CompletionAdapter for AnthropicProvider {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, KindredError> {
        let api_request = self.to_message_request(request);
        let response = self.client.complete_message(&api_request).await?;

        debug!(
            model = %response.model,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            stop_reason = ?response.stop_reason,
            "completion finished"
        );

        Ok(CompletionResponse {
            text: response.text(),
            model: response.model,
            input_tokens: response.usage.input_tokens,
            output_tokens: response.usage.output_tokens,
        })
    }

    fn default_model(&self) -> &str {
        self.client.default_model()
    }
}

/// Resolves the API key from config first, then the environment.
pub fn resolve_api_key(config_key: &Option<String>) -> Result<String, KindredError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(key.clone());
    }

    match std::env::var(API_KEY_ENV) {
        Ok(key) if !key.is_empty() => Ok(key),
        _ => Err(KindredError::Config(
            "Anthropic API key not found. Set anthropic.api_key in config or ANTHROPIC_API_KEY environment variable.".into(),
        )),
    }
}
