// SPDX-FileCopyrightText: 2026 Kindred Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion adapter trait for external text-generation APIs.

use async_trait::async_trait;

use crate::error::KindredError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{CompletionRequest, CompletionResponse};

/// Adapter for a language-model text-completion API.
///
/// One call, one response: implementations do not retry, cache, or stream.
#[async_trait]
pub trait CompletionAdapter: PluginAdapter {
    /// Sends a single prompt and returns the model's answer.
    async fn complete(&self, request: CompletionRequest)
        -> Result<CompletionResponse, KindredError>;

    /// Model identifier used when a request does not override it.
    fn default_model(&self) -> &str;
}
