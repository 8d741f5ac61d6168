// SPDX-FileCopyrightText: 2026 Kindred Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Kindred.

use thiserror::Error;

/// The primary error type used across all Kindred adapter traits and route handlers.
#[derive(Debug, Error)]
pub enum KindredError {
    /// Configuration errors (invalid TOML, missing API key, bad header values).
    #[error("configuration error: {0}")]
    Config(String),

    /// A required request field is missing or malformed.
    #[error("{0}")]
    Validation(String),

    /// A referenced record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Completion API errors (unreachable, non-success status, unreadable body).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The completion API answered without any text.
    #[error("completion API returned no text")]
    EmptyResponse,

    /// The completion text could not be used as an insight.
    #[error("failed to parse completion response: {message}")]
    MalformedResponse { message: String, raw: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl KindredError {
    /// Shorthand for wrapping any error as a storage failure.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        KindredError::Storage {
            source: Box::new(err),
        }
    }

    /// Raw upstream text attached to the error, if any.
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            KindredError::MalformedResponse { raw, .. } => Some(raw),
            _ => None,
        }
    }

    /// True when the failure originated in the store or the completion API.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            KindredError::Storage { .. }
                | KindredError::Provider { .. }
                | KindredError::EmptyResponse
                | KindredError::MalformedResponse { .. }
        )
    }
}
