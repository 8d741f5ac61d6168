// SPDX-FileCopyrightText: 2026 Kindred Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping from [`KindredError`] to HTTP responses.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use kindred_core::KindredError;
use serde::Serialize;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
    /// Raw completion text, present only for unparseable model output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            raw: None,
        }
    }
}

/// A handler failure, rendered as `{"error": ...}` with the matching status.
#[derive(Debug)]
pub struct ApiError(pub KindredError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            KindredError::Validation(_) => StatusCode::BAD_REQUEST,
            KindredError::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<KindredError> for ApiError {
    fn from(err: KindredError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(KindredError::Validation(format!(
            "invalid request body: {}",
            rejection.body_text()
        )))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(KindredError::Validation(format!(
            "invalid query string: {}",
            rejection.body_text()
        )))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::debug!(status = %status, error = %self.0, "request rejected");
        }
        let body = ErrorResponse {
            error: self.0.to_string(),
            raw: self.0.raw_text().map(str::to_string),
        };
        (status, Json(body)).into_response()
    }
}
