// SPDX-FileCopyrightText: 2026 Kindred Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Optional bearer-token authentication for the API routes.
//!
//! When no token is configured the API is open; `/health` never passes
//! through this middleware.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::ErrorResponse;

/// Authentication configuration for the gateway.
#[derive(Clone, Default)]
pub struct AuthConfig {
    /// Expected bearer token. If `Some`, bearer auth is enforced.
    pub bearer_token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}

/// Middleware that checks `Authorization: Bearer <token>` when a token is configured.
pub async fn auth_middleware(
    State(auth): State<AuthConfig>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected_token) = auth.bearer_token.as_deref() else {
        return next.run(request).await;
    };

    let presented = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if presented == Some(expected_token) {
        return next.run(request).await;
    }

    tracing::debug!(path = %request.uri().path(), "rejected request without valid bearer token");
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse::new("unauthorized")),
    )
        .into_response()
}
