// SPDX-FileCopyrightText: 2026 Kindred Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP route layer for Kindred.
//!
//! Exposes the relationship, event, insight and message records as a JSON API
//! and wires POST /analyze to the insight generator.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;

pub use auth::AuthConfig;
pub use error::{ApiError, ErrorResponse};
pub use server::{build_router, start_server, AppState};
