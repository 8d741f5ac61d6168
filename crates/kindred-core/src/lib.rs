// SPDX-FileCopyrightText: 2026 Kindred Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Kindred.
//!
//! This crate provides the record types, the shared error type, and the
//! adapter traits that the storage backend and the completion API client
//! implement.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::KindredError;
pub use types::{AdapterType, HealthStatus};

pub use traits::{CompletionAdapter, PluginAdapter, StorageAdapter};
