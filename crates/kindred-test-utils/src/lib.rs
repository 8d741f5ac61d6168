// SPDX-FileCopyrightText: 2026 Kindred Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Kindred integration tests.
//!
//! Provides a mock completion adapter and test harness infrastructure for
//! fast, deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockCompletion`] - Mock completion adapter with scripted outcomes
//! - [`TestHarness`] - Temp SQLite storage, generator and router in one place

pub mod harness;
pub mod mock_completion;

pub use harness::{TestHarness, TestResponse};
pub use mock_completion::{MockCompletion, MockOutcome, MOCK_MODEL};
