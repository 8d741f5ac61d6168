// SPDX-FileCopyrightText: 2026 Kindred Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Insight generation for Kindred.
//!
//! Turns a relationship and its recent events into a prompt, sends it to a
//! [`CompletionAdapter`](kindred_core::CompletionAdapter), parses the answer
//! and stores it as an Insight.

pub mod generator;
pub mod parse;
pub mod prompt;

pub use generator::InsightGenerator;
pub use parse::parse_draft;
pub use prompt::{build_prompt, NO_EVENTS_PLACEHOLDER};
