// SPDX-FileCopyrightText: 2026 Kindred Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt text sent to the completion API.

use std::fmt::{self, Write};

use kindred_core::types::{Event, Relationship};

/// Line used in place of the event list when a relationship has none.
pub const NO_EVENTS_PLACEHOLDER: &str = "No events logged yet.";

const INSTRUCTIONS: &str = "\
You are a thoughtful relationship coach. Read the relationship details and \
recent events below, then respond with ONLY a JSON object. Do not add prose, \
explanations, or code fences. The object must have exactly these fields:
{
  \"summary\": string, a short overview of the relationship's current state,
  \"pattern\": string, a recurring pattern in the events,
  \"risk_score\": number from 0 to 1, how at risk the relationship is,
  \"growth_score\": number from 0 to 1, how much the relationship is growing,
  \"recommended_action\": string, one concrete next step,
  \"suggested_message\": string, a message the user could send
}";

/// Renders the prompt for one relationship and its recent events.
///
/// `events` are rendered in the order given (newest first from the store).
pub fn build_prompt(relationship: &Relationship, events: &[Event]) -> String {
    let mut prompt = String::with_capacity(INSTRUCTIONS.len() + 256 + events.len() * 64);
    prompt.push_str(INSTRUCTIONS);
    prompt.push_str("\n\n");
    // Writing into a String cannot fail.
    let _ = write_context(&mut prompt, relationship, events);
    prompt
}

fn write_context(out: &mut String, relationship: &Relationship, events: &[Event]) -> fmt::Result {
    writeln!(out, "Person: {}", relationship.person_name)?;
    writeln!(
        out,
        "Relationship type: {}",
        relationship.kind.as_deref().unwrap_or("unspecified")
    )?;
    writeln!(
        out,
        "Notes: {}",
        relationship.notes.as_deref().unwrap_or("none")
    )?;

    out.push_str("\nRecent events (newest first):\n");
    if events.is_empty() {
        writeln!(out, "{NO_EVENTS_PLACEHOLDER}")?;
    }
    for event in events {
        match event.description.as_deref() {
            Some(description) => writeln!(
                out,
                "- [{}] {}: {}",
                event.created_at, event.event_type, description
            )?,
            None => writeln!(out, "- [{}] {}", event.created_at, event.event_type)?,
        }
    }
    Ok(())
}
