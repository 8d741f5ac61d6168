// SPDX-FileCopyrightText: 2026 Kindred Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parsing of completion text into an [`InsightDraft`].

use kindred_core::KindredError;
use kindred_core::types::InsightDraft;

/// Parses the completion text as a JSON object holding the insight fields.
///
/// The text is used as-is: no fence stripping, no repair. Missing fields are
/// left empty. Present scores must be numbers in `0.0..=1.0`.
pub fn parse_draft(text: &str) -> Result<InsightDraft, KindredError> {
    let malformed = |message: String| KindredError::MalformedResponse {
        message,
        raw: text.to_string(),
    };

    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| malformed(format!("invalid JSON: {e}")))?;
    if !value.is_object() {
        return Err(malformed("expected a JSON object".to_string()));
    }

    let draft: InsightDraft = serde_json::from_value(value)
        .map_err(|e| malformed(format!("unexpected field type: {e}")))?;

    for (name, score) in [
        ("risk_score", draft.risk_score),
        ("growth_score", draft.growth_score),
    ] {
        if let Some(score) = score
            && !(0.0..=1.0).contains(&score)
        {
            return Err(malformed(format!("{name} {score} is outside 0..=1")));
        }
    }

    Ok(draft)
}
