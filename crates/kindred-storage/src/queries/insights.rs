// SPDX-FileCopyrightText: 2026 Kindred Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Insight operations.

use kindred_core::types::{Insight, InsightDraft};
use kindred_core::KindredError;
use rusqlite::params;

use crate::database::{map_tr_err, new_id, now_timestamp, Database};

fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Insight> {
    Ok(Insight {
        id: row.get(0)?,
        relationship_id: row.get(1)?,
        summary: row.get(2)?,
        pattern: row.get(3)?,
        risk_score: row.get(4)?,
        growth_score: row.get(5)?,
        recommended_action: row.get(6)?,
        suggested_message: row.get(7)?,
        created_at: row.get(8)?,
    })
}

/// Persist one insight built from a parsed draft.
pub async fn create_insight(
    db: &Database,
    relationship_id: &str,
    draft: &InsightDraft,
) -> Result<Insight, KindredError> {
    let insight = Insight {
        id: new_id(),
        relationship_id: relationship_id.to_string(),
        summary: draft.summary.clone(),
        pattern: draft.pattern.clone(),
        risk_score: draft.risk_score,
        growth_score: draft.growth_score,
        recommended_action: draft.recommended_action.clone(),
        suggested_message: draft.suggested_message.clone(),
        created_at: now_timestamp(),
    };
    let row = insight.clone();
    db.connection()
        .call(move |conn| -> Result<_, rusqlite::Error> {
            conn.execute(
                "INSERT INTO insights (id, relationship_id, summary, pattern, risk_score,
                     growth_score, recommended_action, suggested_message, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    row.id,
                    row.relationship_id,
                    row.summary,
                    row.pattern,
                    row.risk_score,
                    row.growth_score,
                    row.recommended_action,
                    row.suggested_message,
                    row.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;
    Ok(insight)
}

/// List insights for a relationship, newest first.
pub async fn list_insights(
    db: &Database,
    relationship_id: &str,
) -> Result<Vec<Insight>, KindredError> {
    let relationship_id = relationship_id.to_string();
    db.connection()
        .call(move |conn| -> Result<_, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT id, relationship_id, summary, pattern, risk_score, growth_score,
                        recommended_action, suggested_message, created_at
                 FROM insights WHERE relationship_id = ?1
                 ORDER BY created_at DESC, rowid DESC",
            )?;
            let rows = stmt.query_map(params![relationship_id], from_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::test_support::{seed_relationship, setup_db};

    fn draft(summary: &str) -> InsightDraft {
        InsightDraft {
            summary: Some(summary.to_string()),
            pattern: Some("weekly calls".to_string()),
            risk_score: Some(0.2),
            growth_score: Some(0.7),
            recommended_action: Some("plan a visit".to_string()),
            suggested_message: Some("Miss you!".to_string()),
        }
    }

    #[tokio::test]
    async fn create_insight_stores_draft_verbatim() {
        let db = setup_db().await;
        let rel = seed_relationship(&db, "Ana").await;

        let insight = create_insight(&db, &rel.id, &draft("steady")).await.unwrap();
        assert_eq!(insight.draft(), draft("steady"));

        let listed = list_insights(&db, &rel.id).await.unwrap();
        assert_eq!(listed, vec![insight]);
    }

    #[tokio::test]
    async fn missing_fields_are_stored_as_null() {
        let db = setup_db().await;
        let rel = seed_relationship(&db, "Ana").await;

        let sparse = InsightDraft {
            summary: Some("only a summary".to_string()),
            ..InsightDraft::default()
        };
        create_insight(&db, &rel.id, &sparse).await.unwrap();
        let listed = list_insights(&db, &rel.id).await.unwrap();
        assert_eq!(listed[0].draft(), sparse);
    }

    #[tokio::test]
    async fn create_insight_for_missing_relationship_fails() {
        let db = setup_db().await;
        let result = create_insight(&db, "ghost", &draft("x")).await;
        assert!(matches!(result, Err(KindredError::Storage { .. })));
    }

    #[tokio::test]
    async fn list_insights_is_newest_first() {
        let db = setup_db().await;
        let rel = seed_relationship(&db, "Ana").await;
        let older = create_insight(&db, &rel.id, &draft("older")).await.unwrap();
        let newer = create_insight(&db, &rel.id, &draft("newer")).await.unwrap();

        let listed = list_insights(&db, &rel.id).await.unwrap();
        assert_eq!(listed[0].id, newer.id);
        assert_eq!(listed[1].id, older.id);
    }
}
