// SPDX-FileCopyrightText: 2026 Kindred Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event operations.

use kindred_core::types::{Event, NewEvent};
use kindred_core::KindredError;
use rusqlite::params;

use crate::database::{map_tr_err, new_id, now_timestamp, Database};
use crate::queries::relationships;

fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Event> {
    Ok(Event {
        id: row.get(0)?,
        relationship_id: row.get(1)?,
        event_type: row.get(2)?,
        description: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Insert a new event for an existing relationship.
///
/// The existence check and the insert run in the same connection call, so
/// a missing relationship surfaces as `NotFound` instead of a constraint error.
pub async fn create_event(db: &Database, input: &NewEvent) -> Result<Event, KindredError> {
    let event = Event {
        id: new_id(),
        relationship_id: input.relationship_id.clone(),
        event_type: input.event_type.clone(),
        description: input.description.clone(),
        created_at: now_timestamp(),
    };
    let row = event.clone();
    let inserted = db
        .connection()
        .call(move |conn| -> Result<_, rusqlite::Error> {
            if !relationships::exists(conn, &row.relationship_id)? {
                return Ok(false);
            }
            conn.execute(
                "INSERT INTO events (id, relationship_id, event_type, description, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    row.id,
                    row.relationship_id,
                    row.event_type,
                    row.description,
                    row.created_at,
                ],
            )?;
            Ok(true)
        })
        .await
        .map_err(map_tr_err)?;

    if !inserted {
        return Err(KindredError::NotFound {
            entity: "relationship",
            id: event.relationship_id,
        });
    }
    Ok(event)
}

/// List events for a relationship, newest first, optionally capped at `limit` rows.
pub async fn list_events(
    db: &Database,
    relationship_id: &str,
    limit: Option<i64>,
) -> Result<Vec<Event>, KindredError> {
    let relationship_id = relationship_id.to_string();
    // SQLite treats a negative LIMIT as "no limit".
    let limit = limit.unwrap_or(-1);
    db.connection()
        .call(move |conn| -> Result<_, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT id, relationship_id, event_type, description, created_at
                 FROM events WHERE relationship_id = ?1
                 ORDER BY created_at DESC, rowid DESC LIMIT ?2",
            )?;
            let rows = stmt.query_map(params![relationship_id, limit], from_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}
