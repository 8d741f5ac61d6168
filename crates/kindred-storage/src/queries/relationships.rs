// SPDX-FileCopyrightText: 2026 Kindred Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Relationship operations.

use kindred_core::types::{NewRelationship, Relationship};
use kindred_core::KindredError;
use rusqlite::{params, OptionalExtension};

use crate::database::{map_tr_err, new_id, now_timestamp, Database};

const SELECT_COLUMNS: &str = "SELECT id, person_name, type, notes, created_at FROM relationships";

fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Relationship> {
    Ok(Relationship {
        id: row.get(0)?,
        person_name: row.get(1)?,
        kind: row.get(2)?,
        notes: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Insert a new relationship and return the stored row.
pub async fn create_relationship(
    db: &Database,
    input: &NewRelationship,
) -> Result<Relationship, KindredError> {
    let relationship = Relationship {
        id: new_id(),
        person_name: input.person_name.clone(),
        kind: input.kind.clone(),
        notes: input.notes.clone(),
        created_at: now_timestamp(),
    };
    let row = relationship.clone();
    db.connection()
        .call(move |conn| -> Result<_, rusqlite::Error> {
            conn.execute(
                "INSERT INTO relationships (id, person_name, type, notes, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![row.id, row.person_name, row.kind, row.notes, row.created_at],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;
    Ok(relationship)
}

/// Get a relationship by ID.
pub async fn get_relationship(
    db: &Database,
    id: &str,
) -> Result<Option<Relationship>, KindredError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<_, rusqlite::Error> {
            conn.query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id],
                from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// List all relationships, newest first.
pub async fn list_relationships(db: &Database) -> Result<Vec<Relationship>, KindredError> {
    db.connection()
        .call(|conn| -> Result<_, rusqlite::Error> {
            let mut stmt =
                conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY created_at DESC, rowid DESC"))?;
            let rows = stmt.query_map([], from_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}

/// Whether a relationship with this ID exists (run inside an open connection).
pub(crate) fn exists(conn: &rusqlite::Connection, id: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT 1 FROM relationships WHERE id = ?1",
        params![id],
        |_| Ok(()),
    )
    .optional()
    .map(|found| found.is_some())
}
