// SPDX-FileCopyrightText: 2026 Kindred Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat message ingestion.

use kindred_core::types::{ChatMessage, MessageBatch};
use kindred_core::KindredError;
use rusqlite::params;

use crate::database::{map_tr_err, new_id, now_timestamp, Database};

fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ChatMessage> {
    Ok(ChatMessage {
        id: row.get(0)?,
        user_id: row.get(1)?,
        platform: row.get(2)?,
        thread_id: row.get(3)?,
        from_me: row.get(4)?,
        text: row.get(5)?,
        timestamp: row.get(6)?,
        created_at: row.get(7)?,
    })
}

/// Insert every message of the batch in one transaction.
///
/// Returns the number of rows written; on error nothing is committed.
pub async fn insert_messages(db: &Database, batch: &MessageBatch) -> Result<usize, KindredError> {
    let batch = batch.clone();
    let created_at = now_timestamp();
    db.connection()
        .call(move |conn| -> Result<_, rusqlite::Error> {
            let tx = conn.transaction()?;
            let mut inserted = 0;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO messages
                         (id, user_id, platform, thread_id, from_me, text, timestamp, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                )?;
                for msg in &batch.messages {
                    inserted += stmt.execute(params![
                        new_id(),
                        batch.user_id,
                        batch.platform,
                        batch.thread_id,
                        msg.from_me,
                        msg.text,
                        msg.timestamp,
                        created_at,
                    ])?;
                }
            }
            tx.commit()?;
            Ok(inserted)
        })
        .await
        .map_err(map_tr_err)
}

/// List messages of one thread, most recent `timestamp` first.
pub async fn list_messages(
    db: &Database,
    user_id: &str,
    platform: &str,
    thread_id: &str,
) -> Result<Vec<ChatMessage>, KindredError> {
    let (user_id, platform, thread_id) =
        (user_id.to_string(), platform.to_string(), thread_id.to_string());
    db.connection()
        .call(move |conn| -> Result<_, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, platform, thread_id, from_me, text, timestamp, created_at
                 FROM messages WHERE user_id = ?1 AND platform = ?2 AND thread_id = ?3
                 ORDER BY timestamp DESC, rowid DESC",
            )?;
            let rows = stmt.query_map(params![user_id, platform, thread_id], from_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}
