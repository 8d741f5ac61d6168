// SPDX-FileCopyrightText: 2026 Kindred Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for create/list operations on each table.
//!
//! Every list query orders by `created_at DESC, rowid DESC` so rows written
//! within the same millisecond still come back newest-first.

pub mod events;
pub mod insights;
pub mod messages;
pub mod relationships;

#[cfg(test)]
pub(crate) mod test_support {
    use kindred_core::types::{NewRelationship, Relationship};

    use crate::database::Database;

    pub async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    pub async fn seed_relationship(db: &Database, name: &str) -> Relationship {
        super::relationships::create_relationship(
            db,
            &NewRelationship {
                person_name: name.to_string(),
                kind: Some("friend".to_string()),
                notes: None,
            },
        )
        .await
        .unwrap()
    }
}
