//! # inbox-db
//!
//! libSQL store for all relational state: messages, decisions, precedent
//! links, the derived decision graph, and the BM25 lexical index.
//!
//! Uses the `libsql` crate (C `SQLite` fork) for native FTS5.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
pub mod trail;

#[cfg(test)]
pub(crate) mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Database handle: a libSQL database and its single connection.
pub struct InboxDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl InboxDb {
    /// Open a local database at the given path, or `":memory:"`.
    ///
    /// Runs migrations on every open; they are idempotent.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let inbox_db = Self { db, conn };
        inbox_db.run_migrations().await?;
        Ok(inbox_db)
    }

    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL, e.g. `"dec-a3f8b2c1"`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    async fn test_db() -> InboxDb {
        InboxDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;
        let tables = [
            "messages",
            "decisions",
            "decision_precedents",
            "graph_nodes",
            "graph_edges",
            "lexical_fts",
        ];
        for table in &tables {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [*table],
                )
                .await
                .unwrap();
            assert!(rows.next().await.unwrap().is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn generate_id_format_and_uniqueness() {
        let db = test_db().await;
        let mut ids = HashSet::new();
        for _ in 0..50 {
            let id = db.generate_id("dec").await.unwrap();
            assert!(id.starts_with("dec-"));
            assert_eq!(id.len(), 12);
            assert!(id[4..].chars().all(|c| c.is_ascii_hexdigit()));
            assert!(ids.insert(id));
        }
    }

    #[tokio::test]
    async fn idempotent_migrations() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let db = test_db().await;
        let result = db
            .conn()
            .execute(
                "INSERT INTO decisions (id, message_id, agent_action, agent_tone, human_action, human_tone, context_sender_type, created_at)
                 VALUES ('dec-1', 'msg-missing', 'ignore', 'warm', 'ignore', 'warm', 'sales', '2026-01-01T00:00:00Z')",
                (),
            )
            .await;
        assert!(result.is_err(), "decision without a message must be rejected");
    }
}
