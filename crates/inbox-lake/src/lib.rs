//! # inbox-lake
//!
//! Local `DuckDB` vector index. Holds one row per embedded document: message
//! chunks and recorded decisions. Search is a brute-force cosine scan, which
//! is plenty for a single inbox.

pub mod error;
pub mod search;
pub mod store;

pub use error::LakeError;
pub use search::{VectorFilter, VectorHit};
pub use store::{DocumentKind, VectorDocument};

use std::sync::{Mutex, MutexGuard};

use duckdb::Connection;

const CREATE_VECTORS: &str = "
CREATE TABLE IF NOT EXISTS vectors (
    id TEXT NOT NULL,
    kind TEXT NOT NULL,
    sender_type TEXT,
    text TEXT NOT NULL,
    metadata TEXT NOT NULL DEFAULT '{}',
    embedding FLOAT[] NOT NULL
);
";

/// Vector index backed by one `DuckDB` connection.
///
/// `id` carries no unique constraint: upserts delete then insert inside one
/// transaction, which `DuckDB` index constraints reject for the same key.
///
/// The connection is not `Sync`, so it sits behind a mutex; every method
/// holds the lock only for its own statements.
pub struct VectorLake {
    conn: Mutex<Connection>,
}

impl VectorLake {
    /// Open or create a lake file.
    ///
    /// # Errors
    ///
    /// Returns [`LakeError::DuckDb`] if the file cannot be opened or schema creation fails.
    pub fn open_local(path: &str) -> Result<Self, LakeError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(CREATE_VECTORS)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory lake (for testing).
    ///
    /// # Errors
    ///
    /// Returns [`LakeError::DuckDb`] if schema creation fails.
    pub fn open_in_memory() -> Result<Self, LakeError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(CREATE_VECTORS)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub(crate) fn conn(&self) -> Result<MutexGuard<'_, Connection>, LakeError> {
        self.conn
            .lock()
            .map_err(|_| LakeError::Other("vector lake connection lock poisoned".into()))
    }
}

/// Format a vector as a `DuckDB` array literal: `[0.1, 0.2, ...]`.
pub(crate) fn vec_to_sql(v: &[f32]) -> String {
    use std::fmt::Write;
    let mut s = String::with_capacity(v.len() * 10 + 2);
    s.push('[');
    for (i, x) in v.iter().enumerate() {
        if i > 0 {
            s.push_str(", ");
        }
        let _ = write!(s, "{x}");
    }
    s.push(']');
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_literal_format() {
        assert_eq!(vec_to_sql(&[0.5, -1.0, 2.25]), "[0.5, -1, 2.25]");
        assert_eq!(vec_to_sql(&[]), "[]");
    }

    #[test]
    fn open_in_memory_creates_table() {
        let lake = VectorLake::open_in_memory().unwrap();
        assert_eq!(lake.count().unwrap(), 0);
    }

    #[test]
    fn open_local_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vectors.duckdb");
        let path = path.to_str().unwrap();
        {
            let lake = VectorLake::open_local(path).unwrap();
            let doc = store::tests::doc("m1", DocumentKind::MessageChunk, None, vec![1.0, 0.0]);
            lake.upsert(&[doc]).unwrap();
        }
        let lake = VectorLake::open_local(path).unwrap();
        assert_eq!(lake.count().unwrap(), 1);
    }
}
