//! Writes to the vector index.
//!
//! Embeddings go in through a `?::FLOAT[]` cast of a string literal; the
//! `duckdb` appender does not handle list columns from `Vec<f32>`.

use duckdb::params;
use inbox_core::enums::SenderType;

use crate::{LakeError, VectorLake, vec_to_sql};

/// What a vector row was embedded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    MessageChunk,
    Decision,
}

impl DocumentKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MessageChunk => "message_chunk",
            Self::Decision => "decision",
        }
    }
}

/// One embedded document.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorDocument {
    pub id: String,
    pub kind: DocumentKind,
    pub sender_type: Option<SenderType>,
    pub text: String,
    pub metadata: serde_json::Map<String, serde_json::Value>,
    pub embedding: Vec<f32>,
}

impl VectorLake {
    /// Insert or replace documents by id. Returns how many were written.
    ///
    /// Documents with an empty embedding are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`LakeError`] if any statement fails; nothing is written then.
    pub fn upsert(&self, documents: &[VectorDocument]) -> Result<usize, LakeError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let mut written = 0;
        {
            let mut delete = tx.prepare("DELETE FROM vectors WHERE id = ?")?;
            let mut insert = tx.prepare(
                "INSERT INTO vectors (id, kind, sender_type, text, metadata, embedding)
                 VALUES (?, ?, ?, ?, ?, ?::FLOAT[])",
            )?;
            for doc in documents {
                if doc.embedding.is_empty() {
                    tracing::debug!(id = %doc.id, "skipping document without embedding");
                    continue;
                }
                delete.execute(params![doc.id])?;
                insert.execute(params![
                    doc.id,
                    doc.kind.as_str(),
                    doc.sender_type.map(SenderType::as_str),
                    doc.text,
                    serde_json::to_string(&doc.metadata)?,
                    vec_to_sql(&doc.embedding),
                ])?;
                written += 1;
            }
        }
        tx.commit()?;
        Ok(written)
    }

    /// Delete every document of one kind. Returns the number removed.
    ///
    /// # Errors
    ///
    /// Returns [`LakeError::DuckDb`] if the delete fails.
    pub fn delete_kind(&self, kind: DocumentKind) -> Result<usize, LakeError> {
        let conn = self.conn()?;
        Ok(conn.execute("DELETE FROM vectors WHERE kind = ?", params![kind.as_str()])?)
    }

    /// Delete every document whose id is `id` or a chunk of it (`id#n`).
    ///
    /// # Errors
    ///
    /// Returns [`LakeError::DuckDb`] if the delete fails.
    pub fn delete_with_chunks(&self, id: &str) -> Result<usize, LakeError> {
        let conn = self.conn()?;
        let chunk_prefix = format!("{id}#%");
        Ok(conn.execute(
            "DELETE FROM vectors WHERE id = ? OR id LIKE ?",
            params![id, chunk_prefix],
        )?)
    }

    /// Number of stored documents.
    ///
    /// # Errors
    ///
    /// Returns [`LakeError::DuckDb`] if the count fails.
    pub fn count(&self) -> Result<usize, LakeError> {
        let conn = self.conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM vectors", [], |row| row.get(0))?;
        Ok(usize::try_from(n).unwrap_or(0))
    }

    /// Number of stored documents of one kind.
    ///
    /// # Errors
    ///
    /// Returns [`LakeError::DuckDb`] if the count fails.
    pub fn count_kind(&self, kind: DocumentKind) -> Result<usize, LakeError> {
        let conn = self.conn()?;
        let n: i64 = conn.query_row(
            "SELECT COUNT(*) FROM vectors WHERE kind = ?",
            params![kind.as_str()],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(n).unwrap_or(0))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    pub(crate) fn doc(
        id: &str,
        kind: DocumentKind,
        sender_type: Option<SenderType>,
        embedding: Vec<f32>,
    ) -> VectorDocument {
        let mut metadata = serde_json::Map::new();
        metadata.insert("message_id".into(), id.into());
        VectorDocument {
            id: id.to_string(),
            kind,
            sender_type,
            text: format!("text of {id}"),
            metadata,
            embedding,
        }
    }

    #[test]
    fn upsert_replaces_by_id() {
        let lake = VectorLake::open_in_memory().unwrap();
        lake.upsert(&[doc("m1", DocumentKind::MessageChunk, None, vec![1.0, 0.0])])
            .unwrap();
        let mut replacement = doc("m1", DocumentKind::MessageChunk, None, vec![0.0, 1.0]);
        replacement.text = "rewritten".into();
        lake.upsert(&[replacement]).unwrap();

        assert_eq!(lake.count().unwrap(), 1);
        let hits = lake.search(&[0.0, 1.0], 5, &crate::VectorFilter::default()).unwrap();
        assert_eq!(hits[0].text, "rewritten");
    }

    #[test]
    fn empty_embeddings_are_skipped() {
        let lake = VectorLake::open_in_memory().unwrap();
        let written = lake
            .upsert(&[
                doc("m1", DocumentKind::MessageChunk, None, vec![]),
                doc("m2", DocumentKind::MessageChunk, None, vec![1.0, 1.0]),
            ])
            .unwrap();
        assert_eq!(written, 1);
    }

    #[test]
    fn delete_kind_and_chunks() {
        let lake = VectorLake::open_in_memory().unwrap();
        lake.upsert(&[
            doc("msg-1", DocumentKind::MessageChunk, None, vec![1.0, 0.0]),
            doc("msg-1#1", DocumentKind::MessageChunk, None, vec![1.0, 0.1]),
            doc("msg-2", DocumentKind::MessageChunk, None, vec![0.0, 1.0]),
            doc("decision_dec-1", DocumentKind::Decision, None, vec![0.5, 0.5]),
        ])
        .unwrap();

        assert_eq!(lake.delete_kind(DocumentKind::Decision).unwrap(), 1);
        assert_eq!(lake.count_kind(DocumentKind::Decision).unwrap(), 0);
        assert_eq!(lake.delete_with_chunks("msg-1").unwrap(), 2);
        assert_eq!(lake.count().unwrap(), 1);
    }
}
