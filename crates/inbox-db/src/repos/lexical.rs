//! BM25 lexical index over FTS5.
//!
//! The corpus is replaced wholesale on every `replace_lexical_index` call.
//! Scores are `-bm25()`, so they are non-negative and grow with relevance.

use inbox_core::enums::SenderType;

use crate::error::DatabaseError;
use crate::service::InboxService;

/// One document in the lexical corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct LexicalDocument {
    pub id: String,
    pub body: String,
    pub sender_type: Option<SenderType>,
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// One lexical match.
#[derive(Debug, Clone, PartialEq)]
pub struct LexicalHit {
    pub id: String,
    pub score: f64,
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// Turn free text into an FTS5 `OR` query of quoted terms.
///
/// Lowercases, strips everything but word characters and `-@.`, and drops
/// single-character tokens. Returns `None` when nothing searchable is left.
#[must_use]
pub fn fts_query(text: &str) -> Option<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            let keep =
                c.is_alphanumeric() || c.is_whitespace() || matches!(c, '_' | '-' | '@' | '.');
            if keep {
                c
            } else {
                ' '
            }
        })
        .collect();
    let terms: Vec<String> = cleaned
        .split_whitespace()
        .filter(|t| t.chars().count() > 1)
        .map(|t| format!("\"{t}\""))
        .collect();
    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" OR "))
    }
}

impl InboxService {
    /// Replace the lexical corpus. Returns the number of indexed documents.
    pub async fn replace_lexical_index(
        &self,
        documents: &[LexicalDocument],
    ) -> Result<usize, DatabaseError> {
        let _guard = self.writer().await;
        let tx = self.db().conn().transaction().await?;
        tx.execute("DELETE FROM lexical_fts", ()).await?;
        for doc in documents {
            tx.execute(
                "INSERT INTO lexical_fts (doc_id, sender_type, metadata, body) VALUES (?1, ?2, ?3, ?4)",
                libsql::params![
                    doc.id.as_str(),
                    doc.sender_type.map(SenderType::as_str),
                    serde_json::to_string(&doc.metadata)?,
                    doc.body.as_str()
                ],
            )
            .await?;
        }
        tx.commit().await?;
        tracing::debug!(documents = documents.len(), "replaced lexical index");
        Ok(documents.len())
    }

    /// Top `k` documents for `query`, optionally restricted to one sender type.
    pub async fn search_lexical(
        &self,
        query: &str,
        k: usize,
        sender_type: Option<SenderType>,
    ) -> Result<Vec<LexicalHit>, DatabaseError> {
        let Some(match_expr) = fts_query(query) else {
            return Ok(Vec::new());
        };
        let limit = i64::try_from(k).unwrap_or(i64::MAX);
        let conn = self.db().conn();
        let mut rows = match sender_type {
            Some(st) => {
                conn.query(
                    "SELECT doc_id, -bm25(lexical_fts), metadata FROM lexical_fts
                     WHERE lexical_fts MATCH ?1 AND sender_type = ?2
                     ORDER BY rank LIMIT ?3",
                    libsql::params![match_expr, st.as_str(), limit],
                )
                .await?
            }
            None => {
                conn.query(
                    "SELECT doc_id, -bm25(lexical_fts), metadata FROM lexical_fts
                     WHERE lexical_fts MATCH ?1
                     ORDER BY rank LIMIT ?2",
                    libsql::params![match_expr, limit],
                )
                .await?
            }
        };

        let mut hits = Vec::new();
        while let Some(row) = rows.next().await? {
            hits.push(LexicalHit {
                id: row.get::<String>(0)?,
                score: row.get::<f64>(1)?.max(0.0),
                metadata: serde_json::from_str(&row.get::<String>(2)?)?,
            });
        }
        Ok(hits)
    }

    pub async fn count_lexical_documents(&self) -> Result<u64, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query("SELECT COUNT(*) FROM lexical_fts", ())
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(u64::try_from(row.get::<i64>(0)?).unwrap_or(0))
    }
}
