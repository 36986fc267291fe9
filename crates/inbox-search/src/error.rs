//! Search error types for inbox-search.

/// Errors from candidate sources, indexing, and capability adapters.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Error from the libSQL store (messages, decisions, FTS5).
    #[error("database error: {0}")]
    Database(#[from] inbox_db::error::DatabaseError),

    /// Error from the `DuckDB` vector index.
    #[error("lake error: {0}")]
    Lake(#[from] inbox_lake::LakeError),

    /// Error from the embedding or rerank model.
    #[error("embedding error: {0}")]
    Embedding(#[from] inbox_embeddings::EmbeddingError),

    /// A capability call exceeded its deadline.
    #[error("{what} timed out after {ms} ms")]
    Timeout { what: &'static str, ms: u64 },

    /// A capability answered with something unusable.
    #[error("capability error: {0}")]
    Capability(String),
}

impl SearchError {
    /// Whether this wraps a missing primary entity.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Database(e) if e.is_not_found())
    }
}
