//! Lake error types.

/// Errors from the vector index.
#[derive(Debug, thiserror::Error)]
pub enum LakeError {
    /// `DuckDB` operation failed.
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    /// Metadata column could not be encoded or decoded.
    #[error("Metadata error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Query vector is empty or does not match the stored dimension.
    #[error("Bad vector dimension: {0}")]
    Dimension(String),

    /// Catch-all for other errors.
    #[error("{0}")]
    Other(String),
}
