//! Embedding error types.

/// Errors from the local embedding and rerank models.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    /// Model initialization failed (download, ONNX runtime, cache issues).
    #[error("Model initialization failed: {0}")]
    InitFailed(String),

    #[error("Embedding generation failed: {0}")]
    EmbedFailed(String),

    #[error("Rerank failed: {0}")]
    RerankFailed(String),

    /// Model returned fewer results than inputs.
    #[error("Empty result from model")]
    EmptyResult,

    /// The blocking model task panicked or was cancelled.
    #[error("Model task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// The call did not finish within its deadline.
    #[error("Model call timed out after {0} ms")]
    Timeout(u64),
}
