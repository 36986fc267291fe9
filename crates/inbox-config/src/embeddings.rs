//! Local embedding and rerank model settings.

use serde::{Deserialize, Serialize};

const fn default_true() -> bool {
    true
}

const fn default_timeout_ms() -> u64 {
    30_000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingsConfig {
    /// Load the local embedding model. When off, semantic search is skipped.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Load the cross-encoder reranker.
    #[serde(default = "default_true")]
    pub rerank: bool,

    /// Model cache directory. Defaults to `~/.inbox/cache/fastembed/`.
    #[serde(default)]
    pub cache_dir: Option<String>,

    /// Upper bound on one embed or rerank call, including first-use model load.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rerank: true,
            cache_dir: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}
