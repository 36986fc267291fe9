//! Retrieval and fusion settings.

use inbox_core::enums::FusionMode;
use serde::{Deserialize, Serialize};

const fn default_top_k() -> usize {
    5
}

const fn default_rrf_k() -> u32 {
    60
}

const fn default_true() -> bool {
    true
}

const fn default_source_timeout_ms() -> u64 {
    5_000
}

const fn default_precedent_limit() -> usize {
    5
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetrievalConfig {
    /// Candidates returned per retrieval.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Smoothing constant for Reciprocal Rank Fusion.
    #[serde(default = "default_rrf_k")]
    pub rrf_k: u32,

    #[serde(default)]
    pub fusion: FusionMode,

    #[serde(default = "default_true")]
    pub vector: bool,

    #[serde(default = "default_true")]
    pub keyword: bool,

    #[serde(default = "default_true")]
    pub graph: bool,

    /// Upper bound on any single candidate-source call.
    #[serde(default = "default_source_timeout_ms")]
    pub source_timeout_ms: u64,

    /// Maximum precedents resolved per suggestion.
    #[serde(default = "default_precedent_limit")]
    pub precedent_limit: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            rrf_k: default_rrf_k(),
            fusion: FusionMode::default(),
            vector: true,
            keyword: true,
            graph: true,
            source_timeout_ms: default_source_timeout_ms(),
            precedent_limit: default_precedent_limit(),
        }
    }
}
