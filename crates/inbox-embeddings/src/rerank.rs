//! Cross-encoder reranking.

use std::path::Path;

use fastembed::{RerankInitOptions, RerankerModel, TextRerank};

use crate::EmbeddingError;

/// `BGERerankerBase` cross-encoder. Scores are raw logits: only their order
/// within one call is meaningful.
pub struct RerankEngine {
    model: TextRerank,
}

impl RerankEngine {
    /// # Errors
    ///
    /// Returns [`EmbeddingError::InitFailed`] if download or ONNX setup fails.
    pub fn new(cache_dir: &Path) -> Result<Self, EmbeddingError> {
        let model = TextRerank::try_new(
            RerankInitOptions::new(RerankerModel::BGERerankerBase)
                .with_cache_dir(cache_dir.to_path_buf())
                .with_show_download_progress(false),
        )
        .map_err(|e| EmbeddingError::InitFailed(e.to_string()))?;
        tracing::debug!(cache_dir = %cache_dir.display(), "rerank model loaded");
        Ok(Self { model })
    }

    /// Relevance of each passage to `query`, in passage order.
    ///
    /// # Errors
    ///
    /// Returns [`EmbeddingError::RerankFailed`] if inference fails, or
    /// [`EmbeddingError::EmptyResult`] if a passage comes back unscored.
    pub fn score(&mut self, query: &str, passages: &[String]) -> Result<Vec<f32>, EmbeddingError> {
        if passages.is_empty() {
            return Ok(Vec::new());
        }
        let documents: Vec<&str> = passages.iter().map(String::as_str).collect();
        let results = self
            .model
            .rerank(query, documents, false, None)
            .map_err(|e| EmbeddingError::RerankFailed(e.to_string()))?;
        scores_in_input_order(passages.len(), results.iter().map(|r| (r.index, r.score)))
    }
}

/// fastembed returns results sorted by score; put them back by input index.
fn scores_in_input_order(
    len: usize,
    results: impl Iterator<Item = (usize, f32)>,
) -> Result<Vec<f32>, EmbeddingError> {
    let mut scores = vec![None; len];
    for (index, score) in results {
        if let Some(slot) = scores.get_mut(index) {
            *slot = Some(score);
        }
    }
    scores
        .into_iter()
        .map(|s| s.ok_or(EmbeddingError::EmptyResult))
        .collect()
}
