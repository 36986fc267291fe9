//! # inbox-embeddings
//!
//! Local models for retrieval, running on the fastembed ONNX runtime with no
//! API keys:
//!
//! - [`EmbeddingEngine`]: `AllMiniLML6V2`, 384-dimensional mean-pooled vectors.
//! - [`RerankEngine`]: `BGERerankerBase` cross-encoder, one relevance score per
//!   (query, passage) pair.
//!
//! Both engines are synchronous and take `&mut self`. Async callers go through
//! [`SharedEmbedder`] and [`SharedReranker`], which load the model on first use
//! and run inference on the blocking pool.

pub mod error;
pub mod rerank;
pub mod shared;

use std::path::{Path, PathBuf};

pub use error::EmbeddingError;
pub use rerank::RerankEngine;
pub use shared::{SharedEmbedder, SharedReranker};

use fastembed::{EmbeddingModel, TextEmbedding, TextInitOptions};

const DIMENSION: usize = 384;

/// `~/.inbox/cache/fastembed`, or `.fastembed_cache` without a home directory.
#[must_use]
pub fn default_cache_dir() -> PathBuf {
    dirs::home_dir().map_or_else(
        || PathBuf::from(".fastembed_cache"),
        |h| h.join(".inbox").join("cache").join("fastembed"),
    )
}

/// Sentence embedding model.
pub struct EmbeddingEngine {
    model: TextEmbedding,
}

impl EmbeddingEngine {
    /// Load `AllMiniLML6V2`, downloading it into `cache_dir` on first run.
    ///
    /// # Errors
    ///
    /// Returns [`EmbeddingError::InitFailed`] if download or ONNX setup fails.
    pub fn new(cache_dir: &Path) -> Result<Self, EmbeddingError> {
        let model = TextEmbedding::try_new(
            TextInitOptions::new(EmbeddingModel::AllMiniLML6V2)
                .with_cache_dir(cache_dir.to_path_buf())
                .with_show_download_progress(false),
        )
        .map_err(|e| EmbeddingError::InitFailed(e.to_string()))?;
        tracing::debug!(cache_dir = %cache_dir.display(), "embedding model loaded");
        Ok(Self { model })
    }

    /// One vector per input, in input order.
    ///
    /// Blank inputs get a zero vector without touching the model; the index
    /// skips zero-norm rows when scoring.
    ///
    /// # Errors
    ///
    /// Returns [`EmbeddingError::EmbedFailed`] if inference fails, or
    /// [`EmbeddingError::EmptyResult`] if the model drops inputs.
    pub fn embed_batch(&mut self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let live: Vec<&str> = texts
            .iter()
            .map(String::as_str)
            .filter(|t| !t.trim().is_empty())
            .collect();
        let mut embedded = if live.is_empty() {
            Vec::new()
        } else {
            self.model
                .embed(live, None)
                .map_err(|e| EmbeddingError::EmbedFailed(e.to_string()))?
        }
        .into_iter();

        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            if text.trim().is_empty() {
                out.push(vec![0.0; DIMENSION]);
            } else {
                out.push(embedded.next().ok_or(EmbeddingError::EmptyResult)?);
            }
        }
        Ok(out)
    }

    /// # Errors
    ///
    /// Same as [`Self::embed_batch`].
    pub fn embed_single(&mut self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embed_batch(&[text.to_string()])?
            .pop()
            .ok_or(EmbeddingError::EmptyResult)
    }

    /// Always 384 for `AllMiniLML6V2`.
    #[must_use]
    pub const fn dimension() -> usize {
        DIMENSION
    }
}

/// Cosine similarity; zero when either side has zero norm.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
