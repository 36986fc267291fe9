//! Capability seams consumed by retrieval and the decision engine.
//!
//! Production implementations live in [`crate::adapters`]; tests substitute
//! in-memory fakes. Every handle is built once by the caller and passed in.

use std::sync::Arc;

use async_trait::async_trait;
use inbox_core::entities::{Decision, Message};
use inbox_core::enums::SenderType;
use inbox_db::repos::lexical::{LexicalDocument, LexicalHit};
use inbox_lake::{DocumentKind, VectorDocument, VectorFilter, VectorHit};

use crate::SearchError;

/// Text to fixed-length vector. Blank input yields a zero vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, SearchError>;
}

/// Nearest-neighbour index. `distance` is `1 - cosine`.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn search(
        &self,
        query: Vec<f32>,
        k: usize,
        filter: VectorFilter,
    ) -> Result<Vec<VectorHit>, SearchError>;

    async fn upsert(&self, documents: Vec<VectorDocument>) -> Result<usize, SearchError>;

    async fn delete_kind(&self, kind: DocumentKind) -> Result<usize, SearchError>;
}

/// BM25 index. Scores are non-negative; `index` replaces the whole corpus.
#[async_trait]
pub trait LexicalIndex: Send + Sync {
    async fn search(
        &self,
        query: &str,
        k: usize,
        sender_type: Option<SenderType>,
    ) -> Result<Vec<LexicalHit>, SearchError>;

    async fn index(&self, documents: Vec<LexicalDocument>) -> Result<usize, SearchError>;
}

/// Cross-encoder: one score per passage, same order, higher is better.
#[async_trait]
pub trait Reranker: Send + Sync {
    async fn score(&self, query: &str, passages: Vec<String>) -> Result<Vec<f64>, SearchError>;
}

/// Read access to messages and decisions.
#[async_trait]
pub trait InboxStore: Send + Sync {
    /// One message; a missing id is a not-found error.
    async fn message(&self, id: &str) -> Result<Message, SearchError>;

    /// Bulk lookup in request order; unknown ids are dropped.
    async fn messages_by_ids(&self, ids: &[String]) -> Result<Vec<Message>, SearchError>;

    /// Bulk lookup in request order; unknown ids are dropped.
    async fn decisions_by_ids(&self, ids: &[String]) -> Result<Vec<Decision>, SearchError>;

    /// Newest decisions on messages from `sender_type`, with their message.
    async fn recent_precedents(
        &self,
        sender_type: SenderType,
        limit: usize,
    ) -> Result<Vec<(Decision, Message)>, SearchError>;
}

/// The handles a retriever works with. Optional ones may be absent when the
/// corresponding model is disabled.
#[derive(Clone)]
pub struct Capabilities {
    pub store: Arc<dyn InboxStore>,
    pub lexical: Arc<dyn LexicalIndex>,
    pub embedder: Option<Arc<dyn Embedder>>,
    pub vectors: Option<Arc<dyn VectorIndex>>,
    pub reranker: Option<Arc<dyn Reranker>>,
}

impl Capabilities {
    /// Store and lexical index only; semantic search and reranking are off.
    #[must_use]
    pub fn new(store: Arc<dyn InboxStore>, lexical: Arc<dyn LexicalIndex>) -> Self {
        Self {
            store,
            lexical,
            embedder: None,
            vectors: None,
            reranker: None,
        }
    }

    #[must_use]
    pub fn with_vectors(
        mut self,
        embedder: Arc<dyn Embedder>,
        vectors: Arc<dyn VectorIndex>,
    ) -> Self {
        self.embedder = Some(embedder);
        self.vectors = Some(vectors);
        self
    }

    #[must_use]
    pub fn with_reranker(mut self, reranker: Arc<dyn Reranker>) -> Self {
        self.reranker = Some(reranker);
        self
    }

    /// Embedder and vector index, when both are present.
    #[must_use]
    pub fn semantic(&self) -> Option<(&dyn Embedder, &dyn VectorIndex)> {
        match (&self.embedder, &self.vectors) {
            (Some(e), Some(v)) => Some((e.as_ref(), v.as_ref())),
            _ => None,
        }
    }
}
