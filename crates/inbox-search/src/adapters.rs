//! Capability implementations over the concrete stores and models.

use std::sync::Arc;

use async_trait::async_trait;
use inbox_core::entities::{Decision, Message};
use inbox_core::enums::SenderType;
use inbox_db::repos::lexical::{LexicalDocument, LexicalHit};
use inbox_db::service::InboxService;
use inbox_embeddings::{SharedEmbedder, SharedReranker};
use inbox_lake::{DocumentKind, VectorDocument, VectorFilter, VectorHit, VectorLake};

use crate::SearchError;
use crate::capability::{Embedder, InboxStore, LexicalIndex, Reranker, VectorIndex};

#[async_trait]
impl InboxStore for InboxService {
    async fn message(&self, id: &str) -> Result<Message, SearchError> {
        Ok(self.get_message(id).await?)
    }

    async fn messages_by_ids(&self, ids: &[String]) -> Result<Vec<Message>, SearchError> {
        Ok(self.get_messages_by_ids(ids).await?)
    }

    async fn decisions_by_ids(&self, ids: &[String]) -> Result<Vec<Decision>, SearchError> {
        Ok(self.get_decisions_by_ids(ids).await?)
    }

    async fn recent_precedents(
        &self,
        sender_type: SenderType,
        limit: usize,
    ) -> Result<Vec<(Decision, Message)>, SearchError> {
        Ok(Self::recent_precedents(self, sender_type, limit).await?)
    }
}

#[async_trait]
impl LexicalIndex for InboxService {
    async fn search(
        &self,
        query: &str,
        k: usize,
        sender_type: Option<SenderType>,
    ) -> Result<Vec<LexicalHit>, SearchError> {
        Ok(self.search_lexical(query, k, sender_type).await?)
    }

    async fn index(&self, documents: Vec<LexicalDocument>) -> Result<usize, SearchError> {
        Ok(self.replace_lexical_index(&documents).await?)
    }
}

/// [`VectorLake`] on the blocking pool. `DuckDB` calls are synchronous.
#[derive(Clone)]
pub struct LakeIndex {
    lake: Arc<VectorLake>,
}

impl LakeIndex {
    #[must_use]
    pub const fn new(lake: Arc<VectorLake>) -> Self {
        Self { lake }
    }

    async fn blocking<R, F>(&self, f: F) -> Result<R, SearchError>
    where
        R: Send + 'static,
        F: FnOnce(&VectorLake) -> Result<R, inbox_lake::LakeError> + Send + 'static,
    {
        let lake = Arc::clone(&self.lake);
        tokio::task::spawn_blocking(move || f(&lake))
            .await
            .map_err(|e| SearchError::Capability(format!("vector task failed: {e}")))?
            .map_err(SearchError::from)
    }
}

#[async_trait]
impl VectorIndex for LakeIndex {
    async fn search(
        &self,
        query: Vec<f32>,
        k: usize,
        filter: VectorFilter,
    ) -> Result<Vec<VectorHit>, SearchError> {
        self.blocking(move |lake| lake.search(&query, k, &filter)).await
    }

    async fn upsert(&self, documents: Vec<VectorDocument>) -> Result<usize, SearchError> {
        self.blocking(move |lake| lake.upsert(&documents)).await
    }

    async fn delete_kind(&self, kind: DocumentKind) -> Result<usize, SearchError> {
        self.blocking(move |lake| lake.delete_kind(kind)).await
    }
}

#[async_trait]
impl Embedder for SharedEmbedder {
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, SearchError> {
        Ok(Self::embed(self, texts).await?)
    }
}

#[async_trait]
impl Reranker for SharedReranker {
    async fn score(&self, query: &str, passages: Vec<String>) -> Result<Vec<f64>, SearchError> {
        let scores = Self::score(self, query, passages).await?;
        Ok(scores.into_iter().map(f64::from).collect())
    }
}
