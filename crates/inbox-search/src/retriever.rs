//! The Fusion Orchestrator.
//!
//! Runs the enabled sources concurrently, each under its own deadline,
//! joins them, deduplicates in source priority order, then ranks with the
//! requested [`FusionMode`]. A failing source contributes nothing; a failing
//! reranker falls back to native ordering. `retrieve` never errors.

use std::future::Future;
use std::time::Duration;

use inbox_core::candidate::CandidateResult;
use inbox_core::enums::{CandidateSource, FusionMode, SenderType};

use crate::SearchError;
use crate::capability::Capabilities;
use crate::fusion::{dedup_first_seen, rank_by_scores, rank_native, rank_rrf};
use crate::sources::{graph_candidates, keyword_candidates, vector_candidates};

/// Which sources a retrieval may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceToggles {
    pub vector: bool,
    pub keyword: bool,
    pub graph: bool,
}

impl Default for SourceToggles {
    fn default() -> Self {
        Self {
            vector: true,
            keyword: true,
            graph: true,
        }
    }
}

/// One retrieval call.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalRequest {
    pub query: String,
    pub sender_type: Option<SenderType>,
    pub top_k: usize,
    pub sources: SourceToggles,
    pub fusion: FusionMode,
}

impl RetrievalRequest {
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            sender_type: None,
            top_k: 5,
            sources: SourceToggles::default(),
            fusion: FusionMode::default(),
        }
    }

    #[must_use]
    pub const fn sender_type(mut self, sender_type: Option<SenderType>) -> Self {
        self.sender_type = sender_type;
        self
    }

    #[must_use]
    pub const fn top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    #[must_use]
    pub const fn sources(mut self, sources: SourceToggles) -> Self {
        self.sources = sources;
        self
    }

    #[must_use]
    pub const fn fusion(mut self, fusion: FusionMode) -> Self {
        self.fusion = fusion;
        self
    }
}

/// Tuning that does not change per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrieverOptions {
    pub rrf_k: u32,
    /// Deadline for each source, and separately for the rerank call.
    pub source_timeout: Duration,
}

impl Default for RetrieverOptions {
    fn default() -> Self {
        Self {
            rrf_k: 60,
            source_timeout: Duration::from_secs(5),
        }
    }
}

pub struct HybridRetriever {
    caps: Capabilities,
    options: RetrieverOptions,
}

impl HybridRetriever {
    #[must_use]
    pub const fn new(caps: Capabilities, options: RetrieverOptions) -> Self {
        Self { caps, options }
    }

    #[must_use]
    pub const fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    pub async fn retrieve(&self, request: &RetrievalRequest) -> Vec<CandidateResult> {
        if request.top_k == 0 {
            return Vec::new();
        }
        let oversample = request.top_k.saturating_mul(2);
        let query = request.query.as_str();
        let sender_type = request.sender_type;

        let vector = async {
            if !request.sources.vector {
                return Vec::new();
            }
            let Some((embedder, index)) = self.caps.semantic() else {
                tracing::debug!("semantic search not configured, skipping vector source");
                return Vec::new();
            };
            self.guarded(
                CandidateSource::Vector,
                vector_candidates(embedder, index, query, sender_type, oversample),
            )
            .await
        };
        let keyword = async {
            if !request.sources.keyword {
                return Vec::new();
            }
            self.guarded(
                CandidateSource::Keyword,
                keyword_candidates(
                    self.caps.lexical.as_ref(),
                    self.caps.store.as_ref(),
                    query,
                    sender_type,
                    oversample,
                ),
            )
            .await
        };
        let graph = async {
            // Precedents are scoped by sender type; without one there is nothing to look up.
            let (true, Some(st)) = (request.sources.graph, sender_type) else {
                return Vec::new();
            };
            self.guarded(
                CandidateSource::Graph,
                graph_candidates(self.caps.store.as_ref(), st, request.top_k),
            )
            .await
        };

        let (vector, keyword, graph) = tokio::join!(vector, keyword, graph);
        tracing::debug!(
            vector = vector.len(),
            keyword = keyword.len(),
            graph = graph.len(),
            "candidate sources joined"
        );

        let per_source = [vector, keyword, graph];
        let deduped = dedup_first_seen(per_source.iter().flatten().cloned().collect());
        if deduped.is_empty() {
            return Vec::new();
        }

        match request.fusion {
            FusionMode::Native => rank_native(deduped, request.top_k),
            FusionMode::Rrf => rank_rrf(&per_source, deduped, self.options.rrf_k, request.top_k),
            FusionMode::Rerank => self.rerank(query, deduped, request.top_k).await,
        }
    }

    async fn rerank(
        &self,
        query: &str,
        candidates: Vec<CandidateResult>,
        top_k: usize,
    ) -> Vec<CandidateResult> {
        let Some(reranker) = self.caps.reranker.as_ref() else {
            tracing::debug!("no reranker configured, ranking by native score");
            return rank_native(candidates, top_k);
        };
        let texts: Vec<String> = candidates.iter().map(|c| c.text.clone()).collect();
        let scores =
            tokio::time::timeout(self.options.source_timeout, reranker.score(query, texts)).await;
        let scores = match scores {
            Ok(Ok(scores)) => scores,
            Ok(Err(error)) => {
                tracing::warn!(%error, "rerank failed, ranking by native score");
                return rank_native(candidates, top_k);
            }
            Err(_) => {
                tracing::warn!("rerank timed out, ranking by native score");
                return rank_native(candidates, top_k);
            }
        };
        let count = scores.len();
        match rank_by_scores(candidates.clone(), &scores, top_k) {
            Some(ranked) => ranked,
            None => {
                tracing::warn!(
                    expected = candidates.len(),
                    got = count,
                    "reranker score count mismatch, ranking by native score"
                );
                rank_native(candidates, top_k)
            }
        }
    }

    async fn guarded(
        &self,
        source: CandidateSource,
        fut: impl Future<Output = Result<Vec<CandidateResult>, SearchError>>,
    ) -> Vec<CandidateResult> {
        match tokio::time::timeout(self.options.source_timeout, fut).await {
            Ok(Ok(candidates)) => candidates,
            Ok(Err(error)) => {
                tracing::warn!(source = source.as_str(), %error, "candidate source failed");
                Vec::new()
            }
            Err(_) => {
                let timeout_ms =
                    u64::try_from(self.options.source_timeout.as_millis()).unwrap_or(u64::MAX);
                tracing::warn!(source = source.as_str(), timeout_ms, "candidate source timed out");
                Vec::new()
            }
        }
    }
}
