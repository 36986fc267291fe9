//! The three candidate sources.
//!
//! Native scores are not comparable across sources: vector similarity in
//! `[0, 1]`, BM25 divided by 100, and a fixed precedent weight.

use inbox_core::candidate::{CandidateResult, META_DECISION_ID, META_MESSAGE_ID};
use inbox_core::enums::{CandidateSource, SenderType};
use inbox_lake::VectorFilter;

use crate::SearchError;
use crate::capability::{Embedder, InboxStore, LexicalIndex, VectorIndex};

/// Fixed relevance of a precedent candidate.
pub const PRECEDENT_SCORE: f64 = 0.8;

const BM25_SCALE: f64 = 100.0;

/// Semantic search over message chunks and decision documents.
///
/// # Errors
///
/// Returns the embedder or index error.
pub async fn vector_candidates(
    embedder: &dyn Embedder,
    index: &dyn VectorIndex,
    query: &str,
    sender_type: Option<SenderType>,
    k: usize,
) -> Result<Vec<CandidateResult>, SearchError> {
    let query_vec = embedder
        .embed(vec![query.to_string()])
        .await?
        .pop()
        .ok_or_else(|| SearchError::Capability("embedder returned no vector".into()))?;
    let hits = index.search(query_vec, k, VectorFilter::sender(sender_type)).await?;

    Ok(hits
        .into_iter()
        .map(|hit| CandidateResult {
            score: (1.0 - hit.distance).clamp(0.0, 1.0),
            metadata: hit.metadata,
            ..CandidateResult::new(hit.id, hit.text, 0.0, CandidateSource::Vector)
        })
        .collect())
}

/// BM25 search. Hits whose message no longer exists are dropped.
///
/// # Errors
///
/// Returns the lexical index or store error.
pub async fn keyword_candidates(
    lexical: &dyn LexicalIndex,
    store: &dyn InboxStore,
    query: &str,
    sender_type: Option<SenderType>,
    k: usize,
) -> Result<Vec<CandidateResult>, SearchError> {
    let hits = lexical.search(query, k, sender_type).await?;
    if hits.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<String> = hits.iter().map(|h| h.id.clone()).collect();
    let messages = store.messages_by_ids(&ids).await?;

    let mut candidates = Vec::with_capacity(hits.len());
    for hit in hits {
        let Some(message) = messages.iter().find(|m| m.id == hit.id) else {
            tracing::debug!(id = %hit.id, "lexical hit without a stored message, dropping");
            continue;
        };
        let mut candidate = CandidateResult::new(
            hit.id,
            message.lexical_text(),
            hit.score / BM25_SCALE,
            CandidateSource::Keyword,
        );
        candidate.metadata = hit.metadata;
        candidates.push(candidate);
    }
    Ok(candidates)
}

/// The most recent decisions on messages from the same sender type.
///
/// # Errors
///
/// Returns the store error.
pub async fn graph_candidates(
    store: &dyn InboxStore,
    sender_type: SenderType,
    k: usize,
) -> Result<Vec<CandidateResult>, SearchError> {
    let pairs = store.recent_precedents(sender_type, k).await?;
    Ok(pairs
        .into_iter()
        .map(|(decision, message)| {
            let text = format!(
                "Previous decision: {}\nMessage: {}",
                decision.human_action.action, message.content
            );
            CandidateResult::new(decision.id.clone(), text, PRECEDENT_SCORE, CandidateSource::Graph)
                .with_meta(META_DECISION_ID, decision.id.as_str())
                .with_meta(META_MESSAGE_ID, message.id.as_str())
                .with_meta("sender_type", sender_type.as_str())
                .with_meta("action", decision.human_action.action.as_str())
                .with_meta("tone", decision.human_action.tone.as_str())
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeEmbedder, MemoryVectors, seeded_store};
    use inbox_core::enums::{Action, Tone};
    use inbox_lake::{DocumentKind, VectorDocument};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn vector_scores_are_similarities() {
        let embedder = FakeEmbedder;
        let vectors = MemoryVectors::default();
        let embedding = embedder.embed(vec!["growth metrics".into()]).await.unwrap().remove(0);
        vectors
            .upsert(vec![VectorDocument {
                id: "msg-1".into(),
                kind: DocumentKind::MessageChunk,
                sender_type: Some(SenderType::Investor),
                text: "growth metrics".into(),
                metadata: serde_json::Map::new(),
                embedding,
            }])
            .await
            .unwrap();

        let found = vector_candidates(&embedder, &vectors, "growth metrics", None, 4)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].source, CandidateSource::Vector);
        assert!((found[0].score - 1.0).abs() < 1e-6);

        let filtered = vector_candidates(&embedder, &vectors, "growth", Some(SenderType::Sales), 4)
            .await
            .unwrap();
        assert!(filtered.is_empty());
    }

    #[tokio::test]
    async fn keyword_candidates_carry_message_text() {
        let (svc, messages) = seeded_store().await;
        let found = keyword_candidates(svc.as_ref(), svc.as_ref(), "webinar", None, 10)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, messages[2].id);
        assert!(found[0].text.starts_with("From: "));
        assert!(found[0].score > 0.0);
    }

    #[tokio::test]
    async fn graph_candidates_reference_decisions() {
        let (svc, messages) = seeded_store().await;
        let decision =
            crate::test_support::decide(&svc, &messages[0], Action::ReplyNow, Tone::Warm).await;

        let found = graph_candidates(svc.as_ref(), SenderType::Investor, 5).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, decision.id);
        assert_eq!(found[0].decision_id(), Some(decision.id.as_str()));
        assert_eq!(found[0].meta_str("action"), Some("reply_now"));
        assert!((found[0].score - PRECEDENT_SCORE).abs() < f64::EPSILON);
        assert!(found[0].text.starts_with("Previous decision: reply_now\nMessage: "));

        assert!(graph_candidates(svc.as_ref(), SenderType::Sales, 5).await.unwrap().is_empty());
    }
}
