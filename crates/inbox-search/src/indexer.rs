//! Keeps the vector and lexical indexes in step with the store.

use std::sync::Arc;

use inbox_core::candidate::{META_DECISION_ID, META_MESSAGE_ID};
use inbox_core::entities::{Decision, Message};
use inbox_core::ids::decision_document_id;
use inbox_db::repos::lexical::LexicalDocument;
use inbox_lake::{DocumentKind, VectorDocument};

use crate::SearchError;
use crate::capability::{Capabilities, Embedder, LexicalIndex, VectorIndex};
use crate::chunker::{Chunker, MessageChunk};

const EMBED_BATCH: usize = 64;
const DECISION_EXCERPT_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub messages: usize,
    pub chunks_embedded: usize,
    pub lexical_documents: usize,
}

/// Lexical corpus for a set of messages: `From: {name}\n{content}`.
#[must_use]
pub fn lexical_documents(messages: &[Message]) -> Vec<LexicalDocument> {
    messages
        .iter()
        .map(|m| {
            let mut metadata = serde_json::Map::new();
            metadata.insert(META_MESSAGE_ID.into(), m.id.clone().into());
            metadata.insert("sender_name".into(), m.sender_name.clone().into());
            metadata.insert("sender_type".into(), m.sender_type.as_str().into());
            metadata.insert("channel".into(), m.channel.clone().into());
            LexicalDocument {
                id: m.id.clone(),
                body: m.lexical_text(),
                sender_type: Some(m.sender_type),
                metadata,
            }
        })
        .collect()
}

/// Text embedded for a recorded decision.
#[must_use]
pub fn decision_text(decision: &Decision, message: &Message) -> String {
    let excerpt: String = message.content.chars().take(DECISION_EXCERPT_CHARS).collect();
    format!(
        "Decision for {}: {} with {} tone. Message: {excerpt}",
        message.sender_name, decision.human_action.action, decision.human_action.tone
    )
}

pub struct Indexer {
    lexical: Arc<dyn LexicalIndex>,
    embedder: Option<Arc<dyn Embedder>>,
    vectors: Option<Arc<dyn VectorIndex>>,
    chunker: Chunker,
}

impl Indexer {
    #[must_use]
    pub fn new(caps: &Capabilities) -> Self {
        Self {
            lexical: Arc::clone(&caps.lexical),
            embedder: caps.embedder.clone(),
            vectors: caps.vectors.clone(),
            chunker: Chunker::default(),
        }
    }

    #[must_use]
    pub const fn with_chunker(mut self, chunker: Chunker) -> Self {
        self.chunker = chunker;
        self
    }

    fn semantic(&self) -> Option<(&dyn Embedder, &dyn VectorIndex)> {
        match (&self.embedder, &self.vectors) {
            (Some(e), Some(v)) => Some((e.as_ref(), v.as_ref())),
            _ => None,
        }
    }

    /// Replace the lexical corpus with `messages`.
    ///
    /// # Errors
    ///
    /// Returns the lexical index error.
    pub async fn rebuild_lexical(&self, messages: &[Message]) -> Result<usize, SearchError> {
        self.lexical.index(lexical_documents(messages)).await
    }

    /// Chunk, embed, and upsert `messages`, then rebuild the lexical corpus
    /// from the same set. Without an embedder only the lexical side runs.
    ///
    /// A message's stored embedding is reused when it fits in one chunk.
    ///
    /// # Errors
    ///
    /// Returns the first embedder or index error.
    pub async fn index_messages(&self, messages: &[Message]) -> Result<IndexStats, SearchError> {
        let mut stats = IndexStats {
            messages: messages.len(),
            ..IndexStats::default()
        };

        if let Some((embedder, vectors)) = self.semantic() {
            let mut ready: Vec<VectorDocument> = Vec::new();
            let mut pending: Vec<(MessageChunk, &Message)> = Vec::new();
            for message in messages {
                let chunks = self.chunker.chunk(message);
                let single = chunks.len() == 1;
                for chunk in chunks {
                    match message.embedding.as_ref().filter(|_| single) {
                        Some(embedding) => {
                            ready.push(chunk_document(chunk, message, embedding.clone()));
                        }
                        None => pending.push((chunk, message)),
                    }
                }
            }

            for batch in pending.chunks(EMBED_BATCH) {
                let texts: Vec<String> = batch.iter().map(|(c, _)| c.text.clone()).collect();
                let embeddings = embedder.embed(texts).await?;
                if embeddings.len() != batch.len() {
                    return Err(SearchError::Capability(format!(
                        "embedder returned {} vectors for {} chunks",
                        embeddings.len(),
                        batch.len()
                    )));
                }
                for ((chunk, message), embedding) in batch.iter().zip(embeddings) {
                    ready.push(chunk_document(chunk.clone(), message, embedding));
                }
            }
            stats.chunks_embedded = vectors.upsert(ready).await?;
        } else {
            tracing::debug!("semantic indexing not configured, skipping vectors");
        }

        stats.lexical_documents = self.rebuild_lexical(messages).await?;
        tracing::info!(
            messages = stats.messages,
            chunks = stats.chunks_embedded,
            lexical = stats.lexical_documents,
            "indexed messages"
        );
        Ok(stats)
    }

    /// Embed one recorded decision as `decision_{id}`. Returns `false` when
    /// semantic indexing is not configured.
    ///
    /// # Errors
    ///
    /// Returns the embedder or index error.
    pub async fn index_decision(
        &self,
        decision: &Decision,
        message: &Message,
    ) -> Result<bool, SearchError> {
        let Some((embedder, vectors)) = self.semantic() else {
            return Ok(false);
        };
        let text = decision_text(decision, message);
        let embedding = embedder
            .embed(vec![text.clone()])
            .await?
            .pop()
            .ok_or_else(|| SearchError::Capability("embedder returned no vector".into()))?;

        let mut metadata = serde_json::Map::new();
        metadata.insert(META_DECISION_ID.into(), decision.id.clone().into());
        metadata.insert(META_MESSAGE_ID.into(), message.id.clone().into());
        metadata.insert("sender_type".into(), message.sender_type.as_str().into());
        metadata.insert("action".into(), decision.human_action.action.as_str().into());
        metadata.insert("tone".into(), decision.human_action.tone.as_str().into());
        vectors
            .upsert(vec![VectorDocument {
                id: decision_document_id(&decision.id),
                kind: DocumentKind::Decision,
                sender_type: Some(message.sender_type),
                text,
                metadata,
                embedding,
            }])
            .await?;
        Ok(true)
    }

    /// Drop every decision document from the vector index.
    ///
    /// # Errors
    ///
    /// Returns the index error.
    pub async fn clear_decisions(&self) -> Result<usize, SearchError> {
        match &self.vectors {
            Some(vectors) => vectors.delete_kind(DocumentKind::Decision).await,
            None => Ok(0),
        }
    }
}

fn chunk_document(chunk: MessageChunk, message: &Message, embedding: Vec<f32>) -> VectorDocument {
    VectorDocument {
        id: chunk.id,
        kind: DocumentKind::MessageChunk,
        sender_type: Some(message.sender_type),
        text: chunk.text,
        metadata: chunk.metadata,
        embedding,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeEmbedder, MemoryVectors, decide, seeded_store};
    use inbox_core::entities::{ActionTone, ContextUsed};
    use inbox_core::enums::{Action, Tone};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn lexical_only_without_embedder() {
        let (svc, messages) = seeded_store().await;
        let caps = Capabilities::new(svc.clone(), svc.clone());
        let stats = Indexer::new(&caps).index_messages(&messages).await.unwrap();
        assert_eq!(stats.chunks_embedded, 0);
        assert_eq!(stats.lexical_documents, messages.len());
        assert_eq!(svc.count_lexical_documents().await.unwrap(), messages.len() as u64);
    }

    #[tokio::test]
    async fn messages_and_decisions_reach_the_vector_index() {
        let (svc, messages) = seeded_store().await;
        let vectors = Arc::new(MemoryVectors::default());
        let caps = Capabilities::new(svc.clone(), svc.clone())
            .with_vectors(Arc::new(FakeEmbedder), vectors.clone());
        let indexer = Indexer::new(&caps);

        let stats = indexer.index_messages(&messages).await.unwrap();
        assert_eq!(stats.chunks_embedded, messages.len());
        assert!(vectors.ids().contains(&messages[0].id));

        let decision = decide(&svc, &messages[0], Action::ReplyNow, Tone::Warm).await;
        assert!(indexer.index_decision(&decision, &messages[0]).await.unwrap());
        let doc_id = decision_document_id(&decision.id);
        assert!(vectors.ids().contains(&doc_id));

        assert_eq!(indexer.clear_decisions().await.unwrap(), 1);
        assert!(!vectors.ids().contains(&doc_id));
    }

    #[test]
    fn decision_text_truncates_message() {
        let long = "x".repeat(500);
        let message = Message {
            id: "msg-1".into(),
            sender_name: "Sarah Chen".into(),
            sender_type: inbox_core::enums::SenderType::Investor,
            channel: "email".into(),
            subject: None,
            content: long,
            created_at: chrono::Utc::now(),
            embedding: None,
        };
        let decision = Decision {
            id: "dec-1".into(),
            message_id: "msg-1".into(),
            agent_suggestion: ActionTone::new(Action::ReplyNow, Tone::Neutral),
            human_action: ActionTone::new(Action::ReplyLater, Tone::Formal),
            context_used: ContextUsed {
                sender_type: inbox_core::enums::SenderType::Investor,
                similar_decisions: vec![],
            },
            why: String::new(),
            created_at: chrono::Utc::now(),
        };
        let text = decision_text(&decision, &message);
        assert!(
            text.starts_with("Decision for Sarah Chen: reply_later with formal tone. Message: ")
        );
        assert_eq!(text.matches('x').count(), 200);
    }
}
