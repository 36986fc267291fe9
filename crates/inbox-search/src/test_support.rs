//! In-memory fakes and fixtures for unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use inbox_core::entities::{ActionTone, ContextUsed, Decision, Message, NewDecision, NewMessage};
use inbox_core::enums::{Action, SenderType, Tone};
use inbox_db::service::InboxService;
use inbox_lake::{DocumentKind, VectorDocument, VectorFilter, VectorHit};

use crate::SearchError;
use crate::capability::{Embedder, VectorIndex};
use crate::indexer::lexical_documents;

const FAKE_DIM: usize = 32;

/// Hashed bag-of-words vectors: texts sharing words point the same way.
pub struct FakeEmbedder;

pub fn fake_embedding(text: &str) -> Vec<f32> {
    let mut v = vec![0.0; FAKE_DIM];
    for token in text
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() > 2)
    {
        let hash = token
            .bytes()
            .fold(2_166_136_261_u32, |h, b| (h ^ u32::from(b)).wrapping_mul(16_777_619));
        v[hash as usize % FAKE_DIM] += 1.0;
    }
    v
}

#[async_trait]
impl Embedder for FakeEmbedder {
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, SearchError> {
        Ok(texts.iter().map(|t| fake_embedding(t)).collect())
    }
}

#[derive(Default)]
pub struct MemoryVectors {
    docs: Mutex<Vec<VectorDocument>>,
}

impl MemoryVectors {
    pub fn ids(&self) -> Vec<String> {
        self.docs.lock().unwrap().iter().map(|d| d.id.clone()).collect()
    }
}

#[async_trait]
impl VectorIndex for MemoryVectors {
    async fn search(
        &self,
        query: Vec<f32>,
        k: usize,
        filter: VectorFilter,
    ) -> Result<Vec<VectorHit>, SearchError> {
        let docs = self.docs.lock().unwrap();
        let mut hits: Vec<VectorHit> = docs
            .iter()
            .filter(|d| filter.sender_type.is_none_or(|st| d.sender_type == Some(st)))
            .filter(|d| filter.kind.is_none_or(|k| d.kind == k))
            .filter(|d| d.embedding.iter().any(|x| *x != 0.0))
            .map(|d| VectorHit {
                id: d.id.clone(),
                text: d.text.clone(),
                distance: 1.0
                    - f64::from(inbox_embeddings::cosine_similarity(&query, &d.embedding)),
                metadata: d.metadata.clone(),
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits.truncate(k);
        Ok(hits)
    }

    async fn upsert(&self, documents: Vec<VectorDocument>) -> Result<usize, SearchError> {
        let mut docs = self.docs.lock().unwrap();
        let n = documents.len();
        for doc in documents {
            docs.retain(|d| d.id != doc.id);
            docs.push(doc);
        }
        Ok(n)
    }

    async fn delete_kind(&self, kind: DocumentKind) -> Result<usize, SearchError> {
        let mut docs = self.docs.lock().unwrap();
        let before = docs.len();
        docs.retain(|d| d.kind != kind);
        Ok(before - docs.len())
    }
}

/// In-memory store with three messages (investor, support, sales) and a
/// lexical index over them.
pub async fn seeded_store() -> (Arc<InboxService>, Vec<Message>) {
    let svc = InboxService::new_local(":memory:", None).await.unwrap();
    let mut messages = Vec::new();
    for (name, sender_type, content) in [
        ("Sarah Chen", SenderType::Investor, "Can you share the latest growth metrics before the board meeting?"),
        ("Dana Park", SenderType::Support, "The export button is broken on the dashboard"),
        ("Mike Sales", SenderType::Sales, "Join our exclusive webinar on synergy, register now"),
    ] {
        messages.push(
            svc.create_message(&NewMessage {
                sender_name: name.into(),
                sender_type,
                channel: "email".into(),
                subject: None,
                content: content.into(),
            })
            .await
            .unwrap(),
        );
    }
    svc.replace_lexical_index(&lexical_documents(&messages)).await.unwrap();
    (Arc::new(svc), messages)
}

pub async fn decide(svc: &InboxService, message: &Message, action: Action, tone: Tone) -> Decision {
    svc.record_decision(NewDecision {
        message_id: message.id.clone(),
        agent_suggestion: ActionTone::new(Action::ReplyLater, Tone::Neutral),
        human_action: ActionTone::new(action, tone),
        context_used: ContextUsed {
            sender_type: message.sender_type,
            similar_decisions: vec![],
        },
        why: "test".into(),
    })
    .await
    .unwrap()
}
