//! In-memory retrieval candidates.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::CandidateSource;

/// Metadata key carrying the decision id on graph candidates.
pub const META_DECISION_ID: &str = "decision_id";
/// Metadata key carrying the message id on every candidate that has one.
pub const META_MESSAGE_ID: &str = "message_id";

/// One scored context item produced by a candidate source.
///
/// `score` is the source's native score and is not comparable across sources.
/// `rerank_score` and `fused_score` are set by the orchestrator depending on
/// the fusion mode.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CandidateResult {
    pub id: String,
    pub text: String,
    pub score: f64,
    pub source: CandidateSource,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rerank_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fused_score: Option<f64>,
}

impl CandidateResult {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        score: f64,
        source: CandidateSource,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            score,
            source,
            metadata: serde_json::Map::new(),
            rerank_score: None,
            fused_score: None,
        }
    }

    #[must_use]
    pub fn with_meta(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    /// String metadata value, if present.
    #[must_use]
    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(serde_json::Value::as_str)
    }

    /// Decision back-reference carried by graph candidates.
    #[must_use]
    pub fn decision_id(&self) -> Option<&str> {
        self.meta_str(META_DECISION_ID)
    }

    /// Score the final ordering was decided on.
    #[must_use]
    pub fn ranking_score(&self) -> f64 {
        self.rerank_score.or(self.fused_score).unwrap_or(self.score)
    }
}
