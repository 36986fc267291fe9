use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Action, SenderType, Tone};

/// An action paired with the tone to carry it out in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub struct ActionTone {
    pub action: Action,
    pub tone: Tone,
}

impl ActionTone {
    #[must_use]
    pub const fn new(action: Action, tone: Tone) -> Self {
        Self { action, tone }
    }
}

/// Retrieval context a decision was made under.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ContextUsed {
    pub sender_type: SenderType,
    /// Precedent decision ids, in the order they were shown.
    #[serde(default)]
    pub similar_decisions: Vec<String>,
}

/// One human action on a message. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Decision {
    pub id: String,
    pub message_id: String,
    pub agent_suggestion: ActionTone,
    pub human_action: ActionTone,
    pub context_used: ContextUsed,
    pub why: String,
    pub created_at: DateTime<Utc>,
}

impl Decision {
    /// Whether the human went against the engine's suggestion.
    #[must_use]
    pub fn is_override(&self) -> bool {
        self.agent_suggestion != self.human_action
    }
}

/// Input for recording a decision; the store assigns id and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewDecision {
    pub message_id: String,
    pub agent_suggestion: ActionTone,
    pub human_action: ActionTone,
    pub context_used: ContextUsed,
    pub why: String,
}

/// Directed link decision -> precedent decision.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PrecedentLink {
    pub decision_id: String,
    pub precedent_id: String,
}
