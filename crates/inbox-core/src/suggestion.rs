//! Decision engine output.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Action, Intent, SuggestionTier, Tone, Urgency};

/// Intent analysis of a single message.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MessageAnalysis {
    pub intent: Option<Intent>,
    #[serde(default)]
    pub topics: Vec<String>,
    pub urgency: Option<Urgency>,
    pub requires_action: Option<String>,
}

impl MessageAnalysis {
    /// Whether any field carried a recognized value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.intent.is_none()
            && self.urgency.is_none()
            && self.topics.is_empty()
            && self.requires_action.is_none()
    }
}

/// A suggested action and tone for one message, with its justification.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Suggestion {
    pub message_id: String,
    pub action: Action,
    pub tone: Tone,
    pub reasoning: String,
    pub tier: SuggestionTier,
    pub precedent_count: usize,
    /// Resolved precedent decision ids, most relevant first.
    pub similar_decisions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<MessageAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft_response: Option<String>,
}
