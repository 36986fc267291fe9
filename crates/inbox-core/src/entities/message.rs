use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::SenderType;

/// An inbound message. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Message {
    pub id: String,
    pub sender_name: String,
    pub sender_type: SenderType,
    pub channel: String,
    pub subject: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl Message {
    /// Query text used when retrieving context for this message.
    #[must_use]
    pub fn retrieval_query(&self) -> String {
        format!("{} {}", self.subject.as_deref().unwrap_or(""), self.content)
    }

    /// Text stored in the lexical index.
    #[must_use]
    pub fn lexical_text(&self) -> String {
        format!("From: {}\n{}", self.sender_name, self.content)
    }
}

/// Fields supplied by the ingestion boundary; the store assigns id and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewMessage {
    pub sender_name: String,
    pub sender_type: SenderType,
    pub channel: String,
    pub subject: Option<String>,
    pub content: String,
}
