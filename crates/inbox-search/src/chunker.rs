//! Word-window chunking of messages for the vector index.
//!
//! Each message is rendered with a sender header, split on whitespace, and
//! cut into windows of `chunk_size` words that overlap by `overlap` words.
//! Short messages stay whole.

use inbox_core::candidate::META_MESSAGE_ID;
use inbox_core::entities::Message;
use inbox_core::ids::chunk_document_id;

pub const DEFAULT_CHUNK_SIZE: usize = 500;
pub const DEFAULT_OVERLAP: usize = 50;

/// One piece of a message, ready to embed.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageChunk {
    pub id: String,
    pub text: String,
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    chunk_size: usize,
    overlap: usize,
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, DEFAULT_OVERLAP)
    }
}

impl Chunker {
    /// `overlap` is clamped below `chunk_size` so windows always advance.
    #[must_use]
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            overlap: overlap.min(chunk_size - 1),
        }
    }

    /// Header plus body: `From: {name} ({type})`, optional `Subject:`, then `Message:`.
    #[must_use]
    pub fn render(message: &Message) -> String {
        let mut text = format!("From: {} ({})\n", message.sender_name, message.sender_type);
        if let Some(subject) = message.subject.as_deref().filter(|s| !s.is_empty()) {
            text.push_str("Subject: ");
            text.push_str(subject);
            text.push('\n');
        }
        text.push_str("Message: ");
        text.push_str(&message.content);
        text
    }

    #[must_use]
    pub fn chunk(&self, message: &Message) -> Vec<MessageChunk> {
        let full = Self::render(message);
        let words: Vec<&str> = full.split_whitespace().collect();
        if words.len() <= self.chunk_size {
            return vec![self.make_chunk(message, 0, full, 1)];
        }

        let step = self.chunk_size - self.overlap;
        let windows: Vec<String> = (0..words.len())
            .step_by(step)
            .map(|start| {
                let end = (start + self.chunk_size).min(words.len());
                words[start..end].join(" ")
            })
            .collect();
        let total = windows.len();
        windows
            .into_iter()
            .enumerate()
            .map(|(index, text)| self.make_chunk(message, index, text, total))
            .collect()
    }

    #[allow(clippy::unused_self)]
    fn make_chunk(
        &self,
        message: &Message,
        index: usize,
        text: String,
        total: usize,
    ) -> MessageChunk {
        let mut metadata = serde_json::Map::new();
        metadata.insert(META_MESSAGE_ID.into(), message.id.clone().into());
        metadata.insert("sender_name".into(), message.sender_name.clone().into());
        metadata.insert("sender_type".into(), message.sender_type.as_str().into());
        metadata.insert("channel".into(), message.channel.clone().into());
        if let Some(subject) = &message.subject {
            metadata.insert("subject".into(), subject.clone().into());
        }
        metadata.insert("chunk_index".into(), index.into());
        metadata.insert("total_chunks".into(), total.into());
        MessageChunk {
            id: chunk_document_id(&message.id, index),
            text,
            metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use inbox_core::enums::SenderType;
    use pretty_assertions::assert_eq;

    fn message(words: usize, subject: Option<&str>) -> Message {
        Message {
            id: "msg-0001".into(),
            sender_name: "Dana".into(),
            sender_type: SenderType::Support,
            channel: "email".into(),
            subject: subject.map(str::to_string),
            content: (0..words).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" "),
            created_at: Utc::now(),
            embedding: None,
        }
    }

    #[test]
    fn short_message_is_one_chunk_with_header() {
        let chunks = Chunker::default().chunk(&message(3, Some("Export bug")));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].id, "msg-0001");
        assert_eq!(
            chunks[0].text,
            "From: Dana (support)\nSubject: Export bug\nMessage: w0 w1 w2"
        );
        assert_eq!(chunks[0].metadata["total_chunks"], serde_json::json!(1));
        assert_eq!(chunks[0].metadata["subject"], serde_json::json!("Export bug"));
    }

    #[test]
    fn long_message_windows_overlap() {
        // 4 header words + 16 body words = 20 words; windows of 8 advancing by 6.
        let chunks = Chunker::new(8, 2).chunk(&message(16, None));
        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[1].id, "msg-0001#1");
        assert!(chunks[0].text.starts_with("From: Dana (support) Message: w0"));

        let first: Vec<&str> = chunks[0].text.split(' ').collect();
        let second: Vec<&str> = chunks[1].text.split(' ').collect();
        assert_eq!(&first[6..], &second[..2]);
        assert!(chunks.iter().all(|c| c.metadata["total_chunks"] == serde_json::json!(4)));
        assert_eq!(chunks[3].metadata["chunk_index"], serde_json::json!(3));
    }

    #[test]
    fn overlap_is_clamped() {
        let chunks = Chunker::new(3, 10).chunk(&message(5, None));
        assert!(chunks.len() > 1);
    }
}
