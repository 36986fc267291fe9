//! ID prefixes and deterministic key helpers.
//!
//! Random IDs are generated by the database (`prefix-xxxxxxxx`). Graph keys
//! are deterministic so that the projection can be upserted idempotently.

pub const PREFIX_MESSAGE: &str = "msg";
pub const PREFIX_DECISION: &str = "dec";

/// Vector document id for a recorded decision.
#[must_use]
pub fn decision_document_id(decision_id: &str) -> String {
    format!("decision_{decision_id}")
}

/// Vector document id for one chunk of a message.
///
/// The first chunk reuses the message id so that semantic and lexical hits
/// for the same message collapse during deduplication.
#[must_use]
pub fn chunk_document_id(message_id: &str, chunk_index: usize) -> String {
    if chunk_index == 0 {
        message_id.to_string()
    } else {
        format!("{message_id}#{chunk_index}")
    }
}
