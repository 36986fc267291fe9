//! Recording a human decision and keeping the derived indexes current.

use inbox_core::entities::{Decision, NewDecision};
use inbox_db::service::InboxService;
use inbox_search::Indexer;

use crate::error::AgentError;

/// Persist `new` (with its graph projection and trail entry), then embed it
/// for the vector source. Indexing failures are logged; the decision stands.
///
/// # Errors
///
/// `NotFound` when the message does not exist, or the store error.
pub async fn record_decision(
    svc: &InboxService,
    indexer: &Indexer,
    new: NewDecision,
) -> Result<Decision, AgentError> {
    let message_id = new.message_id.clone();
    let decision = svc.record_decision(new).await.map_err(|e| {
        if e.is_not_found() {
            AgentError::NotFound {
                entity_type: "message".into(),
                id: message_id.clone(),
            }
        } else {
            AgentError::Database(e)
        }
    })?;

    let message = svc.get_message(&message_id).await?;
    match indexer.index_decision(&decision, &message).await {
        Ok(true) => tracing::debug!(decision = %decision.id, "indexed decision"),
        Ok(false) => {}
        Err(error) => {
            tracing::warn!(decision = %decision.id, %error, "failed to index decision");
        }
    }
    Ok(decision)
}
