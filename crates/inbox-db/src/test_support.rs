//! Shared fixtures for store tests.

use inbox_core::entities::{ActionTone, ContextUsed, Decision, Message, NewDecision, NewMessage};
use inbox_core::enums::{Action, SenderType, Tone};

use crate::InboxDb;
use crate::service::InboxService;
use crate::trail::writer::TrailWriter;

pub async fn test_service() -> InboxService {
    let db = InboxDb::open_local(":memory:").await.unwrap();
    InboxService::from_db(db, TrailWriter::disabled())
}

pub async fn seed_message(svc: &InboxService, sender_type: SenderType, content: &str) -> Message {
    svc.create_message(&NewMessage {
        sender_name: "Test Sender".into(),
        sender_type,
        channel: "email".into(),
        subject: None,
        content: content.into(),
    })
    .await
    .unwrap()
}

pub fn new_decision(
    message: &Message,
    action: Action,
    tone: Tone,
    precedents: &[&str],
) -> NewDecision {
    NewDecision {
        message_id: message.id.clone(),
        agent_suggestion: ActionTone::new(Action::ReplyLater, Tone::Neutral),
        human_action: ActionTone::new(action, tone),
        context_used: ContextUsed {
            sender_type: message.sender_type,
            similar_decisions: precedents.iter().map(|p| (*p).to_string()).collect(),
        },
        why: format!("chose {action} / {tone}"),
    }
}

pub async fn seed_decision(
    svc: &InboxService,
    message: &Message,
    action: Action,
    tone: Tone,
) -> Decision {
    svc.record_decision(new_decision(message, action, tone, &[]))
        .await
        .unwrap()
}
