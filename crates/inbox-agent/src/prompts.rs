//! Prompt builders for the generative capability.

use std::fmt::Write as _;

use inbox_core::candidate::CandidateResult;
use inbox_core::entities::{Decision, Message};
use inbox_core::enums::{SenderType, Tone};
use inbox_core::suggestion::MessageAnalysis;

pub const DECISION_SYSTEM_PROMPT: &str = "You are an inbox triage assistant. \
You decide how the user should handle an incoming message, following the user's own past decisions \
whenever they apply. Answer only in the requested format.";

pub const DRAFT_SYSTEM_PROMPT: &str = "You are an AI email assistant helping draft professional replies.

Guidelines:
- Keep responses concise (under 100 words)
- Be natural and conversational
- Match the requested tone
- Reference past context when relevant
- End with a clear next step or call-to-action";

/// First `max` characters of `text`, on a char boundary.
#[must_use]
pub fn truncate(text: &str, max: usize) -> &str {
    text.char_indices()
        .nth(max)
        .map_or(text, |(idx, _)| &text[..idx])
}

#[must_use]
pub const fn sender_context(sender_type: SenderType) -> &'static str {
    match sender_type {
        SenderType::Investor => "Important stakeholder requiring timely, informative responses",
        SenderType::Sales => "Business inquiry requiring professional evaluation",
        SenderType::Support => "User needing helpful assistance and guidance",
        SenderType::Other => "General contact",
    }
}

/// One line per precedent: what the message said and what the user did.
///
/// `messages` pairs with `precedents` by `message_id`; a precedent whose
/// message is unknown is summarised without its content.
#[must_use]
pub fn precedent_summaries(precedents: &[Decision], messages: &[Message]) -> String {
    let mut out = String::new();
    for (i, decision) in precedents.iter().enumerate() {
        let content = messages
            .iter()
            .find(|m| m.id == decision.message_id)
            .map_or("(message unavailable)", |m| truncate(&m.content, 100));
        let _ = writeln!(
            out,
            "{}. Message: {content} -> Action: {}, Tone: {}",
            i + 1,
            decision.human_action.action,
            decision.human_action.tone
        );
    }
    out
}

/// Numbered retrieved context, each item tagged with its source.
#[must_use]
pub fn context_lines(context: &[CandidateResult], max_items: usize) -> String {
    let mut out = String::new();
    for (i, item) in context.iter().take(max_items).enumerate() {
        let _ = writeln!(out, "{}. [{}] {}", i + 1, item.source, truncate(&item.text, 200));
    }
    out
}

fn analysis_lines(analysis: &MessageAnalysis) -> String {
    let mut out = String::new();
    if let Some(intent) = analysis.intent {
        let _ = writeln!(out, "Intent: {intent}");
    }
    if !analysis.topics.is_empty() {
        let _ = writeln!(out, "Topics: {}", analysis.topics.join(", "));
    }
    if let Some(urgency) = analysis.urgency {
        let _ = writeln!(out, "Urgency: {urgency}");
    }
    if let Some(action) = &analysis.requires_action {
        let _ = writeln!(out, "Requires action: {action}");
    }
    out
}

/// Prompt for the model-assisted tier.
#[must_use]
pub fn decision_prompt(
    message: &Message,
    analysis: Option<&MessageAnalysis>,
    precedent_summary: &str,
    context: &[CandidateResult],
) -> String {
    let mut prompt = format!(
        "### Incoming message\nFrom: {} ({})\nSender context: {}\n",
        message.sender_name,
        message.sender_type,
        sender_context(message.sender_type)
    );
    if let Some(subject) = &message.subject {
        let _ = writeln!(prompt, "Subject: {subject}");
    }
    let _ = writeln!(prompt, "Message: {}", message.content);

    if let Some(analysis) = analysis.filter(|a| !a.is_empty()) {
        let _ = write!(prompt, "\n### Analysis\n{}", analysis_lines(analysis));
    }
    let _ = write!(
        prompt,
        "\n### How you handled similar messages\n{precedent_summary}"
    );
    if !context.is_empty() {
        let _ = write!(prompt, "\n### Related context\n{}", context_lines(context, 5));
    }
    prompt.push_str(
        "\n### Task\nChoose how to handle the incoming message.\n\
         Action must be one of: reply_now, reply_later, ignore.\n\
         Tone must be one of: warm, neutral, formal.\n\n\
         Respond exactly as:\n\
         Action: [action]\n\
         Tone: [tone]\n\
         Reasoning: [one sentence]",
    );
    prompt
}

/// Prompt for intent analysis.
#[must_use]
pub fn intent_prompt(content: &str) -> String {
    format!(
        "Analyze this message and extract key information:

Message:
{content}

Provide:
1. Primary Intent (question, request, update, urgent_request, casual_check_in, sales_pitch, newsletter)
2. Key Topics (comma-separated keywords)
3. Urgency Level (low, medium, high, critical)
4. Action Required (yes/no and what action)

Format your response as:
Intent: [intent]
Topics: [topics]
Urgency: [level]
Action: [yes/no - description]"
    )
}

/// User prompt for a reply draft. `context` is already formatted.
#[must_use]
pub fn draft_prompt(message: &Message, tone: Tone, context: &str) -> String {
    let mut prompt = format!(
        "### Incoming Message:\nFrom: {} ({})\nMessage: {}\n",
        message.sender_name, message.sender_type, message.content
    );
    if !context.is_empty() {
        let _ = write!(prompt, "\n### Past Context:\n{context}");
    }
    let _ = write!(
        prompt,
        "\n### Task:\nWrite a {tone} ({}) reply to {}. Consider the past context.\n\nDraft:",
        tone.description(),
        message.sender_name
    );
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use inbox_core::entities::{ActionTone, ContextUsed};
    use inbox_core::enums::{Action, CandidateSource};
    use pretty_assertions::assert_eq;

    fn message(id: &str, content: &str) -> Message {
        Message {
            id: id.into(),
            sender_name: "Sarah Chen".into(),
            sender_type: SenderType::Investor,
            channel: "email".into(),
            subject: Some("Q3".into()),
            content: content.into(),
            created_at: Utc::now(),
            embedding: None,
        }
    }

    fn decision(message_id: &str, action: Action, tone: Tone) -> Decision {
        Decision {
            id: format!("dec-{message_id}"),
            message_id: message_id.into(),
            agent_suggestion: ActionTone::new(action, tone),
            human_action: ActionTone::new(action, tone),
            context_used: ContextUsed {
                sender_type: SenderType::Investor,
                similar_decisions: vec![],
            },
            why: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("short", 100), "short");
    }

    #[test]
    fn summaries_pair_precedents_with_messages() {
        let summary = precedent_summaries(
            &[
                decision("m1", Action::ReplyNow, Tone::Warm),
                decision("gone", Action::Ignore, Tone::Formal),
            ],
            &[message("m1", "Share the deck?")],
        );
        assert_eq!(
            summary,
            "1. Message: Share the deck? -> Action: reply_now, Tone: warm\n\
             2. Message: (message unavailable) -> Action: ignore, Tone: formal\n"
        );
    }

    #[test]
    fn decision_prompt_carries_every_section() {
        let analysis = MessageAnalysis {
            urgency: Some(inbox_core::enums::Urgency::High),
            ..MessageAnalysis::default()
        };
        let context = vec![CandidateResult::new(
            "m9",
            "older thread",
            0.5,
            CandidateSource::Keyword,
        )];
        let prompt = decision_prompt(
            &message("m2", "Numbers please"),
            Some(&analysis),
            "1. Message: x -> Action: reply_now, Tone: warm\n",
            &context,
        );
        assert!(prompt.contains("From: Sarah Chen (investor)"));
        assert!(prompt.contains("Subject: Q3"));
        assert!(prompt.contains("Urgency: high"));
        assert!(prompt.contains("Action: reply_now, Tone: warm"));
        assert!(prompt.contains("1. [keyword] older thread"));
        assert!(prompt.ends_with("Reasoning: [one sentence]"));
    }

    #[test]
    fn draft_prompt_names_tone_and_recipient() {
        let prompt = draft_prompt(&message("m1", "hi"), Tone::Formal, "");
        assert!(
            prompt.contains("Write a formal (respectful, traditional, structured) reply to Sarah Chen")
        );
        assert!(!prompt.contains("Past Context"));
    }
}
