//! Optional reply drafting. Never affects the action or tone.

use std::time::Duration;

use inbox_core::candidate::CandidateResult;
use inbox_core::entities::{Decision, Message};
use inbox_core::enums::Tone;
use inbox_llm::{GenerateRequest, Generator};

use crate::prompts::{DRAFT_SYSTEM_PROMPT, draft_prompt, truncate};

/// Items of context handed to the drafting prompt.
pub const DRAFT_CONTEXT_ITEMS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DraftOptions {
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for DraftOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 150,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Past decisions first, then general retrieval hits, up to three lines.
#[must_use]
pub fn draft_context(
    precedents: &[Decision],
    precedent_messages: &[Message],
    candidates: &[CandidateResult],
) -> String {
    let from_precedents = precedents.iter().filter_map(|decision| {
        let message = precedent_messages
            .iter()
            .find(|m| m.id == decision.message_id)?;
        Some(format!(
            "[precedent] Past message: {}... -> Action: {}, Tone: {}",
            truncate(&message.content, 100),
            decision.human_action.action,
            decision.human_action.tone
        ))
    });
    let from_candidates = candidates
        .iter()
        .map(|c| format!("[{}] {}", c.source, truncate(&c.text, 200)));

    from_precedents
        .chain(from_candidates)
        .take(DRAFT_CONTEXT_ITEMS)
        .enumerate()
        .map(|(i, line)| format!("{}. {line}\n", i + 1))
        .collect()
}

/// Ask the generator for a reply draft. Any failure, including an empty
/// reply, yields `None`.
pub async fn generate_draft(
    generator: &dyn Generator,
    message: &Message,
    tone: Tone,
    context: &str,
    options: DraftOptions,
) -> Option<String> {
    let request = GenerateRequest::new(draft_prompt(message, tone, context))
        .system(DRAFT_SYSTEM_PROMPT)
        .temperature(options.temperature)
        .max_tokens(options.max_tokens);

    match tokio::time::timeout(options.timeout, generator.generate(request)).await {
        Ok(Ok(text)) => {
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        }
        Ok(Err(error)) => {
            tracing::warn!(generator = generator.id(), %error, "draft generation failed");
            None
        }
        Err(_) => {
            tracing::warn!(
                generator = generator.id(),
                timeout_ms = u64::try_from(options.timeout.as_millis()).unwrap_or(u64::MAX),
                "draft generation timed out"
            );
            None
        }
    }
}
