//! Intent analysis through the generative capability.

use std::time::Duration;

use inbox_core::suggestion::MessageAnalysis;
use inbox_llm::{GenerateRequest, Generator};

use crate::parse::parse_analysis;
use crate::prompts::intent_prompt;

const ANALYSIS_MAX_TOKENS: u32 = 100;

/// Ask for intent, topics, urgency and required action. Returns `None` on
/// any failure or when the reply carries nothing recognisable.
pub async fn analyze_message(
    generator: &dyn Generator,
    content: &str,
    temperature: f32,
    timeout: Duration,
) -> Option<MessageAnalysis> {
    let request = GenerateRequest::new(intent_prompt(content))
        .temperature(temperature)
        .max_tokens(ANALYSIS_MAX_TOKENS);
    let reply = match tokio::time::timeout(timeout, generator.generate(request)).await {
        Ok(Ok(reply)) => reply,
        Ok(Err(error)) => {
            tracing::warn!(generator = generator.id(), %error, "intent analysis failed");
            return None;
        }
        Err(_) => {
            tracing::warn!(generator = generator.id(), "intent analysis timed out");
            return None;
        }
    };
    let analysis = parse_analysis(&reply);
    if analysis.is_none() {
        tracing::debug!(generator = generator.id(), "intent analysis reply had no usable fields");
    }
    analysis
}

#[cfg(test)]
mod tests {
    use super::*;
    use inbox_core::enums::{Intent, Urgency};
    use inbox_llm::ScriptedGenerator;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn decodes_reply() {
        let generator =
            ScriptedGenerator::new().reply("Intent: question\nUrgency: low\nTopics: pricing");
        let analysis = analyze_message(&generator, "How much?", 0.3, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(analysis.intent, Some(Intent::Question));
        assert_eq!(analysis.urgency, Some(Urgency::Low));
        assert_eq!(generator.requests()[0].max_tokens, ANALYSIS_MAX_TOKENS);
    }

    #[tokio::test]
    async fn failure_is_no_analysis() {
        let generator = ScriptedGenerator::new().fail("connection refused");
        assert_eq!(
            analyze_message(&generator, "How much?", 0.3, Duration::from_secs(1)).await,
            None
        );
    }
}
