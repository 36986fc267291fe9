//! The Decision Engine.
//!
//! Three tiers, tried in order for every suggestion:
//!
//! 1. model-assisted, when a generator is available and precedents exist;
//! 2. precedent vote, when precedents exist;
//! 3. the heuristic table.
//!
//! A tier that cannot produce a valid action and tone hands over to the
//! next one. Only a missing message is an error.

use std::sync::Arc;
use std::time::Duration;

use inbox_core::candidate::CandidateResult;
use inbox_core::entities::{ActionTone, Decision, Message};
use inbox_core::enums::{FusionMode, SuggestionTier};
use inbox_core::suggestion::{MessageAnalysis, Suggestion};
use inbox_llm::{GenerateRequest, Generator};
use inbox_search::{
    HybridRetriever, InboxStore, MAX_PRECEDENTS, RetrievalRequest, SourceToggles,
    resolve_precedents,
};

use crate::analysis::analyze_message;
use crate::draft::{DraftOptions, draft_context, generate_draft};
use crate::error::AgentError;
use crate::heuristic::heuristic_decision;
use crate::parse::parse_decision;
use crate::prompts::{DECISION_SYSTEM_PROMPT, decision_prompt, precedent_summaries};
use crate::vote::{vote, vote_reasoning};

/// Engine tuning, usually built from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineOptions {
    pub top_k: usize,
    pub precedent_limit: usize,
    pub fusion: FusionMode,
    pub sources: SourceToggles,
    /// Deadline for each generator call.
    pub llm_timeout: Duration,
    pub temperature: f32,
    pub max_tokens: u32,
    /// `None` disables drafting.
    pub draft: Option<DraftOptions>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            top_k: 5,
            precedent_limit: MAX_PRECEDENTS,
            fusion: FusionMode::default(),
            sources: SourceToggles::default(),
            llm_timeout: Duration::from_secs(30),
            temperature: 0.3,
            max_tokens: 200,
            draft: Some(DraftOptions::default()),
        }
    }
}

/// Per-request switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestOptions {
    pub use_llm: bool,
    pub draft: bool,
}

impl Default for SuggestOptions {
    fn default() -> Self {
        Self {
            use_llm: true,
            draft: true,
        }
    }
}

/// A tier's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub choice: ActionTone,
    pub reasoning: String,
    pub tier: SuggestionTier,
}

/// Tiers 2 and 3. Always yields a valid action and tone.
#[must_use]
pub fn decide_without_model(
    message: &Message,
    precedents: &[Decision],
    analysis: Option<&MessageAnalysis>,
) -> Verdict {
    if let Some(choice) = vote(precedents) {
        return Verdict {
            choice,
            reasoning: vote_reasoning(precedents.len(), message.sender_type, choice),
            tier: SuggestionTier::Precedent,
        };
    }
    let (choice, reasoning) = heuristic_decision(message, analysis);
    Verdict {
        choice,
        reasoning,
        tier: SuggestionTier::Heuristic,
    }
}

/// Everything a decision is made from.
pub struct DecisionInput<'a> {
    pub message: &'a Message,
    pub precedents: &'a [Decision],
    /// Messages behind `precedents`, for prompt summaries.
    pub precedent_messages: &'a [Message],
    pub analysis: Option<&'a MessageAnalysis>,
    pub context: &'a [CandidateResult],
}

pub struct DecisionEngine {
    retriever: Arc<HybridRetriever>,
    store: Arc<dyn InboxStore>,
    generator: Option<Arc<dyn Generator>>,
    options: EngineOptions,
}

impl DecisionEngine {
    #[must_use]
    pub fn new(retriever: Arc<HybridRetriever>, options: EngineOptions) -> Self {
        let store = Arc::clone(&retriever.capabilities().store);
        Self {
            retriever,
            store,
            generator: None,
            options,
        }
    }

    #[must_use]
    pub fn with_generator(mut self, generator: Arc<dyn Generator>) -> Self {
        self.generator = Some(generator);
        self
    }

    #[must_use]
    pub const fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Suggest with every enabled capability.
    ///
    /// # Errors
    ///
    /// `NotFound` when the message does not exist, or the store error
    /// from loading it.
    pub async fn suggest(&self, message_id: &str) -> Result<Suggestion, AgentError> {
        self.suggest_with(message_id, SuggestOptions::default()).await
    }

    /// # Errors
    ///
    /// `NotFound` when the message does not exist, or the store error
    /// from loading it.
    pub async fn suggest_with(
        &self,
        message_id: &str,
        opts: SuggestOptions,
    ) -> Result<Suggestion, AgentError> {
        let message = self.store.message(message_id).await.map_err(|e| {
            if e.is_not_found() {
                AgentError::NotFound {
                    entity_type: "message".into(),
                    id: message_id.to_string(),
                }
            } else {
                AgentError::Search(e)
            }
        })?;

        let generator = if opts.use_llm {
            self.available_generator().await
        } else {
            None
        };

        let analysis = match generator {
            Some(g) => {
                analyze_message(
                    g,
                    &message.content,
                    self.options.temperature,
                    self.options.llm_timeout,
                )
                .await
            }
            None => None,
        };

        let request = RetrievalRequest::new(message.retrieval_query())
            .sender_type(Some(message.sender_type))
            .top_k(self.options.top_k)
            .sources(self.options.sources)
            .fusion(self.options.fusion);
        let context = self.retriever.retrieve(&request).await;

        let precedents =
            match resolve_precedents(self.store.as_ref(), &context, self.options.precedent_limit)
                .await
            {
                Ok(p) => p,
                Err(error) => {
                    tracing::warn!(message = %message.id, %error, "precedent lookup failed");
                    Vec::new()
                }
            };
        let precedent_messages = self.precedent_messages(&precedents).await;

        let input = DecisionInput {
            message: &message,
            precedents: &precedents,
            precedent_messages: &precedent_messages,
            analysis: analysis.as_ref(),
            context: &context,
        };
        let verdict = self.decide(&input, generator).await;

        let draft_response = match (generator, self.options.draft) {
            (Some(g), Some(draft_opts)) if opts.draft => {
                let lines = draft_context(&precedents, &precedent_messages, &context);
                generate_draft(g, &message, verdict.choice.tone, &lines, draft_opts).await
            }
            _ => None,
        };

        tracing::debug!(
            message = %message.id,
            tier = %verdict.tier,
            action = %verdict.choice.action,
            tone = %verdict.choice.tone,
            precedents = precedents.len(),
            candidates = context.len(),
            "suggestion ready"
        );

        Ok(Suggestion {
            message_id: message.id,
            action: verdict.choice.action,
            tone: verdict.choice.tone,
            reasoning: verdict.reasoning,
            tier: verdict.tier,
            precedent_count: precedents.len(),
            similar_decisions: precedents.iter().map(|d| d.id.clone()).collect(),
            analysis,
            draft_response,
        })
    }

    /// Run the tiers. `generator` is only consulted when precedents exist.
    pub async fn decide(
        &self,
        input: &DecisionInput<'_>,
        generator: Option<&dyn Generator>,
    ) -> Verdict {
        let fallback = decide_without_model(input.message, input.precedents, input.analysis);
        if input.precedents.is_empty() {
            return fallback;
        }
        let Some(generator) = generator else {
            return fallback;
        };
        self.model_tier(generator, input, fallback.choice)
            .await
            .unwrap_or(fallback)
    }

    async fn model_tier(
        &self,
        generator: &dyn Generator,
        input: &DecisionInput<'_>,
        default: ActionTone,
    ) -> Option<Verdict> {
        let summary = precedent_summaries(input.precedents, input.precedent_messages);
        let prompt = decision_prompt(input.message, input.analysis, &summary, input.context);
        let request = GenerateRequest::new(prompt)
            .system(DECISION_SYSTEM_PROMPT)
            .temperature(self.options.temperature)
            .max_tokens(self.options.max_tokens);

        let reply =
            match tokio::time::timeout(self.options.llm_timeout, generator.generate(request)).await
            {
                Ok(Ok(reply)) => reply,
                Ok(Err(error)) => {
                    tracing::warn!(generator = generator.id(), %error, "model tier failed, voting instead");
                    return None;
                }
                Err(_) => {
                    tracing::warn!(generator = generator.id(), "model tier timed out, voting instead");
                    return None;
                }
            };

        let decoded = parse_decision(&reply);
        if decoded.is_malformed() {
            tracing::warn!(generator = generator.id(), "model reply had no valid action or tone");
            return None;
        }
        let choice = ActionTone::new(
            decoded.action.unwrap_or(default.action),
            decoded.tone.unwrap_or(default.tone),
        );
        let reasoning = decoded.reasoning.unwrap_or_else(|| {
            format!(
                "Suggested from {} similar past decision(s).",
                input.precedents.len()
            )
        });
        Some(Verdict {
            choice,
            reasoning,
            tier: SuggestionTier::Model,
        })
    }

    async fn available_generator(&self) -> Option<&dyn Generator> {
        let generator = self.generator.as_deref()?;
        match tokio::time::timeout(self.options.llm_timeout, generator.is_available()).await {
            Ok(true) => Some(generator),
            Ok(false) | Err(_) => {
                tracing::debug!(generator = generator.id(), "generator unavailable, skipping model steps");
                None
            }
        }
    }

    async fn precedent_messages(&self, precedents: &[Decision]) -> Vec<Message> {
        if precedents.is_empty() {
            return Vec::new();
        }
        let ids: Vec<String> = precedents.iter().map(|d| d.message_id.clone()).collect();
        match self.store.messages_by_ids(&ids).await {
            Ok(messages) => messages,
            Err(error) => {
                tracing::warn!(%error, "failed to load precedent messages");
                Vec::new()
            }
        }
    }
}
