use anyhow::Context;
use inbox_agent::SuggestOptions;
use inbox_core::entities::{ActionTone, ContextUsed, NewDecision};
use inbox_core::enums::{Action, Tone};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::DecideArgs;
use crate::commands::shared::parse::{parse_enum, parse_opt};
use crate::context::AppContext;
use crate::output::output;

/// Record the user's choice. Without `--suggested-action` the agent's
/// suggestion is recomputed (model off) so the override is captured; its
/// precedents fill in when no `--precedent` was given.
pub async fn handle(
    args: &DecideArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let human_action = ActionTone::new(
        parse_enum::<Action>(&args.action, "action")?,
        parse_enum::<Tone>(&args.tone, "tone")?,
    );
    let message = ctx.service.get_message(&args.message_id).await?;

    let suggested_action =
        parse_opt::<Action>(args.suggested_action.as_deref(), "suggested action")?;
    let suggested_tone = parse_opt::<Tone>(args.suggested_tone.as_deref(), "suggested tone")?;
    let (agent_suggestion, similar) = match suggested_action {
        Some(action) => (
            ActionTone::new(action, suggested_tone.unwrap_or(human_action.tone)),
            Vec::new(),
        ),
        None => {
            let suggestion = ctx
                .engine
                .suggest_with(
                    &message.id,
                    SuggestOptions {
                        use_llm: false,
                        draft: false,
                    },
                )
                .await
                .context("failed to compute the agent suggestion")?;
            (
                ActionTone::new(suggestion.action, suggestion.tone),
                suggestion.similar_decisions,
            )
        }
    };

    let similar_decisions = if args.precedents.is_empty() {
        similar
    } else {
        args.precedents.clone()
    };

    let decision = inbox_agent::record_decision(
        &ctx.service,
        &ctx.indexer,
        NewDecision {
            message_id: message.id.clone(),
            agent_suggestion,
            human_action,
            context_used: ContextUsed {
                sender_type: message.sender_type,
                similar_decisions,
            },
            why: args.why.clone(),
        },
    )
    .await?;
    output(&decision, flags.format)
}
