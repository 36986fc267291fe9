use inbox_core::candidate::CandidateResult;
use inbox_core::enums::{FusionMode, SenderType};
use inbox_search::{RetrievalRequest, SourceToggles};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::RetrieveArgs;
use crate::commands::shared::parse::parse_opt;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct RetrieveResponse {
    query: String,
    fusion: FusionMode,
    candidates: Vec<CandidateResult>,
}

fn build_request(args: &RetrieveArgs, ctx: &AppContext) -> anyhow::Result<RetrievalRequest> {
    let defaults = &ctx.config.retrieval;
    let sender_type = parse_opt::<SenderType>(args.sender_type.as_deref(), "sender type")?;
    let fusion =
        parse_opt::<FusionMode>(args.fusion.as_deref(), "fusion")?.unwrap_or(defaults.fusion);
    Ok(RetrievalRequest::new(args.query.clone())
        .sender_type(sender_type)
        .top_k(args.top_k.unwrap_or(defaults.top_k))
        .fusion(fusion)
        .sources(SourceToggles {
            vector: defaults.vector && !args.no_vector,
            keyword: defaults.keyword && !args.no_keyword,
            graph: defaults.graph && !args.no_graph,
        }))
}

pub async fn handle(
    args: &RetrieveArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let request = build_request(args, ctx)?;
    let candidates = ctx.retriever.retrieve(&request).await;
    output(
        &RetrieveResponse {
            query: request.query,
            fusion: request.fusion,
            candidates,
        },
        flags.format,
    )
}
