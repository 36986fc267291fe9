use inbox_core::entities::Decision;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct DecisionListResponse {
    decisions: Vec<Decision>,
}

pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let limit = effective_limit(None, flags.limit, 50);
    let decisions = ctx.service.list_decisions(limit).await?;
    output(&DecisionListResponse { decisions }, flags.format)
}
