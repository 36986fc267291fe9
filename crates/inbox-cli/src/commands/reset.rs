use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct ResetResponse {
    decisions_deleted: u64,
    precedent_links_deleted: u64,
    graph_nodes_deleted: u64,
    graph_edges_deleted: u64,
    decision_vectors_deleted: usize,
}

pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let stats = ctx.service.reset_decisions().await?;
    let decision_vectors_deleted = ctx.indexer.clear_decisions().await?;
    output(
        &ResetResponse {
            decisions_deleted: stats.decisions_deleted,
            precedent_links_deleted: stats.precedent_links_deleted,
            graph_nodes_deleted: stats.graph_nodes_deleted,
            graph_edges_deleted: stats.graph_edges_deleted,
            decision_vectors_deleted,
        },
        flags.format,
    )
}
