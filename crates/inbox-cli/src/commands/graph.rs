use inbox_core::entities::GraphSnapshot;
use inbox_core::enums::{EdgeKind, NodeKind};
use serde::Serialize;

use crate::cli::{GlobalFlags, OutputFormat};
use crate::cli::root_commands::GraphArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct GraphSummary {
    messages: usize,
    decisions: usize,
    precedent_edges: usize,
    nodes: usize,
    edges: usize,
}

impl GraphSummary {
    fn of(snapshot: &GraphSnapshot) -> Self {
        Self {
            messages: snapshot.count_nodes(NodeKind::Message),
            decisions: snapshot.count_nodes(NodeKind::Decision),
            precedent_edges: snapshot.count_edges(EdgeKind::BasedOnPrecedent),
            nodes: snapshot.nodes.len(),
            edges: snapshot.edges.len(),
        }
    }
}

/// Full snapshot for json/raw; a count summary for tables.
pub async fn handle(args: &GraphArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    if args.rebuild {
        let stats = ctx.service.rebuild_graph().await?;
        tracing::info!(
            nodes = stats.nodes_created,
            edges = stats.edges_created,
            "rebuilt decision graph"
        );
    }
    let snapshot = ctx.service.graph_snapshot().await?;
    match flags.format {
        OutputFormat::Table => output(&GraphSummary::of(&snapshot), flags.format),
        OutputFormat::Json | OutputFormat::Raw => output(&snapshot, flags.format),
    }
}
