//! Demo reset: forget every decision, keep the inbox.

use crate::error::DatabaseError;
use crate::service::InboxService;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResetStats {
    pub decisions_deleted: u64,
    pub precedent_links_deleted: u64,
    pub graph_nodes_deleted: u64,
    pub graph_edges_deleted: u64,
}

impl InboxService {
    /// Delete decisions, precedent links, and the graph projection in one
    /// transaction. Messages and the lexical index are untouched; the JSONL
    /// trail is append-only and keeps its history.
    pub async fn reset_decisions(&self) -> Result<ResetStats, DatabaseError> {
        let _guard = self.writer().await;
        let tx = self.db().conn().transaction().await?;
        let stats = ResetStats {
            graph_edges_deleted: tx.execute("DELETE FROM graph_edges", ()).await?,
            graph_nodes_deleted: tx.execute("DELETE FROM graph_nodes", ()).await?,
            precedent_links_deleted: tx.execute("DELETE FROM decision_precedents", ()).await?,
            decisions_deleted: tx.execute("DELETE FROM decisions", ()).await?,
        };
        tx.commit().await?;
        tracing::info!(decisions = stats.decisions_deleted, "reset decisions and graph");
        Ok(stats)
    }
}
