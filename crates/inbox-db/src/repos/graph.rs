//! Decision graph projection.
//!
//! The graph is a derived index over the decision log. Nodes and edges are
//! keyed deterministically (see `GraphNodeKey` and `GraphEdge::key`) and
//! written with `INSERT OR IGNORE`, so projecting the same decision twice is
//! a no-op and the whole graph can be dropped and rebuilt at any time.
//!
//! Per decision the projection writes:
//!
//! ```text
//! message ──has_decision──▶ decision ──chose_action──────▶ action
//!                              │ ├──────chose_tone────────▶ tone
//!                              │ └──────from_sender_type──▶ sender_type
//!                              └──based_on_precedent──▶ decision (one per linked precedent)
//! ```

use std::collections::{HashMap, HashSet};

use inbox_core::entities::{Decision, GraphEdge, GraphNode, GraphNodeKey, GraphSnapshot, Message};
use inbox_core::enums::{Action, EdgeKind};
use serde_json::json;

use crate::error::DatabaseError;
use crate::helpers::{format_timestamp, parse_datetime, parse_value};
use crate::service::InboxService;

/// What one projection wrote. Ignored (already present) rows are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectionStats {
    pub nodes_created: u64,
    pub edges_created: u64,
    pub precedents_linked: usize,
}

impl ProjectionStats {
    fn absorb(&mut self, other: Self) {
        self.nodes_created += other.nodes_created;
        self.edges_created += other.edges_created;
        self.precedents_linked += other.precedents_linked;
    }
}

/// A precedent that resolved to an earlier, existing decision.
struct LinkedPrecedent {
    id: String,
    action: Action,
}

/// Resolve `context_used.similar_decisions` against the store.
///
/// Drops ids that are missing, repeated, self-referencing, or not strictly
/// older than `decision`.
async fn resolve_precedents(
    conn: &libsql::Connection,
    decision: &Decision,
) -> Result<Vec<LinkedPrecedent>, DatabaseError> {
    let mut seen = HashSet::new();
    let mut linked = Vec::new();
    for precedent_id in &decision.context_used.similar_decisions {
        if precedent_id == &decision.id || !seen.insert(precedent_id.as_str()) {
            continue;
        }
        let mut rows = conn
            .query(
                "SELECT human_action, created_at FROM decisions WHERE id = ?1",
                [precedent_id.as_str()],
            )
            .await?;
        let Some(row) = rows.next().await? else {
            tracing::debug!(decision = %decision.id, precedent = %precedent_id, "precedent no longer exists, not linking");
            continue;
        };
        let created_at = parse_datetime(&row.get::<String>(1)?)?;
        if created_at >= decision.created_at {
            tracing::warn!(decision = %decision.id, precedent = %precedent_id, "precedent does not predate decision, not linking");
            continue;
        }
        linked.push(LinkedPrecedent {
            id: precedent_id.clone(),
            action: parse_value(&row.get::<String>(0)?)?,
        });
    }
    Ok(linked)
}

async fn upsert_node(
    conn: &libsql::Connection,
    key: &GraphNodeKey,
    label: &str,
    properties: &serde_json::Value,
) -> Result<u64, DatabaseError> {
    let written = conn
        .execute(
            "INSERT OR IGNORE INTO graph_nodes (id, kind, label, properties) VALUES (?1, ?2, ?3, ?4)",
            libsql::params![
                key.key(),
                key.kind().as_str(),
                label,
                serde_json::to_string(properties)?
            ],
        )
        .await?;
    Ok(written)
}

async fn insert_edge(conn: &libsql::Connection, edge: &GraphEdge) -> Result<u64, DatabaseError> {
    let written = conn
        .execute(
            "INSERT OR IGNORE INTO graph_edges (id, source_id, target_id, kind) VALUES (?1, ?2, ?3, ?4)",
            libsql::params![
                edge.id.as_str(),
                edge.source_id.as_str(),
                edge.target_id.as_str(),
                edge.kind.as_str()
            ],
        )
        .await?;
    Ok(written)
}

fn decision_label(action: Action) -> String {
    format!("Decision\n{action}")
}

/// Project one decision: precedent links, nodes, and edges.
///
/// Runs on whatever connection or transaction the caller passes; callers
/// wrap it in a transaction so the structural edges land together or not at all.
pub(crate) async fn project_decision(
    conn: &libsql::Connection,
    decision: &Decision,
    message: &Message,
) -> Result<ProjectionStats, DatabaseError> {
    let precedents = resolve_precedents(conn, decision).await?;
    let mut stats = ProjectionStats {
        precedents_linked: precedents.len(),
        ..ProjectionStats::default()
    };

    for precedent in &precedents {
        conn.execute(
            "INSERT OR IGNORE INTO decision_precedents (decision_id, precedent_id) VALUES (?1, ?2)",
            libsql::params![decision.id.as_str(), precedent.id.as_str()],
        )
        .await?;
    }

    let message_key = GraphNodeKey::Message(message.id.clone());
    let decision_key = GraphNodeKey::Decision(decision.id.clone());
    let action_key = GraphNodeKey::Action(decision.human_action.action);
    let tone_key = GraphNodeKey::Tone(decision.human_action.tone);
    let sender_key = GraphNodeKey::SenderType(message.sender_type);

    let preview: String = message.content.chars().take(100).collect();
    stats.nodes_created += upsert_node(
        conn,
        &message_key,
        &format!("{}\n{}", message.sender_name, message.sender_type),
        &json!({
            "sender_name": message.sender_name,
            "sender_type": message.sender_type,
            "channel": message.channel,
            "subject": message.subject,
            "preview": preview,
        }),
    )
    .await?;
    stats.nodes_created += upsert_node(
        conn,
        &decision_key,
        &decision_label(decision.human_action.action),
        &json!({
            "action": decision.human_action.action,
            "tone": decision.human_action.tone,
            "suggested_action": decision.agent_suggestion.action,
            "suggested_tone": decision.agent_suggestion.tone,
            "overridden": decision.is_override(),
            "why": decision.why,
            "created_at": format_timestamp(&decision.created_at),
        }),
    )
    .await?;
    for key in [&action_key, &tone_key, &sender_key] {
        let value = key.key();
        let label = value.split_once(':').map_or(value.as_str(), |(_, v)| v);
        stats.nodes_created += upsert_node(conn, key, label, &json!({ "value": label })).await?;
    }

    let mut edges = vec![
        GraphEdge::new(EdgeKind::HasDecision, &message_key, &decision_key),
        GraphEdge::new(EdgeKind::ChoseAction, &decision_key, &action_key),
        GraphEdge::new(EdgeKind::ChoseTone, &decision_key, &tone_key),
        GraphEdge::new(EdgeKind::FromSenderType, &decision_key, &sender_key),
    ];
    for precedent in &precedents {
        let precedent_key = GraphNodeKey::Decision(precedent.id.clone());
        stats.nodes_created += upsert_node(
            conn,
            &precedent_key,
            &decision_label(precedent.action),
            &json!({ "action": precedent.action }),
        )
        .await?;
        edges.push(GraphEdge::new(EdgeKind::BasedOnPrecedent, &decision_key, &precedent_key));
    }

    for edge in &edges {
        stats.edges_created += insert_edge(conn, edge).await?;
    }
    Ok(stats)
}

/// Undo `project_decision` for a decision that must not stay recorded.
///
/// Removes the decision node, every edge touching it, and its precedent
/// links. Message and singleton nodes left without edges go too.
pub(crate) async fn unproject_decision(
    conn: &libsql::Connection,
    decision: &Decision,
    message: &Message,
) -> Result<(), DatabaseError> {
    let decision_key = GraphNodeKey::Decision(decision.id.clone()).key();
    conn.execute(
        "DELETE FROM graph_edges WHERE source_id = ?1 OR target_id = ?1",
        [decision_key.as_str()],
    )
    .await?;
    conn.execute("DELETE FROM graph_nodes WHERE id = ?1", [decision_key.as_str()])
        .await?;
    conn.execute(
        "DELETE FROM decision_precedents WHERE decision_id = ?1",
        [decision.id.as_str()],
    )
    .await?;

    let orphans = [
        GraphNodeKey::Message(message.id.clone()),
        GraphNodeKey::Action(decision.human_action.action),
        GraphNodeKey::Tone(decision.human_action.tone),
        GraphNodeKey::SenderType(message.sender_type),
    ];
    for key in &orphans {
        conn.execute(
            "DELETE FROM graph_nodes WHERE id = ?1
             AND NOT EXISTS (SELECT 1 FROM graph_edges WHERE source_id = ?1 OR target_id = ?1)",
            [key.key()],
        )
        .await?;
    }
    Ok(())
}

fn row_to_node(row: &libsql::Row) -> Result<GraphNode, DatabaseError> {
    Ok(GraphNode {
        id: row.get::<String>(0)?,
        kind: parse_value(&row.get::<String>(1)?)?,
        label: row.get::<String>(2)?,
        properties: serde_json::from_str(&row.get::<String>(3)?)?,
    })
}

fn row_to_edge(row: &libsql::Row) -> Result<GraphEdge, DatabaseError> {
    Ok(GraphEdge {
        id: row.get::<String>(0)?,
        source_id: row.get::<String>(1)?,
        target_id: row.get::<String>(2)?,
        kind: parse_value(&row.get::<String>(3)?)?,
    })
}

impl InboxService {
    /// Project an already-stored decision into the graph in its own transaction.
    ///
    /// Idempotent: a second call for the same decision writes nothing.
    pub async fn record_graph(
        &self,
        decision: &Decision,
        message: &Message,
    ) -> Result<ProjectionStats, DatabaseError> {
        let _guard = self.writer().await;
        let tx = self.db().conn().transaction().await?;
        let stats = project_decision(&tx, decision, message).await?;
        tx.commit().await?;
        Ok(stats)
    }

    /// Every node and edge, for visualization.
    pub async fn graph_snapshot(&self) -> Result<GraphSnapshot, DatabaseError> {
        let conn = self.db().conn();
        let mut snapshot = GraphSnapshot::default();

        let mut rows = conn
            .query(
                "SELECT id, kind, label, properties FROM graph_nodes ORDER BY kind, rowid",
                (),
            )
            .await?;
        while let Some(row) = rows.next().await? {
            snapshot.nodes.push(row_to_node(&row)?);
        }

        let mut rows = conn
            .query(
                "SELECT id, source_id, target_id, kind FROM graph_edges ORDER BY rowid",
                (),
            )
            .await?;
        while let Some(row) = rows.next().await? {
            snapshot.edges.push(row_to_edge(&row)?);
        }
        Ok(snapshot)
    }

    /// Drop the projection and re-project every decision, oldest first.
    pub async fn rebuild_graph(&self) -> Result<ProjectionStats, DatabaseError> {
        let decisions = self.all_decisions().await?;
        let message_ids: Vec<String> = decisions
            .iter()
            .map(|d| d.message_id.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let messages: HashMap<String, Message> = self
            .get_messages_by_ids(&message_ids)
            .await?
            .into_iter()
            .map(|m| (m.id.clone(), m))
            .collect();

        let _guard = self.writer().await;
        let tx = self.db().conn().transaction().await?;
        tx.execute("DELETE FROM graph_edges", ()).await?;
        tx.execute("DELETE FROM graph_nodes", ()).await?;

        let mut totals = ProjectionStats::default();
        for decision in &decisions {
            let Some(message) = messages.get(&decision.message_id) else {
                tracing::warn!(decision = %decision.id, "decision references a missing message, skipping");
                continue;
            };
            totals.absorb(project_decision(&tx, decision, message).await?);
        }
        tx.commit().await?;

        tracing::info!(
            decisions = decisions.len(),
            nodes = totals.nodes_created,
            edges = totals.edges_created,
            "rebuilt decision graph"
        );
        Ok(totals)
    }
}
