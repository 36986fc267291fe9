use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Action, EdgeKind, NodeKind, SenderType, Tone};

/// Identity of a node in the decision graph, one variant per node kind.
///
/// The key is deterministic, so upserting the same variant twice always lands
/// on the same row. Action, tone, and sender-type nodes are singletons per value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GraphNodeKey {
    Message(String),
    Decision(String),
    Action(Action),
    Tone(Tone),
    SenderType(SenderType),
}

impl GraphNodeKey {
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Message(_) => NodeKind::Message,
            Self::Decision(_) => NodeKind::Decision,
            Self::Action(_) => NodeKind::Action,
            Self::Tone(_) => NodeKind::Tone,
            Self::SenderType(_) => NodeKind::SenderType,
        }
    }

    /// Stable node id, `kind:value`.
    #[must_use]
    pub fn key(&self) -> String {
        let value = match self {
            Self::Message(id) | Self::Decision(id) => id.as_str(),
            Self::Action(action) => action.as_str(),
            Self::Tone(tone) => tone.as_str(),
            Self::SenderType(sender_type) => sender_type.as_str(),
        };
        format!("{}:{value}", self.kind().as_str())
    }
}

/// A node of the derived decision graph.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GraphNode {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    #[serde(default)]
    pub properties: serde_json::Value,
}

/// A directed, typed edge of the derived decision graph.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GraphEdge {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    pub kind: EdgeKind,
}

impl GraphEdge {
    /// Deterministic edge id, so re-projecting a decision never duplicates edges.
    #[must_use]
    pub fn key(kind: EdgeKind, source_id: &str, target_id: &str) -> String {
        format!("{}:{source_id}->{target_id}", kind.as_str())
    }

    #[must_use]
    pub fn new(kind: EdgeKind, source: &GraphNodeKey, target: &GraphNodeKey) -> Self {
        let source_id = source.key();
        let target_id = target.key();
        Self {
            id: Self::key(kind, &source_id, &target_id),
            source_id,
            target_id,
            kind,
        }
    }
}

/// Full node/edge listing for visualization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GraphSnapshot {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl GraphSnapshot {
    #[must_use]
    pub fn count_nodes(&self, kind: NodeKind) -> usize {
        self.nodes.iter().filter(|n| n.kind == kind).count()
    }

    #[must_use]
    pub fn count_edges(&self, kind: EdgeKind) -> usize {
        self.edges.iter().filter(|e| e.kind == kind).count()
    }
}
