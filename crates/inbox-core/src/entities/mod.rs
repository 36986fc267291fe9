//! Entity structs for inbox domain objects.
//!
//! Each entity maps to a table in the libSQL store. All structs derive
//! `Serialize`, `Deserialize`, and `JsonSchema` for JSON output and schema
//! validation.

mod decision;
mod graph;
mod message;

pub use decision::{ActionTone, ContextUsed, Decision, NewDecision, PrecedentLink};
pub use graph::{GraphEdge, GraphNode, GraphNodeKey, GraphSnapshot};
pub use message::{Message, NewMessage};
