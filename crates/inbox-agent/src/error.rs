//! Agent error types.

/// Errors surfaced by the decision engine. Capability failures never show up
/// here; they degrade to the next tier instead.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// The message being decided on does not exist.
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    #[error("search error: {0}")]
    Search(#[from] inbox_search::SearchError),

    #[error("database error: {0}")]
    Database(#[from] inbox_db::error::DatabaseError),
}

impl AgentError {
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
