//! Cross-cutting error types.
//!
//! Storage and capability errors live in their own crates. `CoreError` covers
//! what every crate can raise: missing entities and rejected values.

use thiserror::Error;

/// Errors that can be raised by any inbox crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// A value fell outside its enumerated set or failed a format check.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    pub fn not_found(entity_type: &str, id: &str) -> Self {
        Self::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }
}
