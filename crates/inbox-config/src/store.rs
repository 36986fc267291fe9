//! Storage locations.

use serde::{Deserialize, Serialize};

fn default_db_path() -> String {
    ".inbox/inbox.db".to_string()
}

fn default_vector_path() -> String {
    ".inbox/vectors.duckdb".to_string()
}

fn default_trail_dir() -> String {
    ".inbox/trail".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// libSQL database holding messages, decisions, and the graph projection.
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// DuckDB file backing the vector index.
    #[serde(default = "default_vector_path")]
    pub vector_path: String,

    /// Directory for the JSONL decision audit trail.
    #[serde(default = "default_trail_dir")]
    pub trail_dir: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            vector_path: default_vector_path(),
            trail_dir: default_trail_dir(),
        }
    }
}
