//! Append-only JSONL trail of recorded decisions.
//!
//! Every decision lands in `{trail_dir}/decisions.jsonl` once its database
//! transaction has committed, so the trail never holds a decision the store
//! rejected.

use std::path::{Path, PathBuf};

use inbox_core::entities::Decision;

use crate::error::DatabaseError;

const TRAIL_FILE: &str = "decisions.jsonl";

pub struct TrailWriter {
    trail_dir: PathBuf,
    enabled: bool,
}

impl TrailWriter {
    /// Create a writer for `trail_dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Trail` if the directory cannot be created.
    pub fn new(trail_dir: PathBuf) -> Result<Self, DatabaseError> {
        std::fs::create_dir_all(&trail_dir)
            .map_err(|e| DatabaseError::Trail(format!("{}: {e}", trail_dir.display())))?;
        Ok(Self {
            trail_dir,
            enabled: true,
        })
    }

    /// A writer that drops every record (tests, in-memory stores).
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            trail_dir: PathBuf::new(),
            enabled: false,
        }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Append one decision as a JSON line.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Trail` if the file write fails.
    pub fn append(&self, decision: &Decision) -> Result<(), DatabaseError> {
        if !self.enabled {
            return Ok(());
        }
        serde_jsonlines::append_json_lines(self.path(), [decision])
            .map_err(|e| DatabaseError::Trail(e.to_string()))
    }

    /// Read every decision back, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Trail` if the file cannot be read or a line is
    /// not a valid decision.
    pub fn read_all(&self) -> Result<Vec<Decision>, DatabaseError> {
        let path = self.path();
        if !self.enabled || !path.exists() {
            return Ok(Vec::new());
        }
        serde_jsonlines::json_lines(&path)
            .and_then(|lines| lines.collect::<std::io::Result<Vec<Decision>>>())
            .map_err(|e| DatabaseError::Trail(e.to_string()))
    }

    #[must_use]
    pub fn trail_dir(&self) -> &Path {
        &self.trail_dir
    }

    fn path(&self) -> PathBuf {
        self.trail_dir.join(TRAIL_FILE)
    }
}
