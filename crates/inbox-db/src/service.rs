//! Service layer: the database handle, the decision trail, and the writer lock.
//!
//! `InboxService` owns a single libSQL connection. Every multi-statement write
//! (recording a decision, rebuilding the graph, replacing the lexical index,
//! reset) takes `write_lock` for the duration of its transaction so two
//! writers never interleave on the shared connection. Reads do not lock.
//!
//! Repo methods live in `repos/*` as `impl InboxService` blocks.

use std::path::PathBuf;

use tokio::sync::{Mutex, MutexGuard};

use crate::InboxDb;
use crate::error::DatabaseError;
use crate::trail::writer::TrailWriter;

pub struct InboxService {
    db: InboxDb,
    trail: TrailWriter,
    write_lock: Mutex<()>,
}

impl InboxService {
    /// Open a local store.
    ///
    /// `trail_dir` of `None` disables the JSONL decision trail.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or the trail
    /// directory cannot be created.
    pub async fn new_local(
        db_path: &str,
        trail_dir: Option<PathBuf>,
    ) -> Result<Self, DatabaseError> {
        let db = InboxDb::open_local(db_path).await?;
        let trail = match trail_dir {
            Some(dir) => TrailWriter::new(dir)?,
            None => TrailWriter::disabled(),
        };
        Ok(Self::from_db(db, trail))
    }

    #[must_use]
    pub fn from_db(db: InboxDb, trail: TrailWriter) -> Self {
        Self {
            db,
            trail,
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub const fn db(&self) -> &InboxDb {
        &self.db
    }

    #[must_use]
    pub const fn trail(&self) -> &TrailWriter {
        &self.trail
    }

    pub(crate) async fn writer(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }
}
