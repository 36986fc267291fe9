//! JSONL decision audit trail.

pub mod writer;
