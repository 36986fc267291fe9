//! # inbox-search
//!
//! Hybrid retrieval over the inbox: semantic search in the `DuckDB` vector
//! index, BM25 over libSQL FTS5, and recent precedents from the decision log.
//!
//! - [`capability`]: the traits every backend is reached through, and the
//!   [`Capabilities`] bundle built once at startup
//! - [`adapters`]: implementations over `InboxService`, `VectorLake`, and the
//!   fastembed handles
//! - [`retriever`]: the orchestrator (concurrent sources, dedup, rerank / native / RRF)
//! - [`precedent`]: graph candidates back to `Decision`s
//! - [`indexer`] and [`chunker`]: keeping the indexes current

pub mod adapters;
pub mod capability;
pub mod chunker;
pub mod error;
pub mod fusion;
pub mod indexer;
pub mod precedent;
pub mod retriever;
pub mod sources;

#[cfg(test)]
pub(crate) mod test_support;

pub use capability::{Capabilities, Embedder, InboxStore, LexicalIndex, Reranker, VectorIndex};
pub use error::SearchError;
pub use indexer::Indexer;
pub use precedent::{MAX_PRECEDENTS, resolve_precedents};
pub use retriever::{HybridRetriever, RetrievalRequest, RetrieverOptions, SourceToggles};
