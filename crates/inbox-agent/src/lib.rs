//! # inbox-agent
//!
//! Decides how to handle an incoming message: retrieve context, resolve the
//! user's own past decisions, then pick an action and tone through a
//! three-tier fallback (model, precedent vote, heuristic table). Drafting a
//! reply is an optional extra that never changes the decision.

pub mod analysis;
pub mod draft;
pub mod engine;
pub mod error;
pub mod heuristic;
pub mod parse;
pub mod prompts;
pub mod record;
pub mod vote;

pub use draft::DraftOptions;
pub use engine::{
    DecisionEngine, DecisionInput, EngineOptions, SuggestOptions, Verdict, decide_without_model,
};
pub use error::AgentError;
pub use record::record_decision;
