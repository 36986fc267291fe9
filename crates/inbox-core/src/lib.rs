//! # inbox-core
//!
//! Core types, ID helpers, and error types shared by every inbox crate.
//!
//! - Entity structs for messages, decisions, and the derived decision graph
//! - Enumerated action/tone/sender-type values with strict parsing
//! - Retrieval candidates and suggestion responses
//! - Demo seed messages

pub mod candidate;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod seed;
pub mod suggestion;
