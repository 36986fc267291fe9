//! Repository modules. Each adds methods to `InboxService`.

pub mod decision;
pub mod graph;
pub mod lexical;
pub mod message;
pub mod reset;
