pub mod decide;
pub mod decisions;
pub mod dispatch;
pub mod graph;
pub mod messages;
pub mod reindex;
pub mod replay;
pub mod reset;
pub mod retrieve;
pub mod schema;
pub mod seed;
pub mod shared;
pub mod suggest;
