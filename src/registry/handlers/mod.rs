pub mod graph;
pub mod nodes;
pub mod query;
pub mod variables;
