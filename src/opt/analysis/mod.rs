pub mod callgraph;
pub mod reachability;
