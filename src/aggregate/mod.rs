//! Graph aggregates

mod graph;
mod network;

pub use graph::Graph;
pub use network::Network;
