//! Seeded graph generators for tests and benchmarks.

pub mod graph_enumerator;
pub mod grids;
pub mod random_graphs;

pub use graph_enumerator::GraphEnumerator;
pub use grids::grid_graph;
pub use random_graphs::{random_connected_graph, random_directed_graph, random_undirected_graph};
