// #![warn(missing_docs)]

//! # graph_classics
//!
//! Classical graph algorithms on a weighted, possibly directed graph with
//! integer vertex ids: union-find, traversals, connected and strongly
//! connected components, cycle detection, topological sorting, bipartiteness,
//! spanning trees and shortest paths.
//!
//! Based on [`petgraph`](https://docs.rs/petgraph).
//!
//! Undirected graphs are stored with every edge in both directions, see
//! [`Graph::add_undirected_edge`]. Algorithms never mutate their input and
//! report data-dependent failures through [`GraphError`].

pub mod all_pairs;
pub mod bipartite;
pub mod connectivity;
pub mod cycle;
pub mod error;
pub mod graph;
pub mod shortest_path;
pub mod spanning_tree;
pub mod testing;
pub mod topological;
pub mod traversal;
pub mod types;
pub mod union_find;

pub use error::{GraphError, Result};
pub use graph::Graph;
pub use types::{Edge, VertexId, Weight};
pub use union_find::UnionFind;
