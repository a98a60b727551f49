use crate::graph::Graph;
use crate::types::{VertexId, Weight};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::ops::RangeInclusive;

/// Connected undirected graph on vertices `0..n` with `m` undirected edges.
///
/// The first `n - 1` edges attach every vertex to a random earlier one, the
/// rest join random pairs (self-loops and parallel edges included).
/// Every edge is stored in both directions.
pub fn random_connected_graph(n: usize, m: usize, weights: RangeInclusive<Weight>, seed: u64) -> Graph {
    assert!(n > 0 && m + 1 >= n);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut graph = Graph::new();

    for i in 0..n {
        graph.add_vertex(vertex(i));
        if i > 0 {
            let j = rng.random_range(0..i);
            let w = rng.random_range(weights.clone());
            graph.add_undirected_edge(vertex(i), vertex(j), w);
        }
    }

    for _ in n - 1..m {
        let s = rng.random_range(0..n);
        let t = rng.random_range(0..n);
        let w = rng.random_range(weights.clone());
        graph.add_undirected_edge(vertex(s), vertex(t), w);
    }

    graph
}

/// Undirected graph on vertices `0..n` with `m` random edges, possibly disconnected.
pub fn random_undirected_graph(n: usize, m: usize, weights: RangeInclusive<Weight>, seed: u64) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut graph = Graph::new();
    for i in 0..n {
        graph.add_vertex(vertex(i));
    }
    for _ in 0..m {
        let s = rng.random_range(0..n);
        let t = rng.random_range(0..n);
        let w = rng.random_range(weights.clone());
        graph.add_undirected_edge(vertex(s), vertex(t), w);
    }
    graph
}

/// Directed graph on vertices `0..n` with `m` random edges.
pub fn random_directed_graph(n: usize, m: usize, weights: RangeInclusive<Weight>, seed: u64) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut graph = Graph::new();
    for i in 0..n {
        graph.add_vertex(vertex(i));
    }
    for _ in 0..m {
        let s = rng.random_range(0..n);
        let t = rng.random_range(0..n);
        let w = rng.random_range(weights.clone());
        graph.add_edge(vertex(s), vertex(t), w);
    }
    graph
}

fn vertex(i: usize) -> VertexId {
    i as VertexId
}
