//! Topological ordering of a DAG.
//!
//! Both functions return `None` when the graph has a directed cycle.

use crate::graph::Graph;
use crate::traversal::{Control, DepthFirst, Visit};
use crate::types::VertexId;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use tracing::{debug, instrument};

/// Reverse DFS postorder.
///
/// A vertex finishes only after everything reachable from it has finished,
/// so reversing the finish order puts every edge's source before its target.
/// Roots and edges are taken in insertion order.
#[instrument(level = "debug", skip_all, fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn topological_sort(graph: &Graph) -> Option<Vec<VertexId>> {
    let adj = graph.adjacency();
    let mut finished = Vec::with_capacity(adj.len());
    let mut dfs = DepthFirst::new(&adj);

    for root in 0..adj.len() {
        let control = dfs.walk(root, &mut |visit| match visit {
            Visit::Back(..) => Control::Break,
            Visit::Finish(v) => {
                finished.push(adj.ids[v]);
                Control::Continue
            }
            _ => Control::Continue,
        });
        if control == Control::Break {
            debug!("back edge found, graph is not a DAG");
            return None;
        }
    }

    finished.reverse();
    Some(finished)
}

/// Kahn's algorithm.
///
/// Repeatedly emits a vertex with no remaining incoming edges and removes its
/// outgoing edges. Among ready vertices the smallest id goes first, so the
/// result is the lexicographically smallest topological order.
#[instrument(level = "debug", skip_all, fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn topological_sort_kahn(graph: &Graph) -> Option<Vec<VertexId>> {
    let adj = graph.adjacency();
    let mut indegree = vec![0usize; adj.len()];
    for (_, t, _) in adj.edges() {
        indegree[t] += 1;
    }

    let mut ready: BinaryHeap<Reverse<(VertexId, usize)>> = indegree
        .iter()
        .enumerate()
        .filter(|&(_, &d)| d == 0)
        .map(|(v, _)| Reverse((adj.ids[v], v)))
        .collect();

    let mut order = Vec::with_capacity(adj.len());
    while let Some(Reverse((id, v))) = ready.pop() {
        order.push(id);
        for &(t, _) in &adj.out[v] {
            indegree[t] -= 1;
            if indegree[t] == 0 {
                ready.push(Reverse((adj.ids[t], t)));
            }
        }
    }

    if order.len() < adj.len() {
        debug!(emitted = order.len(), "vertices left with incoming edges, graph is not a DAG");
        return None;
    }
    Some(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::random_directed_graph;
    use hashbrown::HashMap;

    fn assert_topological(g: &Graph, order: &[VertexId]) {
        assert_eq!(order.len(), g.vertex_count());
        let position: HashMap<_, _> = order.iter().enumerate().map(|(i, &v)| (v, i)).collect();
        assert_eq!(position.len(), order.len());
        for e in g.directed_edges() {
            assert!(position[&e.source] < position[&e.target], "{e}");
        }
    }

    /// Random DAG: every edge points from the smaller id to the larger one.
    fn random_dag(n: usize, m: usize, seed: u64) -> Graph {
        let mut dag = Graph::new();
        for v in 0..n as VertexId {
            dag.add_vertex(v);
        }
        for e in random_directed_graph(n, m, 1..=1, seed).directed_edges() {
            if e.source != e.target {
                dag.add_edge(e.source.min(e.target), e.source.max(e.target), 1);
            }
        }
        dag
    }

    #[test]
    fn test_path_and_cycle() {
        let mut g = Graph::from_edges([(0, 1, 1), (1, 2, 1)]);
        assert_eq!(topological_sort(&g), Some(vec![0, 1, 2]));
        assert_eq!(topological_sort_kahn(&g), Some(vec![0, 1, 2]));

        g.add_edge(2, 0, 1);
        assert_eq!(topological_sort(&g), None);
        assert_eq!(topological_sort_kahn(&g), None);
    }

    #[test]
    fn test_kahn_breaks_ties_on_smallest_id() {
        let mut g = Graph::new();
        for v in [3, 1, 2] {
            g.add_vertex(v);
        }
        assert_eq!(topological_sort_kahn(&g), Some(vec![1, 2, 3]));
        assert_eq!(topological_sort(&g), Some(vec![2, 1, 3]));

        g.add_edge(3, 1, 1);
        assert_eq!(topological_sort_kahn(&g), Some(vec![2, 3, 1]));
    }

    #[test]
    fn test_self_loop_is_rejected() {
        let g = Graph::from_edges([(0, 1, 1), (1, 1, 1)]);
        assert_eq!(topological_sort(&g), None);
        assert_eq!(topological_sort_kahn(&g), None);
    }

    #[test]
    fn test_parallel_edges() {
        let g = Graph::from_edges([(0, 1, 1), (0, 1, 2), (1, 2, 1)]);
        assert_eq!(topological_sort_kahn(&g), Some(vec![0, 1, 2]));
        assert_eq!(topological_sort(&g), Some(vec![0, 1, 2]));
    }

    #[test]
    fn test_random_dags() {
        for seed in 0..30 {
            let g = random_dag(25, 60, seed);
            assert_topological(&g, &topological_sort(&g).unwrap());
            assert_topological(&g, &topological_sort_kahn(&g).unwrap());
        }
    }

    #[test]
    fn test_both_agree_on_acyclicity() {
        for seed in 0..40 {
            let g = random_directed_graph(10, 12, 1..=1, seed);
            let dfs = topological_sort(&g);
            let kahn = topological_sort_kahn(&g);
            assert_eq!(dfs.is_some(), kahn.is_some(), "seed {seed}");
            if let Some(order) = dfs {
                assert_topological(&g, &order);
            }
        }
    }
}
