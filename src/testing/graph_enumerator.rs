use crate::graph::Graph;
use crate::types::{UNIT_WEIGHT, VertexId};

/// Iterates over every simple undirected graph on vertices `0..n`.
///
/// Bit `k` of the mask selects the `k`-th vertex pair in lexicographic
/// order, so there are `2^(n(n-1)/2)` graphs in total.
pub struct GraphEnumerator {
    n: usize,
    mask: usize,
    end: usize,
}

impl GraphEnumerator {
    pub fn new(n: usize) -> Self {
        let pairs = n * n.saturating_sub(1) / 2;
        assert!(pairs < usize::BITS as usize, "too many vertices to enumerate");
        Self {
            n,
            mask: 0,
            end: 1 << pairs,
        }
    }
}

impl Iterator for GraphEnumerator {
    type Item = Graph;

    fn next(&mut self) -> Option<Self::Item> {
        if self.mask == self.end {
            return None;
        }

        let mut graph = Graph::new();
        for i in 0..self.n {
            graph.add_vertex(i as VertexId);
        }

        let mut check = 0;
        for i in 0..self.n {
            for j in (i + 1)..self.n {
                if self.mask & (1 << check) != 0 {
                    graph.add_undirected_edge(i as VertexId, j as VertexId, UNIT_WEIGHT);
                }
                check += 1;
            }
        }

        self.mask += 1;
        Some(graph)
    }
}
