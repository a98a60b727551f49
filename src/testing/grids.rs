use crate::graph::Graph;
use crate::types::{UNIT_WEIGHT, VertexId};

/// Undirected `rows x cols` grid with unit weights.
///
/// Vertex `r * cols + c` sits at row `r`, column `c`. Grids are connected and
/// bipartite, and have cycles as soon as both sides exceed one.
pub fn grid_graph(rows: usize, cols: usize) -> Graph {
    let id = |r: usize, c: usize| (r * cols + c) as VertexId;
    let mut graph = Graph::new();

    for r in 0..rows {
        for c in 0..cols {
            graph.add_vertex(id(r, c));
        }
    }

    for r in 0..rows {
        for c in 0..cols {
            if r + 1 < rows {
                graph.add_undirected_edge(id(r, c), id(r + 1, c), UNIT_WEIGHT);
            }
            if c + 1 < cols {
                graph.add_undirected_edge(id(r, c), id(r, c + 1), UNIT_WEIGHT);
            }
        }
    }

    graph
}
