use crate::types::{VertexId, Weight};

/// Graph algorithm error types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// The operation names a vertex that is not in the graph.
    #[error("Unknown vertex: {0}")]
    UnknownVertex(VertexId),

    /// Spanning tree requested for a graph with more than one component.
    #[error("Graph is not connected: {components} components")]
    Disconnected { components: usize },

    /// Distances are undefined because of a negative-weight cycle.
    ///
    /// `vertex` is a vertex whose distance the cycle makes unbounded.
    #[error("Negative-weight cycle through vertex {vertex}")]
    NegativeCycle { vertex: VertexId },

    /// There is no path between the two vertices.
    #[error("No path from {from} to {to}")]
    Unreachable { from: VertexId, to: VertexId },

    /// Dijkstra was given an edge with negative weight.
    #[error("Negative weight {weight} on edge {from} -> {to}")]
    NegativeWeight {
        from: VertexId,
        to: VertexId,
        weight: Weight,
    },
}

/// Result type for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;
