//! Minimum and maximum spanning trees (Kruskal, Prim).
//!
//! Input graphs are undirected: every edge stored in both directions.
//! Output trees follow the same convention, so a tree on `n` vertices holds
//! `2 * (n - 1)` directed edges and `n - 1` entries in [`SpanningTree::edges`].

use crate::connectivity::connected_components;
use crate::error::{GraphError, Result};
use crate::graph::Graph;
use crate::types::{Edge, VertexId, Weight};
use crate::union_find::UnionFind;
use fixedbitset::FixedBitSet;
use hashbrown::HashSet;
use radsort::sort_by_key;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use tracing::{debug, instrument, trace};

/// Which extreme of total weight the tree should reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Objective {
    #[default]
    Minimum,
    Maximum,
}

impl Objective {
    /// Preference key: lower keys are taken first.
    ///
    /// `!w` is strictly decreasing in `w` and cannot overflow, unlike `-w`.
    fn key(self, weight: Weight) -> Weight {
        match self {
            Objective::Minimum => weight,
            Objective::Maximum => !weight,
        }
    }
}

/// Spanning tree configuration.
#[derive(Debug, Clone, Default)]
pub struct SpanningTreeConfig {
    pub objective: Objective,
    /// Vertex Prim's algorithm grows the tree from, first vertex if `None`.
    pub root: Option<VertexId>,
}

impl SpanningTreeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration for a maximum spanning tree.
    pub fn maximum() -> Self {
        Self::new().with_objective(Objective::Maximum)
    }

    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objective = objective;
        self
    }

    pub fn with_root(mut self, root: VertexId) -> Self {
        self.root = Some(root);
        self
    }
}

/// Spanning tree of a connected graph.
#[derive(Debug, Clone)]
pub struct SpanningTree {
    graph: Graph,
    edges: Vec<Edge>,
    total_weight: Weight,
}

impl SpanningTree {
    /// The tree as an undirected graph over all input vertices.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn into_graph(self) -> Graph {
        self.graph
    }

    /// Accepted edges, in the order they were accepted.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Sum of the edge weights, saturating at the bounds of [`Weight`].
    pub fn total_weight(&self) -> Weight {
        self.total_weight
    }
}

/// Spanning forest: one tree per connected component.
#[derive(Debug, Clone)]
pub struct SpanningForest {
    graph: Graph,
    edges: Vec<Edge>,
    total_weight: Weight,
    tree_count: usize,
}

impl SpanningForest {
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Sum of the edge weights, saturating at the bounds of [`Weight`].
    pub fn total_weight(&self) -> Weight {
        self.total_weight
    }

    /// Number of trees, equal to the number of connected components.
    pub fn tree_count(&self) -> usize {
        self.tree_count
    }

    /// The single tree, or [`GraphError::Disconnected`].
    pub fn into_tree(self) -> Result<SpanningTree> {
        if self.tree_count > 1 {
            return Err(GraphError::Disconnected {
                components: self.tree_count,
            });
        }
        Ok(SpanningTree {
            graph: self.graph,
            edges: self.edges,
            total_weight: self.total_weight,
        })
    }
}

/// Kruskal's algorithm; fails with [`GraphError::Disconnected`] unless the
/// graph is connected.
pub fn kruskal(graph: &Graph, objective: Objective) -> Result<SpanningTree> {
    let forest = kruskal_forest(graph, objective)?;
    if forest.tree_count() > 1 {
        debug!(trees = forest.tree_count(), "input is not connected");
    }
    forest.into_tree()
}

/// Kruskal's algorithm over every component.
///
/// Edges are taken in order of preference, deduplicated by endpoint pair; an
/// edge is accepted iff its endpoints are not connected yet. Sorting comes
/// before deduplication, so parallel edges collapse to the preferred one.
/// The sort is a stable radix sort on the weight: equal weights keep their
/// [`Graph::directed_edges`] order.
#[instrument(level = "debug", skip_all, fields(vertices = graph.vertex_count(), edges = graph.edge_count(), ?objective))]
pub fn kruskal_forest(graph: &Graph, objective: Objective) -> Result<SpanningForest> {
    let mut candidates = graph.directed_edges();
    sort_by_key(&mut candidates, |e| objective.key(e.weight));
    let mut seen = HashSet::with_capacity(candidates.len() / 2);
    candidates.retain(|e| seen.insert(e.endpoint_key()));

    let mut uf = UnionFind::from_vertices(graph.vertices());
    let mut forest = Graph::new();
    for v in graph.vertices() {
        forest.add_vertex(v);
    }

    let mut edges = Vec::with_capacity(graph.vertex_count().saturating_sub(1));
    let mut total_weight: Weight = 0;
    for e in candidates {
        // a second path between connected endpoints would close a loop
        if uf.connected(e.source, e.target)? {
            continue;
        }
        uf.union(e.source, e.target)?;
        trace!(edge = %e, "accepted");
        forest.add_undirected_edge(e.source, e.target, e.weight);
        edges.push(e);
        total_weight = total_weight.saturating_add(e.weight);
    }

    debug!(accepted = edges.len(), total_weight, "kruskal finished");
    Ok(SpanningForest {
        graph: forest,
        edges,
        total_weight,
        tree_count: uf.component_count(),
    })
}

/// Prim's algorithm (lazy version).
///
/// Grows the tree from one vertex, always taking the preferred frontier edge.
/// The frontier may keep edges whose target joined the tree through a better
/// edge; those are dropped when popped. Equal weights are taken in the order
/// they were pushed.
///
/// Edge direction is ignored, as in [`kruskal`], so an edge stored one way
/// only still joins its endpoints.
#[instrument(level = "debug", skip_all, fields(vertices = graph.vertex_count(), edges = graph.edge_count(), objective = ?config.objective))]
pub fn prim(graph: &Graph, config: &SpanningTreeConfig) -> Result<SpanningTree> {
    let root = config.root.map(|r| graph.position(r)).transpose()?;
    let adj = graph.adjacency().symmetrized();
    let mut tree = Graph::new();
    for v in graph.vertices() {
        tree.add_vertex(v);
    }
    if adj.len() == 0 {
        return Ok(SpanningTree {
            graph: tree,
            edges: Vec::new(),
            total_weight: 0,
        });
    }

    let root = root.unwrap_or(0);
    let objective = config.objective;

    let mut in_tree = FixedBitSet::with_capacity(adj.len());
    in_tree.insert(root);
    let mut frontier = BinaryHeap::new();
    let mut seq = 0usize;
    for &(t, w) in &adj.out[root] {
        frontier.push(Reverse((objective.key(w), seq, root, t, w)));
        seq += 1;
    }

    let mut edges = Vec::with_capacity(adj.len() - 1);
    let mut total_weight: Weight = 0;
    while let Some(Reverse((_, _, s, t, w))) = frontier.pop() {
        if in_tree.contains(t) {
            trace!(from = adj.ids[s], to = adj.ids[t], "stale frontier edge");
            continue;
        }
        in_tree.insert(t);
        let e = adj.edge(s, t, w);
        trace!(edge = %e, "accepted");
        tree.add_undirected_edge(e.source, e.target, e.weight);
        edges.push(e);
        total_weight = total_weight.saturating_add(w);

        for &(next, nw) in &adj.out[t] {
            if !in_tree.contains(next) {
                frontier.push(Reverse((objective.key(nw), seq, t, next, nw)));
                seq += 1;
            }
        }
    }

    if edges.len() + 1 < adj.len() {
        let components = connected_components(graph).count();
        debug!(spanned = edges.len() + 1, components, "input is not connected");
        return Err(GraphError::Disconnected { components });
    }

    debug!(accepted = edges.len(), total_weight, "prim finished");
    Ok(SpanningTree {
        graph: tree,
        edges,
        total_weight,
    })
}
