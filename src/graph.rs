use crate::error::{GraphError, Result};
use crate::types::{Edge, VertexId, Weight};
use hashbrown::{HashMap, HashSet};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

/// Weighted directed graph keyed by caller-chosen integer ids.
///
/// Wraps petgraph's `DiGraph`. Vertices keep their insertion order, and so do
/// the outgoing edges of every vertex, which makes every algorithm in this
/// crate deterministic.
///
/// The store never mirrors edges. An undirected graph is built by inserting
/// both directions, e.g. with [`Graph::add_undirected_edge`].
#[derive(Debug, Clone, Default)]
pub struct Graph {
    inner: DiGraph<VertexId, Weight>,
    index: HashMap<VertexId, NodeIndex>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from `(source, target, weight)` triples.
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (VertexId, VertexId, Weight)>,
    {
        let mut graph = Self::new();
        for (source, target, weight) in edges {
            graph.add_edge(source, target, weight);
        }
        graph
    }

    /// Registers a vertex. Returns `false` if it was already present.
    pub fn add_vertex(&mut self, id: VertexId) -> bool {
        if self.index.contains_key(&id) {
            return false;
        }
        self.node(id);
        true
    }

    /// Adds a directed edge, registering both endpoints.
    pub fn add_edge(&mut self, source: VertexId, target: VertexId, weight: Weight) {
        let s = self.node(source);
        let t = self.node(target);
        self.inner.add_edge(s, t, weight);
    }

    /// Adds `(u, v)` and `(v, u)` with the same weight.
    pub fn add_undirected_edge(&mut self, u: VertexId, v: VertexId, weight: Weight) {
        self.add_edge(u, v, weight);
        self.add_edge(v, u, weight);
    }

    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn vertex_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Number of stored directed edges.
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.node_count() == 0
    }

    /// Vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.inner.node_indices().map(move |n| self.inner[n])
    }

    /// Outgoing edges of `v` in insertion order.
    ///
    /// A vertex that is not in the graph simply has no edges.
    pub fn edges_from(&self, v: VertexId) -> Vec<Edge> {
        let Some(&node) = self.index.get(&v) else {
            return Vec::new();
        };
        let mut edges: Vec<_> = self.inner.edges(node).collect();
        // petgraph walks its edge lists newest first
        edges.sort_unstable_by_key(|e| e.id());
        edges
            .into_iter()
            .map(|e| Edge::new(v, self.inner[e.target()], *e.weight()))
            .collect()
    }

    /// Every stored edge, grouped by source in vertex order.
    pub fn directed_edges(&self) -> Vec<Edge> {
        self.adjacency().edges().map(|(s, t, w)| self.edge_at(s, t, w)).collect()
    }

    /// Edges deduplicated by unordered endpoint pair.
    ///
    /// The first occurrence wins, so `(u, v, w)` hides a later `(v, u, w')`
    /// and any parallel `(u, v, w'')`.
    pub fn all_edges(&self) -> Vec<Edge> {
        let mut seen = HashSet::new();
        self.directed_edges()
            .into_iter()
            .filter(|e| seen.insert(e.endpoint_key()))
            .collect()
    }

    /// Transposed copy: every edge reversed, vertex order kept.
    pub fn reversed(&self) -> Graph {
        let mut transposed = self.clone();
        transposed.inner.reverse();
        transposed
    }

    /// Dense position of `id`, fails for unknown vertices.
    pub(crate) fn position(&self, id: VertexId) -> Result<usize> {
        self.index
            .get(&id)
            .map(|n| n.index())
            .ok_or(GraphError::UnknownVertex(id))
    }

    /// Snapshot of the adjacency lists over dense positions.
    pub(crate) fn adjacency(&self) -> Adjacency {
        let n = self.inner.node_count();
        let mut out = vec![Vec::new(); n];
        // edge indices follow insertion order
        for e in self.inner.edge_references() {
            out[e.source().index()].push((e.target().index(), *e.weight()));
        }
        Adjacency {
            ids: self.vertices().collect(),
            out,
        }
    }

    fn edge_at(&self, s: usize, t: usize, weight: Weight) -> Edge {
        Edge::new(
            self.inner[NodeIndex::new(s)],
            self.inner[NodeIndex::new(t)],
            weight,
        )
    }

    fn node(&mut self, id: VertexId) -> NodeIndex {
        let inner = &mut self.inner;
        *self.index.entry(id).or_insert_with(|| inner.add_node(id))
    }
}

/// Adjacency lists indexed by dense vertex position.
///
/// Algorithms run on this snapshot and translate positions back through `ids`.
#[derive(Debug, Clone)]
pub(crate) struct Adjacency {
    pub ids: Vec<VertexId>,
    pub out: Vec<Vec<(usize, Weight)>>,
}

impl Adjacency {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, Weight)> + '_ {
        self.out
            .iter()
            .enumerate()
            .flat_map(|(s, list)| list.iter().map(move |&(t, w)| (s, t, w)))
    }

    pub fn edge(&self, s: usize, t: usize, weight: Weight) -> Edge {
        Edge::new(self.ids[s], self.ids[t], weight)
    }

    pub fn transposed(&self) -> Adjacency {
        let mut out = vec![Vec::new(); self.len()];
        for (s, t, w) in self.edges() {
            out[t].push((s, w));
        }
        Adjacency {
            ids: self.ids.clone(),
            out,
        }
    }

    /// Every edge in both directions, for direction-blind traversals.
    pub fn symmetrized(&self) -> Adjacency {
        let mut out = self.out.clone();
        for (s, t, w) in self.edges() {
            out[t].push((s, w));
        }
        Adjacency {
            ids: self.ids.clone(),
            out,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_edge_registers_endpoints() {
        let mut g = Graph::new();
        g.add_edge(3, 7, 2);
        assert!(g.contains_vertex(3));
        assert!(g.contains_vertex(7));
        assert_eq!(g.vertices().collect::<Vec<_>>(), vec![3, 7]);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn test_add_vertex_is_idempotent() {
        let mut g = Graph::new();
        assert!(g.add_vertex(1));
        assert!(!g.add_vertex(1));
        g.add_edge(1, 2, 1);
        assert!(!g.add_vertex(2));
        assert_eq!(g.vertex_count(), 2);
    }

    #[test]
    fn test_edges_from_unknown_vertex_is_empty() {
        let g = Graph::from_edges([(0, 1, 1)]);
        assert!(g.edges_from(42).is_empty());
        assert!(g.edges_from(1).is_empty());
    }

    #[test]
    fn test_edges_from_keeps_insertion_order() {
        let g = Graph::from_edges([(0, 3, 1), (0, 1, 2), (0, 2, 3)]);
        let targets: Vec<_> = g.edges_from(0).iter().map(|e| e.target).collect();
        assert_eq!(targets, vec![3, 1, 2]);
    }

    #[test]
    fn test_all_edges_deduplicates_unordered_pairs() {
        let mut g = Graph::new();
        g.add_undirected_edge(0, 1, 4);
        g.add_undirected_edge(1, 2, 5);
        g.add_edge(2, 2, 1);
        g.add_edge(0, 1, 9);

        assert_eq!(g.directed_edges().len(), 6);
        assert_eq!(
            g.all_edges(),
            vec![Edge::new(0, 1, 4), Edge::new(1, 2, 5), Edge::new(2, 2, 1)]
        );
    }

    #[test]
    fn test_reversed_transposes_every_edge() {
        let g = Graph::from_edges([(0, 1, 1), (1, 2, 2), (0, 2, 3)]);
        let r = g.reversed();
        assert_eq!(r.vertices().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert!(r.edges_from(0).is_empty());
        assert_eq!(r.edges_from(2), vec![Edge::new(2, 1, 2), Edge::new(2, 0, 3)]);
        assert_eq!(r.edges_from(1), vec![Edge::new(1, 0, 1)]);
    }

    #[test]
    fn test_position_of_unknown_vertex_fails() {
        let g = Graph::from_edges([(5, 6, 1)]);
        assert_eq!(g.position(6), Ok(1));
        assert_eq!(g.position(9), Err(GraphError::UnknownVertex(9)));
    }

    #[test]
    fn test_adjacency_transposed_and_symmetrized() {
        let g = Graph::from_edges([(0, 1, 1), (1, 2, 2)]);
        let adj = g.adjacency();
        assert_eq!(adj.out, vec![vec![(1, 1)], vec![(2, 2)], vec![]]);
        assert_eq!(adj.transposed().out, vec![vec![], vec![(0, 1)], vec![(1, 2)]]);
        assert_eq!(
            adj.symmetrized().out,
            vec![vec![(1, 1)], vec![(2, 2), (0, 1)], vec![(1, 2)]]
        );
    }
}
